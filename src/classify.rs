use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::section::{
    is_verdict_header, SectionState, CASE_NUMBER_PREFIX, CONSIDERING_HEADER, COST_HEADING,
    COST_MARKER, COURT_CHAIR_PREFIX, COURT_PREFIX, DISPOSITION_HEADER, DIVINE_JUSTICE,
    JUDGE_PRECEDED_BY, LEGAL_DEGREE, READING_HEADER, SEPARATORS, TITLE,
};

pub(crate) static PARTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*),\s*sebagai\s*(Pemohon Eksekusi|Termohon Eksekusi);$").unwrap()
});
pub(crate) static LIST_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+[.)]|-)").unwrap());
static JUDGE_CHARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s.,']+$").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    Justified,
    End,
}

/// Which rule decided a line's styling. Kept on the classification so the
/// pass can be traced and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Blank,
    CourtName,
    CostRow,
    PartyLine,
    Separator,
    Title,
    CaseNumber,
    DivineJustice,
    SectionHeader,
    DispositionHeader,
    CourtChair,
    JudgeName,
    CostHeading,
    ListItem,
    Considerations,
    VerdictHeader,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineClassification {
    pub rule: Rule,
    pub alignment: Alignment,
    pub bold: bool,
    pub all_caps: bool,
    pub underline: bool,
}

impl LineClassification {
    fn plain(rule: Rule) -> Self {
        LineClassification { rule, alignment: Alignment::Start, bold: false, all_caps: false, underline: false }
    }

    fn aligned(rule: Rule, alignment: Alignment) -> Self {
        LineClassification { alignment, ..Self::plain(rule) }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn caps(mut self) -> Self {
        self.all_caps = true;
        self
    }

    fn underlined(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.rule == Rule::Blank
    }
    pub fn is_suppressed(&self) -> bool {
        self.rule == Rule::CourtName
    }
    pub fn is_list_item(&self) -> bool {
        self.rule == Rule::ListItem
    }
    pub fn is_party_line(&self) -> bool {
        self.rule == Rule::PartyLine
    }
    pub fn is_cost_row(&self) -> bool {
        self.rule == Rule::CostRow
    }
    pub fn is_separator_label(&self) -> bool {
        self.rule == Rule::Separator
    }
}

/// True when line 0 carries the court name that moves into the page header.
pub fn is_court_name_line(line: &str, index: usize) -> bool {
    index == 0 && line.trim().starts_with(COURT_PREFIX)
}

/// Best-effort detection of the signing judge's name under the chair line.
///
/// Heuristic: only letters, whitespace and `.,'`, contains the "S.H."
/// degree, and the line directly above starts with "KETUA". Names with
/// non-ASCII letters are missed, and any degree-bearing line under a
/// "KETUA ..." line is taken for a judge.
pub fn is_judge_name(trimmed: &str, prev_trimmed: &str) -> bool {
    JUDGE_CHARS_RE.is_match(trimmed)
        && trimmed.contains(LEGAL_DEGREE)
        && prev_trimmed.starts_with(JUDGE_PRECEDED_BY)
}

/// Classify one raw line of generated text.
///
/// The section state is advanced first, independently of styling, and the
/// returned state is the one in effect for this line and the next.
pub fn classify(
    line: &str,
    index: usize,
    prev_trimmed: &str,
    state: SectionState,
) -> (LineClassification, SectionState) {
    let trimmed = line.trim();
    let state = state.next(trimmed);
    (style(line, trimmed, index, prev_trimmed, state), state)
}

fn style(
    line: &str,
    trimmed: &str,
    index: usize,
    prev_trimmed: &str,
    state: SectionState,
) -> LineClassification {
    use Alignment::*;

    if trimmed.is_empty() {
        return LineClassification::plain(Rule::Blank);
    }
    if is_court_name_line(line, index) {
        return LineClassification::aligned(Rule::CourtName, Center).caps();
    }
    if line.contains(COST_MARKER) {
        return LineClassification::plain(Rule::CostRow);
    }
    if PARTY_RE.is_match(trimmed) {
        return LineClassification::aligned(Rule::PartyLine, Center);
    }
    if SEPARATORS.contains(&trimmed) {
        return LineClassification::aligned(Rule::Separator, Center).bold();
    }

    if trimmed == TITLE {
        LineClassification::aligned(Rule::Title, Center).bold().caps()
    } else if trimmed.starts_with(CASE_NUMBER_PREFIX) && index < 5 {
        LineClassification::aligned(Rule::CaseNumber, Center)
    } else if trimmed == DIVINE_JUSTICE {
        LineClassification::aligned(Rule::DivineJustice, Center).caps()
    } else if trimmed == READING_HEADER || trimmed == CONSIDERING_HEADER {
        LineClassification::plain(Rule::SectionHeader).bold().caps()
    } else if trimmed == DISPOSITION_HEADER {
        LineClassification::aligned(Rule::DispositionHeader, Center).bold().caps()
    } else if trimmed.starts_with(COURT_CHAIR_PREFIX) {
        LineClassification::aligned(Rule::CourtChair, Center).caps()
    } else if is_judge_name(trimmed, prev_trimmed) {
        LineClassification::aligned(Rule::JudgeName, Center).bold().underlined()
    } else if trimmed == COST_HEADING {
        LineClassification::plain(Rule::CostHeading).bold()
    } else if state.takes_list_items() && LIST_MARKER_RE.is_match(trimmed) {
        LineClassification::plain(Rule::ListItem)
    } else if state == SectionState::InConsiderations && !is_verdict_header(trimmed) {
        LineClassification::aligned(Rule::Considerations, Justified)
    } else if is_verdict_header(trimmed) {
        LineClassification::aligned(Rule::VerdictHeader, Center).caps()
    } else {
        LineClassification::plain(Rule::Default)
    }
}
