use serde::{Deserialize, Serialize};

use crate::classify::{classify, is_court_name_line, Alignment, Rule};
use crate::format::{format_line, Run, StructuredParagraph, DEFAULT_STYLE_ID, LIST_REFERENCE};
use crate::section::{SectionState, CLOSING_PREFIX};

pub const HEADER_PLACEHOLDER: &str = "PENGADILAN";
pub const FONT_FAMILY: &str = "Arial";
/// Half-points.
pub const BODY_FONT_SIZE: u32 = 24;
pub const FOOTER_FONT_SIZE: u32 = 20;
/// Twentieths of a point.
pub const SPACING_AFTER: u32 = 120;
pub const LIST_INDENT_LEFT: u32 = 720;
pub const LIST_INDENT_HANGING: u32 = 360;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub id: String,
    pub name: String,
    pub based_on: String,
    pub font: String,
    pub size: u32,
    pub spacing_after: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingStyle {
    pub reference: String,
    /// Level-0 format, e.g. `decimal`.
    pub format: String,
    /// Level-0 text, e.g. `%1.`.
    pub text: String,
    pub indent_left: u32,
    pub indent_hanging: u32,
}

/// Everything the serializer needs: page furniture plus the body in line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTree {
    /// Shown on the first page only; later pages get an empty header.
    pub first_page_header: StructuredParagraph,
    /// Shown on every page.
    pub footer: StructuredParagraph,
    pub default_style: ParagraphStyle,
    pub numbering: NumberingStyle,
    pub body: Vec<StructuredParagraph>,
}

/// Counts gathered during the pass, written into export metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Found {
    pub reading: bool,
    pub considerations: bool,
    pub disposition: bool,
    pub closing: bool,
    pub list_items: usize,
    pub party_lines: usize,
    pub cost_rows: usize,
    pub blank_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub index: usize,
    pub state: SectionState,
    pub rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOutput {
    pub tree: DocumentTree,
    pub found: Found,
    pub trace: Vec<TraceEntry>,
}

pub fn default_style() -> ParagraphStyle {
    ParagraphStyle {
        id: DEFAULT_STYLE_ID.to_string(),
        name: "Default Style".to_string(),
        based_on: "Normal".to_string(),
        font: FONT_FAMILY.to_string(),
        size: BODY_FONT_SIZE,
        spacing_after: SPACING_AFTER,
    }
}

pub fn numbering_style() -> NumberingStyle {
    NumberingStyle {
        reference: LIST_REFERENCE.to_string(),
        format: "decimal".to_string(),
        text: "%1.".to_string(),
        indent_left: LIST_INDENT_LEFT,
        indent_hanging: LIST_INDENT_HANGING,
    }
}

/// Wrap body paragraphs with header, footer, default style and list numbering.
pub fn assemble(court_name: Option<&str>, paragraphs: Vec<StructuredParagraph>) -> DocumentTree {
    let name = court_name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or(HEADER_PLACEHOLDER);
    let header_run = Run {
        underline: true,
        font: Some(FONT_FAMILY.to_string()),
        size: Some(BODY_FONT_SIZE),
        ..Run::text(name.to_uppercase()).bold(true)
    };
    let footer_run = Run {
        font: Some(FONT_FAMILY.to_string()),
        size: Some(FOOTER_FONT_SIZE),
        ..Run::page_number()
    };
    DocumentTree {
        first_page_header: StructuredParagraph::unstyled(Alignment::Start, vec![header_run]),
        footer: StructuredParagraph::unstyled(Alignment::End, vec![footer_run]),
        default_style: default_style(),
        numbering: numbering_style(),
        body: paragraphs,
    }
}

/// Full classify → format → assemble pass over generated text.
///
/// Line 0 is lifted into the header when it starts with the court prefix;
/// every other line, blank or not, yields exactly one body paragraph.
pub fn build_document(text: &str) -> BuildOutput {
    let lines: Vec<&str> = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
    let mut court_name: Option<&str> = None;
    let mut paragraphs = Vec::with_capacity(lines.len());
    let mut found = Found::default();
    let mut trace = Vec::with_capacity(lines.len());
    let mut state = SectionState::None;
    let mut prev_trimmed = "";

    for (index, line) in lines.iter().enumerate() {
        if is_court_name_line(line, index) {
            court_name = Some(line.trim());
            trace.push(TraceEntry { index, state, rule: Rule::CourtName });
            prev_trimmed = line.trim();
            continue;
        }
        let (class, next) = classify(line, index, prev_trimmed, state);
        state = next;
        match state {
            SectionState::InReading => found.reading = true,
            SectionState::InConsiderations => found.considerations = true,
            SectionState::InDisposition => found.disposition = true,
            SectionState::None => {}
        }
        if line.trim().starts_with(CLOSING_PREFIX) {
            found.closing = true;
        }
        match class.rule {
            Rule::ListItem => found.list_items += 1,
            Rule::PartyLine => found.party_lines += 1,
            Rule::CostRow => found.cost_rows += 1,
            Rule::Blank => found.blank_lines += 1,
            _ => {}
        }
        trace.push(TraceEntry { index, state, rule: class.rule });
        paragraphs.push(format_line(line, &class));
        prev_trimmed = line.trim();
    }

    BuildOutput { tree: assemble(court_name, paragraphs), found, trace }
}

/// Plain-text rendering of the body, one line per paragraph.
///
/// Centered lines are marked with `^`, justified with `=`, list items with
/// `#.` so the classification can be eyeballed in a terminal.
pub fn render_preview(tree: &DocumentTree) -> String {
    let mut out = String::new();
    out.push_str(&format!("[header] {}\n", tree.first_page_header.display_text()));
    for p in &tree.body {
        let mark = match (p.numbering.is_some(), p.alignment) {
            (true, _) => "#. ",
            (false, Some(Alignment::Center)) => "^  ",
            (false, Some(Alignment::Justified)) => "=  ",
            _ => "   ",
        };
        if p.runs.is_empty() {
            out.push('\n');
            continue;
        }
        out.push_str(mark);
        out.push_str(&p.display_text());
        out.push('\n');
    }
    out.push_str("[footer] page #\n");
    out
}
