use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{Alignment, LineClassification, Rule, PARTY_RE};
use crate::section::COST_MARKER;

/// Paragraph style every body paragraph points at.
pub const DEFAULT_STYLE_ID: &str = "default";
/// Numbering reference shared by every list item.
pub const LIST_REFERENCE: &str = "my-numbering-style";
/// Cost-row tab stops in twentieths of a point.
pub const COST_TAB_LEFT: u32 = 2800;
pub const COST_TAB_RIGHT: u32 = 5500;

static LIST_STRIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+[.)]|-)\s*").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunContent {
    Text(String),
    /// Current page number field.
    PageNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub content: RunContent,
    /// Emit a tab character before the content.
    pub tab_before: bool,
    pub bold: bool,
    pub underline: bool,
    pub all_caps: bool,
    pub font: Option<String>,
    /// Size in half-points.
    pub size: Option<u32>,
}

impl Run {
    pub fn text(text: impl Into<String>) -> Self {
        Run {
            content: RunContent::Text(text.into()),
            tab_before: false,
            bold: false,
            underline: false,
            all_caps: false,
            font: None,
            size: None,
        }
    }

    pub fn page_number() -> Self {
        Run { content: RunContent::PageNumber, ..Run::text("") }
    }

    pub fn bold(mut self, on: bool) -> Self {
        self.bold = on;
        self
    }

    pub fn after_tab(mut self) -> Self {
        self.tab_before = true;
        self
    }

    /// Text as a reader sees it: caps applied, page fields as `#`.
    pub fn display_text(&self) -> String {
        let raw = match &self.content {
            RunContent::Text(t) => t.as_str(),
            RunContent::PageNumber => "#",
        };
        let mut out = String::new();
        if self.tab_before {
            out.push('\t');
        }
        if self.all_caps {
            out.push_str(&raw.to_uppercase());
        } else {
            out.push_str(raw);
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabStop {
    pub kind: TabKind,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingRef {
    pub reference: String,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredParagraph {
    pub style: Option<String>,
    /// `None` inherits the style's alignment.
    pub alignment: Option<Alignment>,
    pub numbering: Option<NumberingRef>,
    pub tab_stops: Vec<TabStop>,
    pub runs: Vec<Run>,
}

impl StructuredParagraph {
    fn styled() -> Self {
        StructuredParagraph {
            style: Some(DEFAULT_STYLE_ID.to_string()),
            alignment: None,
            numbering: None,
            tab_stops: Vec::new(),
            runs: Vec::new(),
        }
    }

    pub fn unstyled(alignment: Alignment, runs: Vec<Run>) -> Self {
        StructuredParagraph { style: None, alignment: Some(alignment), runs, ..Self::styled() }
    }

    pub fn display_text(&self) -> String {
        self.runs.iter().map(Run::display_text).collect()
    }
}

/// Turn one classified line into its paragraph.
///
/// Blank lines come back as a styled paragraph without runs so spacing in
/// the source survives one-to-one. The suppressed court-name line is the
/// caller's business; formatting it anyway yields a plain centered line.
pub fn format_line(line: &str, class: &LineClassification) -> StructuredParagraph {
    let trimmed = line.trim();
    let mut p = StructuredParagraph::styled();
    match class.rule {
        Rule::Blank => {}
        Rule::CostRow => {
            let mut parts = line.split(COST_MARKER);
            let label = parts.next().unwrap_or("");
            let amount_label = parts.next().unwrap_or("");
            let amount = parts.next().unwrap_or("");
            p.tab_stops = vec![
                TabStop { kind: TabKind::Left, position: COST_TAB_LEFT },
                TabStop { kind: TabKind::Right, position: COST_TAB_RIGHT },
            ];
            p.runs = vec![
                Run::text(label),
                Run::text(amount_label).after_tab(),
                Run::text(amount).after_tab(),
            ];
        }
        Rule::PartyLine => {
            p.alignment = Some(class.alignment);
            p.runs = match PARTY_RE.captures(trimmed) {
                Some(cap) => {
                    let name = cap.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                    let role = cap.get(2).map(|m| m.as_str()).unwrap_or("");
                    vec![
                        Run::text(name).bold(true),
                        Run::text(", sebagai "),
                        Run::text(role).bold(true),
                        Run::text(";"),
                    ]
                }
                None => vec![Run::text(trimmed)],
            };
        }
        Rule::Separator => {
            p.alignment = Some(class.alignment);
            p.runs = vec![Run::text(trimmed).bold(true)];
        }
        _ => {
            let text = match class.rule {
                Rule::JudgeName => trimmed.to_string(),
                Rule::ListItem => LIST_STRIP_RE.replace(line, "").into_owned(),
                _ => line.to_string(),
            };
            if class.is_list_item() {
                p.numbering = Some(NumberingRef { reference: LIST_REFERENCE.to_string(), level: 0 });
            }
            p.alignment = Some(class.alignment);
            p.runs = vec![Run {
                underline: class.underline,
                all_caps: class.all_caps,
                ..Run::text(text).bold(class.bold)
            }];
        }
    }
    p
}
