//! Maps a [`DocumentTree`] onto a `docx-rs` document and packs it.
//!
//! The court-name header shows on the first page only; the page-number
//! footer is registered for both the first and the default page so it
//! appears everywhere.

use std::borrow::Cow;
use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, AlignmentType, Docx, Footer, Header, IndentLevel, Level, LevelJc, LevelText, LineSpacing,
    NumberFormat, Numbering, NumberingId, PageMargin, PageNum, Paragraph, RunFonts, SpecialIndentType, Start, Style,
    StyleType, Tab, TabValueType,
};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::assemble::{DocumentTree, NumberingStyle, ParagraphStyle};
use crate::classify::Alignment;
use crate::format::{Run, RunContent, StructuredParagraph, TabKind};

const NUM_ID: usize = 1;
const A4_WIDTH: u32 = 11906;
const A4_HEIGHT: u32 = 16838;

// C0 controls XML 1.0 forbids; tab, LF and CR are allowed.
static XML_FORBIDDEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x{FFFE}\x{FFFF}]").unwrap());

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("PackFailed: {0}")]
    Pack(String),
}

/// Serialize the tree into `.docx` bytes.
pub fn write_docx(tree: &DocumentTree) -> Result<Vec<u8>, DocxError> {
    let mut docx = Docx::new()
        .page_size(A4_WIDTH, A4_HEIGHT)
        .page_margin(
            // one inch all round, header and footer at 1.25 cm
            PageMargin::new().top(1440).right(1440).bottom(1440).left(1440).header(708).footer(708),
        )
        .default_fonts(fonts(&tree.default_style.font))
        .default_size(tree.default_style.size as usize)
        .add_style(paragraph_style(&tree.default_style))
        .add_abstract_numbering(list_numbering(&tree.numbering))
        .add_numbering(Numbering::new(NUM_ID, NUM_ID))
        .first_header(Header::new().add_paragraph(paragraph(&tree.first_page_header, &tree.default_style)))
        .first_footer(Footer::new().add_paragraph(paragraph(&tree.footer, &tree.default_style)))
        .footer(Footer::new().add_paragraph(paragraph(&tree.footer, &tree.default_style)));

    for p in &tree.body {
        docx = docx.add_paragraph(paragraph(p, &tree.default_style));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).map_err(|e| DocxError::Pack(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Replace characters an XML 1.0 document cannot carry with a space.
pub fn xml_safe(text: &str) -> Cow<'_, str> {
    XML_FORBIDDEN_RE.replace_all(text, " ")
}

fn fonts(family: &str) -> RunFonts {
    RunFonts::new().ascii(family).hi_ansi(family).cs(family)
}

fn paragraph_style(style: &ParagraphStyle) -> Style {
    Style::new(&style.id, StyleType::Paragraph)
        .name(&style.name)
        .based_on(&style.based_on)
        .size(style.size as usize)
}

fn list_numbering(numbering: &NumberingStyle) -> AbstractNumbering {
    let level = Level::new(
        0,
        Start::new(1),
        NumberFormat::new(&numbering.format),
        LevelText::new(&numbering.text),
        LevelJc::new("left"),
    )
    .indent(
        Some(numbering.indent_left as i32),
        Some(SpecialIndentType::Hanging(numbering.indent_hanging as i32)),
        None,
        None,
    );
    AbstractNumbering::new(NUM_ID).add_level(level)
}

fn alignment_type(alignment: Alignment) -> AlignmentType {
    match alignment {
        Alignment::Start => AlignmentType::Left,
        Alignment::Center => AlignmentType::Center,
        Alignment::Justified => AlignmentType::Both,
        Alignment::End => AlignmentType::Right,
    }
}

fn paragraph(p: &StructuredParagraph, default_style: &ParagraphStyle) -> Paragraph {
    let mut out = Paragraph::new();
    if let Some(style) = &p.style {
        out = out.style(style);
        if *style == default_style.id {
            out = out.line_spacing(LineSpacing::new().after(default_style.spacing_after));
        }
    }
    if p.numbering.is_some() {
        // one list style is registered; every reference points at it
        out = out.numbering(NumberingId::new(NUM_ID), IndentLevel::new(0));
    }
    for stop in &p.tab_stops {
        let val = match stop.kind {
            TabKind::Left => TabValueType::Left,
            TabKind::Right => TabValueType::Right,
        };
        out = out.add_tab(Tab::new().val(val).pos(stop.position as usize));
    }
    if let Some(alignment) = p.alignment {
        out = out.align(alignment_type(alignment));
    }
    for run in &p.runs {
        out = match &run.content {
            RunContent::Text(text) => out.add_run(text_run(run, text)),
            RunContent::PageNumber => {
                if run.tab_before {
                    out = out.add_run(styled_run(run).add_tab());
                }
                out.add_page_num(PageNum::new())
            }
        };
    }
    out
}

fn styled_run(run: &Run) -> docx_rs::Run {
    let mut out = docx_rs::Run::new();
    if let Some(font) = &run.font {
        out = out.fonts(fonts(font));
    }
    if run.bold {
        out = out.bold();
    }
    if run.all_caps {
        out.run_property = out.run_property.caps();
    }
    if let Some(size) = run.size {
        out = out.size(size as usize);
    }
    if run.underline {
        out = out.underline("single");
    }
    out
}

fn text_run(run: &Run, text: &str) -> docx_rs::Run {
    let mut out = styled_run(run);
    if run.tab_before {
        out = out.add_tab();
    }
    out.add_text(xml_safe(text).into_owned())
}
