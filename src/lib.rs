//! Draft Indonesian court documents with a text generator and export them
//! as formatted Word files.
//!
//! Generated text runs through [`classify`] (per-line styling driven by a
//! section state machine), [`format`] (runs, numbering, tab stops),
//! [`assemble`] (header, footer, styles) and [`docx`] (WordprocessingML).

pub mod assemble;
pub mod classify;
pub mod config;
pub mod docx;
pub mod emit;
pub mod form;
pub mod format;
pub mod generate;
pub mod prompt;
pub mod render;
pub mod section;
pub mod session;

pub use assemble::{build_document, render_preview, BuildOutput, DocumentTree, Found, TraceEntry};
pub use classify::{classify, Alignment, LineClassification, Rule};
pub use config::{load_config, validate_config, Config, ConfigError};
pub use docx::{write_docx, DocxError};
pub use emit::{emit_export, sha256_hex, write_artifact, EmitError, EmitPaths};
pub use form::{load_form, save_form, DocumentKind, FormError, FormRecord, FormUpdate, MergeReport, PartialRecord};
pub use format::{format_line, Run, RunContent, StructuredParagraph};
pub use generate::{FieldExtractor, GeminiClient, GenerateError, TextGenerator};
pub use prompt::{build_prompt, format_date};
pub use render::{check_deps, nala_help_for, render_first_page, DepsResult, PageImage, RenderError};
pub use section::SectionState;
pub use session::{export_filename, DrafterError, ExportArtifact, Session};
