use std::path::Path;

use serde_json::json;
use thiserror::Error;

use crate::assemble::{build_document, BuildOutput};
use crate::docx::{write_docx, DocxError};
use crate::emit::sha256_hex;
use crate::form::{DocumentKind, FormError, FormRecord, FormUpdate, MergeReport};
use crate::generate::{FieldExtractor, GenerateError, TextGenerator};
use crate::prompt::{build_prompt, is_aanmaning};
use crate::render::{render_first_page, PageImage, RenderError};

pub const AANMANING_FAILURE: &str = "Gagal menghasilkan dokumen Penetapan Aanmaning. Silakan coba lagi.";
pub const GENERIC_FAILURE: &str = "Gagal menghasilkan dokumen. Silakan coba lagi.";
pub const NO_PAGE_IMAGE: &str = "Tidak dapat membuat gambar halaman.";

/// User-facing failures. `Display` is the message shown to the clerk.
#[derive(Debug, Error)]
pub enum DrafterError {
    #[error("Gagal menghasilkan teks: {message}")]
    Generation {
        message: &'static str,
        #[source]
        source: GenerateError,
    },
    #[error("Gagal memproses PDF: {0}")]
    Extraction(String),
    #[error("Tidak ada teks untuk diekspor. Silakan buat dokumen terlebih dahulu.")]
    NothingToExport,
    #[error("Gagal mengekspor dokumen: {0}")]
    Export(#[from] DocxError),
    #[error(transparent)]
    Form(#[from] FormError),
}

impl DrafterError {
    /// Stable code for the JSON event log.
    pub fn code(&self) -> &'static str {
        match self {
            DrafterError::Generation { .. } => "GenerationFailed",
            DrafterError::Extraction(_) => "ExtractionFailed",
            DrafterError::NothingToExport => "NothingToExport",
            DrafterError::Export(_) => "ExportFailed",
            DrafterError::Form(_) => "InvalidForm",
        }
    }
}

impl From<RenderError> for DrafterError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::ToolMissing(_) => DrafterError::Extraction(NO_PAGE_IMAGE.to_string()),
            other => DrafterError::Extraction(other.to_string()),
        }
    }
}

/// Generated docx ready to be written out.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub build: BuildOutput,
}

/// `{kind}_{case}.docx`: whitespace in the kind and `/` `.` in the case
/// number become underscores.
pub fn export_filename(kind: DocumentKind, case_number: &str) -> String {
    let kind: String = kind.label().chars().map(|c| if c.is_whitespace() { '_' } else { c }).collect();
    let case: String = case_number.chars().map(|c| if c == '/' || c == '.' { '_' } else { c }).collect();
    format!("{kind}_{case}.docx")
}

/// One drafting session: the form plus the last generated text.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub form: FormRecord,
    pub generated: Option<String>,
}

impl Session {
    pub fn new(form: FormRecord) -> Self {
        Session { form, generated: None }
    }

    pub fn with_text(form: FormRecord, text: impl Into<String>) -> Self {
        Session { form, generated: Some(text.into()) }
    }

    pub fn apply(&mut self, update: FormUpdate) -> Result<(), DrafterError> {
        self.form.apply(update)?;
        Ok(())
    }

    pub fn prompt(&self) -> String {
        build_prompt(&self.form)
    }

    /// Build the prompt, call the generator and keep the text. On failure
    /// the previous text stays in place.
    pub fn generate(&mut self, generator: &dyn TextGenerator) -> Result<&str, DrafterError> {
        let prompt = self.prompt();
        let message = if is_aanmaning(&self.form) { AANMANING_FAILURE } else { GENERIC_FAILURE };
        let text = generator
            .generate(&prompt)
            .map_err(|source| DrafterError::Generation { message, source })?;
        Ok(self.generated.insert(text).as_str())
    }

    /// Run the extractor over a rendered page and merge the result. The form
    /// is only touched once the extractor has succeeded.
    pub fn extract(&mut self, extractor: &dyn FieldExtractor, image: &PageImage) -> Result<MergeReport, DrafterError> {
        let partial = extractor.extract(image).map_err(|e| DrafterError::Extraction(e.to_string()))?;
        Ok(self.form.merge_extracted(&partial))
    }

    /// Render page 1 of a PDF and extract from it.
    pub fn extract_pdf(
        &mut self,
        extractor: &dyn FieldExtractor,
        pdf: &Path,
        dpi: u32,
    ) -> Result<MergeReport, DrafterError> {
        let image = render_first_page(pdf, dpi)?;
        self.extract(extractor, &image)
    }

    pub fn export(&self) -> Result<ExportArtifact, DrafterError> {
        let text = match self.generated.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(DrafterError::NothingToExport),
        };
        let build = build_document(text);
        let bytes = write_docx(&build.tree)?;
        Ok(ExportArtifact {
            filename: export_filename(self.form.jenis_dokumen, &self.form.nomor_perkara),
            bytes,
            build,
        })
    }

    /// Metadata written next to an exported document.
    pub fn export_meta(&self, artifact: &ExportArtifact) -> serde_json::Value {
        let text = self.generated.as_deref().unwrap_or("");
        json!({
            "kind": self.form.jenis_dokumen.label(),
            "case_number": self.form.nomor_perkara,
            "filename": artifact.filename,
            "paragraphs": artifact.build.tree.body.len(),
            "found": artifact.build.found,
            "text_sha256": sha256_hex(text.as_bytes()),
            "docx_sha256": sha256_hex(&artifact.bytes),
        })
    }
}
