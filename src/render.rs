use std::path::Path;
use std::process::Command;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const RENDER_TOOL: &str = "pdftoppm";
pub const JPEG_MIME: &str = "image/jpeg";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepsResult {
    pub ok: bool,
    pub missing: Vec<String>,
}

/// Check the external tools page rendering needs.
/// Only `pdftoppm` (Poppler) is required.
pub fn check_deps() -> DepsResult {
    let mut missing = Vec::new();
    if which::which(RENDER_TOOL).is_err() {
        missing.push(RENDER_TOOL.to_string());
    }
    DepsResult { ok: missing.is_empty(), missing }
}

/// Render Nala installation help for missing deps.
pub fn nala_help_for(missing: &[String]) -> String {
    if !missing.iter().any(|m| m == RENDER_TOOL) {
        return String::new();
    }
    "Dependency missing. Install via Nala:\n  sudo nala install poppler-utils".to_string()
}

/// A rendered page ready to be sent inline to the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl PageImage {
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        PageImage { mime: JPEG_MIME.to_string(), bytes }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("FileNotFound: {0}")]
    FileNotFound(String),
    #[error("ToolMissing: {0}")]
    ToolMissing(String),
    #[error("RenderFailed: {0}")]
    Failed(String),
}

/// Render page 1 of `path` to JPEG at `dpi`.
///
/// Output goes to a temp dir and is read back into memory.
pub fn render_first_page(path: &Path, dpi: u32) -> Result<PageImage, RenderError> {
    if !path.exists() {
        return Err(RenderError::FileNotFound(path.display().to_string()));
    }
    if which::which(RENDER_TOOL).is_err() {
        return Err(RenderError::ToolMissing(RENDER_TOOL.to_string()));
    }
    let tmpdir = tempfile::tempdir().map_err(|e| RenderError::Failed(e.to_string()))?;
    let prefix = tmpdir.path().join("page");
    let image_path = prefix.with_extension("jpg");

    let out = Command::new(RENDER_TOOL)
        .arg("-jpeg")
        .arg("-singlefile")
        .arg("-r").arg(dpi.to_string())
        .arg("-f").arg("1")
        .arg("-l").arg("1")
        .arg(path)
        .arg(&prefix)
        .output()
        .map_err(|e| RenderError::Failed(e.to_string()))?;
    if !out.status.success() {
        let err = String::from_utf8_lossy(&out.stderr).trim().to_string();
        return Err(RenderError::Failed(format!("pdftoppm_exit_{}: {}", out.status.code().unwrap_or(-1), err)));
    }

    let bytes = std::fs::read(&image_path).map_err(|_| RenderError::Failed("image_missing".into()))?;
    if bytes.is_empty() {
        return Err(RenderError::Failed("image_zero_size".into()));
    }
    Ok(PageImage::jpeg(bytes))
}
