use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("WriteFailed: {0}")]
    WriteFailed(String),
}

impl From<std::io::Error> for EmitError {
    fn from(e: std::io::Error) -> Self {
        EmitError::WriteFailed(e.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitPaths {
    pub docx_path: String,
    pub meta_path: String,
}

/// Place `body` at `target` through a sibling temp file, so readers never
/// see a half-written export.
fn replace_file(target: &Path, body: &[u8]) -> Result<(), EmitError> {
    let dir = target.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(body)?;
    staged.persist(target).map_err(|e| EmitError::WriteFailed(e.error.to_string()))?;
    Ok(())
}

/// Write the document and its meta JSON side by side in `outdir`.
///
/// `filename` ends in `.docx`; the sidecar takes the same stem with
/// `.meta.json`.
pub fn emit_export(docx: &[u8], meta: &serde_json::Value, outdir: &str, filename: &str) -> Result<EmitPaths, EmitError> {
    let outdir = Path::new(outdir);
    std::fs::create_dir_all(outdir)?;
    let stem = filename.strip_suffix(".docx").unwrap_or(filename);
    let docx_path: PathBuf = outdir.join(format!("{stem}.docx"));
    let meta_path: PathBuf = outdir.join(format!("{stem}.meta.json"));

    let meta_body = serde_json::to_vec_pretty(meta).map_err(|e| EmitError::WriteFailed(e.to_string()))?;
    replace_file(&docx_path, docx)?;
    replace_file(&meta_path, &meta_body)?;

    Ok(EmitPaths {
        docx_path: docx_path.display().to_string(),
        meta_path: meta_path.display().to_string(),
    })
}

/// Write one `--dump-steps` file, creating the directory as needed.
pub fn write_artifact(dir: &Path, name: &str, body: &[u8]) -> Result<String, EmitError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    std::fs::write(&path, body)?;
    Ok(path.display().to_string())
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
