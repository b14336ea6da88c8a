use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::{errors::AppError, settings::AppConfig};

pub const RESUME_FIELD: &str = "resume";
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const ZIP_MIME: &str = "application/zip";

/// A file as handed over by the multipart extractor, before any checks.
#[derive(Debug, Clone, Copy)]
pub struct IncomingResume<'a> {
    pub file_name: Option<&'a str>,
    pub size: usize,
    pub path: &'a Path,
}

/// Validates resume uploads and moves accepted ones into the transient
/// upload directory.
#[derive(Debug, Clone)]
pub struct UploadReceiver {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadReceiver {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        UploadReceiver {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.max_upload_bytes)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Size is checked first, then the extension, then the sniffed content.
    #[instrument(skip(self, incoming), fields(size = incoming.size, file_name = ?incoming.file_name))]
    pub async fn accept(&self, incoming: IncomingResume<'_>) -> Result<StoredResume, AppError> {
        if incoming.size > self.max_bytes {
            tracing::warn!(limit = self.max_bytes, "Rejected oversized resume");
            return Err(self.too_large());
        }

        let original_name = incoming
            .file_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::field(RESUME_FIELD, "Resume file name is missing"))?;

        let extension = allowed_extension(original_name)?;
        check_content(incoming.path, extension)?;

        self.ensure_dir().await?;
        let destination = self.dir.join(stored_file_name(original_name));
        tokio::fs::copy(incoming.path, &destination).await?;

        tracing::info!(path = %destination.display(), "Resume stored");
        Ok(StoredResume {
            path: destination,
            original_name: original_name.to_string(),
            discarded: false,
        })
    }

    pub fn too_large_message(&self) -> String {
        format!("File too large. Maximum size is {}", human_size(self.max_bytes))
    }

    fn too_large(&self) -> AppError {
        AppError::field(RESUME_FIELD, self.too_large_message())
    }
}

fn allowed_extension(file_name: &str) -> Result<&'static str, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    extension
        .and_then(|ext| ALLOWED_EXTENSIONS.iter().copied().find(|allowed| *allowed == ext))
        .ok_or_else(|| AppError::field(RESUME_FIELD, "Only .pdf, .docx, and .txt files are allowed"))
}

/// Rejects files whose detected type contradicts the extension. Files with
/// no recognizable signature pass.
fn check_content(path: &Path, extension: &str) -> Result<(), AppError> {
    let Some(kind) = infer::get_from_path(path)? else {
        return Ok(());
    };

    let mime = kind.mime_type();
    let consistent = match extension {
        "pdf" => mime == PDF_MIME,
        "docx" => mime == DOCX_MIME || mime == ZIP_MIME,
        _ => mime.starts_with("text/"),
    };

    if consistent {
        Ok(())
    } else {
        tracing::warn!(detected = mime, extension, "Resume content does not match its extension");
        Err(AppError::field(RESUME_FIELD, format!("File content does not match the .{} extension", extension)))
    }
}

fn stored_file_name(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(RESUME_FIELD);

    let sanitized: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    let nonce = Uuid::new_v4().simple().to_string();
    format!("{}-{}-{}", Utc::now().timestamp_millis(), &nonce[..8], sanitized)
}

fn human_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

/// An accepted resume on disk. Removed by [`StoredResume::discard`], or on
/// drop if the owner never got that far.
#[derive(Debug)]
pub struct StoredResume {
    path: PathBuf,
    original_name: String,
    discarded: bool,
}

impl StoredResume {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub async fn discard(mut self) {
        self.discarded = true;
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), "Failed to delete resume: {}", e);
        }
    }
}

impl Drop for StoredResume {
    fn drop(&mut self) {
        if self.discarded {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(path = %self.path.display(), "Failed to delete resume: {}", e);
        }
    }
}
