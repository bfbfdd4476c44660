// Disk-backed media store
//
// Uploads are written under a single directory that the router also serves
// at `/uploads`. Stored names are `<unix millis>-<sanitized client name>`.

use async_trait::async_trait;
use chrono::Utc;
use memorylane_core::{MediaItem, MediaKind, MediaStore, MediaUpload, TimelineError};
use std::path::{Path, PathBuf};

/// URL prefix under which stored files are served
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const FALLBACK_FILE_NAME: &str = "upload";

#[derive(Debug, Clone)]
pub struct DiskMediaStore {
    root: PathBuf,
}

impl DiskMediaStore {
    /// Use `root` as the upload directory, creating it if missing
    pub async fn create(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Reduce a client-supplied name to a single safe path segment
pub fn sanitize_file_name(name: Option<&str>) -> String {
    // Keep only the last path component, whichever separator the client used
    let base = name
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        _ => cleaned,
    }
}

#[async_trait]
impl MediaStore for DiskMediaStore {
    async fn store(&self, upload: MediaUpload) -> memorylane_core::Result<MediaItem> {
        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(upload.file_name.as_deref())
        );
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, &upload.bytes).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to write upload");
            TimelineError::media(format!("failed to store {}: {}", file_name, e))
        })?;

        tracing::debug!(file = %file_name, bytes = upload.bytes.len(), "Stored upload");

        Ok(MediaItem {
            kind: MediaKind::from_content_type(upload.content_type.as_deref()),
            url: format!("{}/{}", UPLOADS_URL_PREFIX, file_name),
        })
    }

    async fn remove(&self, item: &MediaItem) -> memorylane_core::Result<()> {
        let file_name = item
            .url
            .strip_prefix(UPLOADS_URL_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| sanitize_file_name(Some(*name)) == *name)
            .ok_or_else(|| TimelineError::media(format!("not a stored upload: {}", item.url)))?;
        let path = self.root.join(file_name);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(file = %file_name, "Removed upload");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TimelineError::media(format!(
                "failed to remove {}: {}",
                file_name, e
            ))),
        }
    }
}
