// ABOUTME: Filesystem asset pipeline storing uploads content-addressed by SHA-256
// ABOUTME: Sniffs image magic bytes against the declared MIME type before writing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{mime_essence, AssetPipeline, UploadConstraints};
use crate::errors::UploadError;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Writes uploads to a directory served under `base_url`
///
/// Identical files map to the same name, so re-uploading a logo yields the
/// same URL and no new file.
#[derive(Debug, Clone)]
pub struct LocalAssetPipeline {
    dir: PathBuf,
    base_url: String,
}

impl LocalAssetPipeline {
    /// Create a pipeline writing into `dir`
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }

    /// Directory uploads are written to
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl AssetPipeline for LocalAssetPipeline {
    async fn upload(
        &self,
        bytes: &[u8],
        mime: &str,
        constraints: &UploadConstraints,
    ) -> Result<String, UploadError> {
        constraints.check(bytes, mime)?;

        let essence = mime_essence(mime);
        if let Some(matches) = content_matches(&essence, bytes) {
            if !matches {
                return Err(UploadError::ContentMismatch { declared: essence });
            }
        }

        let digest = hex::encode(Sha256::digest(bytes));
        let file_name = format!("{digest}.{}", extension_for(&essence));
        let path = self.dir.join(&file_name);

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UploadError::Storage(format!("{}: {e}", self.dir.display())))?;

        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!(file = %file_name, "Asset already stored");
        } else {
            fs::write(&path, bytes)
                .await
                .map_err(|e| UploadError::Storage(format!("{}: {e}", path.display())))?;
            info!(file = %file_name, size = bytes.len(), mime = %essence, "Stored asset");
        }

        Ok(format!("{}/{file_name}", self.base_url.trim_end_matches('/')))
    }
}

fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}

/// `None` when the type has no known signature
fn content_matches(mime: &str, bytes: &[u8]) -> Option<bool> {
    let matches = match mime {
        "image/png" => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "image/jpeg" => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
        "image/gif" => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
        "image/webp" => bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP"),
        "image/svg+xml" => {
            let head = &bytes[..bytes.len().min(1024)];
            String::from_utf8_lossy(head).contains("<svg")
        }
        _ => return None,
    };
    Some(matches)
}
