// ABOUTME: Asset pipeline contract consumed by image settings
// ABOUTME: Accepts raw image bytes under size/MIME constraints and returns a stable URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Asset Pipeline
//!
//! Image settings store a URL, never bytes. The pipeline turns an upload into
//! that URL; the settings engine treats the result as an opaque string value.
//! Compression, resizing and bucket layout are entirely the pipeline's
//! business.

/// Local filesystem pipeline
pub mod local;

pub use local::LocalAssetPipeline;

use crate::errors::UploadError;
use async_trait::async_trait;
use clinic_core::constants::assets;

/// Limits applied to an upload before it is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConstraints {
    /// Largest accepted file, in bytes
    pub max_bytes: usize,
    /// Accepted MIME types, lowercase
    pub accepted_mime_types: Vec<String>,
}

impl Default for UploadConstraints {
    fn default() -> Self {
        Self {
            max_bytes: assets::DEFAULT_MAX_BYTES,
            accepted_mime_types: assets::DEFAULT_MIME_TYPES
                .iter()
                .map(|&mime| mime.to_owned())
                .collect(),
        }
    }
}

impl UploadConstraints {
    /// Whether `mime` (parameters ignored, any case) is accepted
    #[must_use]
    pub fn accepts(&self, mime: &str) -> bool {
        let essence = mime_essence(mime);
        self.accepted_mime_types.iter().any(|m| *m == essence)
    }

    /// Check size and declared type
    ///
    /// # Errors
    ///
    /// Returns the first constraint the upload violates
    pub fn check(&self, bytes: &[u8], mime: &str) -> Result<(), UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }
        if !self.accepts(mime) {
            return Err(UploadError::UnsupportedType {
                mime: mime.to_owned(),
            });
        }
        Ok(())
    }
}

/// Lowercase MIME type without parameters (`image/SVG+xml; charset=utf-8` -> `image/svg+xml`)
#[must_use]
pub fn mime_essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Stores uploaded images and hands back the URL to persist
#[async_trait]
pub trait AssetPipeline: Send + Sync {
    /// Validate and store `bytes`, returning the asset's URL
    ///
    /// # Errors
    ///
    /// Returns an `UploadError` when a constraint is violated or storage fails
    async fn upload(
        &self,
        bytes: &[u8],
        mime: &str,
        constraints: &UploadConstraints,
    ) -> Result<String, UploadError>;
}
