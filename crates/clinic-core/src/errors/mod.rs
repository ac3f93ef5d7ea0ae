// ABOUTME: Unified error handling for the clinic admin configuration engine
// ABOUTME: Defines ErrorCode, AppError and conversions from the settings error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! `AppError` is the error type of the outer surfaces (CLI, bootstrap,
//! configuration). The engine itself returns the narrower types from
//! [`settings`] so callers can recover per failure kind; each of them
//! converts into `AppError` with a matching `ErrorCode`.

/// Settings engine error taxonomy
pub mod settings;

pub use settings::{
    CommitError, EditError, LoadError, TableError, UploadError, ValidationError,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard error codes used throughout the application
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Input rejected by validation
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Input has the wrong format
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,
    /// Input exceeds an allowed limit
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    /// Requested resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// Resource temporarily unavailable
    #[serde(rename = "RESOURCE_UNAVAILABLE")]
    ResourceUnavailable = 4003,

    // External Services (5000-5999)
    /// Remote collaborator failed
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,
    /// Remote collaborator did not answer in time
    #[serde(rename = "EXTERNAL_SERVICE_UNAVAILABLE")]
    ExternalServiceUnavailable = 5001,

    // Configuration (6000-6999)
    /// Configuration could not be applied
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,
    /// Configuration value is malformed
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// Database statement failed
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// File storage failed
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    /// Data serialization/deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
    /// Operation abandoned by the caller
    #[serde(rename = "CANCELLED")]
    Cancelled = 9100,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceUnavailable => "The resource is temporarily unavailable",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
            Self::Cancelled => "The operation was cancelled",
        }
    }

    /// Whether retrying the same operation later may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ResourceUnavailable
                | Self::ExternalServiceError
                | Self::ExternalServiceUnavailable
                | Self::DatabaseError
                | Self::Cancelled
        )
    }
}

/// Unified error type for the application
#[derive(Debug)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        let code = match error {
            ValidationError::UnknownKey { .. } => ErrorCode::ResourceNotFound,
            ValidationError::TypeMismatch { .. } => ErrorCode::InvalidInput,
            ValidationError::NotNumeric { .. }
            | ValidationError::MissingNumber { .. }
            | ValidationError::InvalidBoolean { .. }
            | ValidationError::InvalidColor { .. } => ErrorCode::InvalidFormat,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<TableError> for AppError {
    fn from(error: TableError) -> Self {
        let code = match error {
            TableError::NotFound { .. } => ErrorCode::ResourceNotFound,
            TableError::Unavailable(_) => ErrorCode::ResourceUnavailable,
            TableError::Database(_) => ErrorCode::DatabaseError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<LoadError> for AppError {
    fn from(error: LoadError) -> Self {
        let code = match &error {
            LoadError::Table(TableError::Unavailable(_)) => ErrorCode::ResourceUnavailable,
            LoadError::Table(_) => ErrorCode::DatabaseError,
            LoadError::InvalidRow { .. } | LoadError::DuplicateKey { .. } => {
                ErrorCode::SerializationError
            }
            LoadError::TimedOut { .. } => ErrorCode::ExternalServiceUnavailable,
            LoadError::Cancelled => ErrorCode::Cancelled,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<UploadError> for AppError {
    fn from(error: UploadError) -> Self {
        let code = match error {
            UploadError::Empty | UploadError::ContentMismatch { .. } => ErrorCode::InvalidInput,
            UploadError::TooLarge { .. } => ErrorCode::ValueOutOfRange,
            UploadError::UnsupportedType { .. } => ErrorCode::InvalidFormat,
            UploadError::Storage(_) => ErrorCode::StorageError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<CommitError> for AppError {
    fn from(error: CommitError) -> Self {
        let code = match &error {
            CommitError::Table(TableError::NotFound { .. }) => ErrorCode::ResourceNotFound,
            CommitError::Table(_) => ErrorCode::DatabaseError,
            CommitError::TimedOut { .. } => ErrorCode::ExternalServiceUnavailable,
            CommitError::Cancelled => ErrorCode::Cancelled,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

impl From<EditError> for AppError {
    fn from(error: EditError) -> Self {
        match error {
            EditError::Validation(inner) => inner.into(),
            EditError::Upload(inner) => inner.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::new(ErrorCode::StorageError, error.to_string()).with_source(error)
    }
}
