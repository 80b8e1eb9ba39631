//! Error types for gilt analytics.
//!
//! This module defines the error taxonomy used throughout the workspace,
//! providing structured error handling with context.

use thiserror::Error;

/// A specialized Result type for gilt operations.
pub type GiltResult<T> = Result<T, GiltError>;

/// The main error type for gilt analytics operations.
#[derive(Error, Debug, Clone)]
pub enum GiltError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A workbook cell or text fragment could not be parsed.
    ///
    /// Fatal to loading the source file it came from; never retried.
    #[error("Parse error: {reason}")]
    Parse {
        /// Description of what could not be parsed.
        reason: String,
    },

    /// A required column header is absent from a recognized header row.
    #[error("Missing required column '{column}' in worksheet header")]
    MissingColumn {
        /// The missing column header, as it appears in the workbook.
        column: String,
    },

    /// A date cell held a value type the parser does not support.
    #[error("Unsupported date cell: {reason}")]
    UnsupportedCell {
        /// Description of the offending cell.
        reason: String,
    },

    /// Requested ISIN is absent from the merged security set.
    #[error("ISIN not found in conventional gilts: {isin}")]
    NotFound {
        /// The ISIN that was requested.
        isin: String,
    },

    /// An input failed validation (price, tax rate, settlement date).
    #[error("Validation error: {reason}")]
    Validation {
        /// Description of the validation failure.
        reason: String,
    },

    /// Source-file discovery failed (missing directory, no matching files,
    /// unreadable file metadata).
    #[error("Source discovery error: {reason}")]
    SourceDiscovery {
        /// Description of the failure.
        reason: String,
    },
}

impl GiltError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    /// Creates a missing column error.
    #[must_use]
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Creates an unsupported cell error.
    #[must_use]
    pub fn unsupported_cell(reason: impl Into<String>) -> Self {
        Self::UnsupportedCell {
            reason: reason.into(),
        }
    }

    /// Creates a not-found error for an ISIN.
    #[must_use]
    pub fn not_found(isin: impl Into<String>) -> Self {
        Self::NotFound { isin: isin.into() }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Creates a source discovery error.
    #[must_use]
    pub fn source_discovery(reason: impl Into<String>) -> Self {
        Self::SourceDiscovery {
            reason: reason.into(),
        }
    }
}
