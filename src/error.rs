//! Error types for GEDCOM parsing.
//!
//! This module provides the [`GedcomError`] type for fatal parse conditions,
//! the [`Result`] convenience type, and [`ParseFailure`], which a failed load
//! returns to the caller together with every diagnostic accumulated before
//! the failure.

use crate::diagnostics::Diagnostic;
use thiserror::Error;

/// Fatal error conditions during a GEDCOM load.
///
/// Non-fatal problems (dangling cross-references, unknown tags, cardinality
/// violations, ...) never surface here; they accumulate as [`Diagnostic`]
/// entries on the parser instead. A `GedcomError` always aborts the load.
#[derive(Error, Debug)]
pub enum GedcomError {
    /// The file declares (or implies) a character encoding this library
    /// cannot read, or declares none at all.
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// A line could not be tokenized: missing or out-of-range level number,
    /// or no tag after the level.
    #[error("Malformed line {line_num}: {message}")]
    MalformedLine {
        /// One-based number of the offending logical line.
        line_num: usize,
        /// What was wrong with it.
        message: String,
    },

    /// The file does not begin with a `0 HEAD` record.
    #[error("Missing header: {0}")]
    MissingHeader(String),

    /// The file does not end with a `0 TRLR` record.
    #[error("Missing trailer: {0}")]
    MissingTrailer(String),

    /// The cancellation flag was set while the load was in progress.
    #[error("Parse cancelled")]
    Cancelled,

    /// IO error from the underlying byte source.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl GedcomError {
    /// Whether this error is the distinguished cancellation condition.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, GedcomError::Cancelled)
    }
}

/// Convenience type alias for [`std::result::Result`] with [`GedcomError`].
pub type Result<T> = std::result::Result<T, GedcomError>;

/// A failed load: the fatal error plus everything recorded before it.
///
/// The partially-built object graph is discarded on failure; the diagnostic
/// lists are not, so callers can still report what the parser saw up to the
/// point of the failure.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct ParseFailure {
    /// The condition that aborted the load.
    #[source]
    pub error: GedcomError,
    /// Recorded (non-fatal) errors accumulated before the failure.
    pub errors: Vec<Diagnostic>,
    /// Warnings accumulated before the failure.
    pub warnings: Vec<Diagnostic>,
}

impl ParseFailure {
    /// Whether the load failed because it was cancelled.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        self.error.is_cancellation()
    }
}
