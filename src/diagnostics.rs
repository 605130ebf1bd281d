//! Structured diagnostics recorded during a load.
//!
//! The parser keeps two ordered lists of [`Diagnostic`] entries: recorded
//! errors (real problems that did not abort the load, such as dangling
//! cross-references) and warnings (tolerated irregularities, such as unknown
//! tags). Neither list ever interrupts parsing; fatal conditions are
//! [`crate::error::GedcomError`] instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded problem, with as much line context as was available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Human-readable description of the problem.
    pub message: String,
    /// Level number of the line involved, when known.
    pub line_level: Option<u8>,
    /// Tag of the line involved, when known.
    pub tag: Option<String>,
    /// Cross-reference id involved, when known.
    pub xref: Option<String>,
}

impl Diagnostic {
    /// A diagnostic carrying only a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            line_level: None,
            tag: None,
            xref: None,
        }
    }

    /// A diagnostic anchored to a tag at a level.
    #[must_use]
    pub fn at_tag(message: impl Into<String>, level: u8, tag: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            line_level: Some(level),
            tag: Some(tag.into()),
            xref: None,
        }
    }

    /// A diagnostic about a cross-reference id.
    #[must_use]
    pub fn at_xref(message: impl Into<String>, xref: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            line_level: None,
            tag: None,
            xref: Some(xref.into()),
        }
    }

    /// Attach a cross-reference id to this diagnostic.
    #[must_use]
    pub fn with_xref(mut self, xref: impl Into<String>) -> Self {
        self.xref = Some(xref.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(tag) = &self.tag {
            match self.line_level {
                Some(level) => write!(f, " (line \"{level} {tag}\")")?,
                None => write!(f, " (tag {tag})")?,
            }
        }
        if let Some(xref) = &self.xref {
            write!(f, " [{xref}]")?;
        }
        Ok(())
    }
}
