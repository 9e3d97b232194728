//! Diagnostics reported by the scanner.

use crate::constants::DIAGNOSTIC_ID;
use crate::syntax::TextRange;
use crate::utils::LineIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, never fails compilation
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// How the attribute was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// The attribute binds to the marker type
    High,
    /// Only the spelling matched
    Low,
}

/// Where a diagnostic points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Anchor span, trivia excluded
    pub range: TextRange,
    /// 1-based line of the anchor start
    pub line: usize,
    /// 1-based column of the anchor start, in UTF-16 code units
    pub column: usize,
}

impl Location {
    /// Location of `range` in `source`
    #[must_use]
    pub fn new(range: TextRange, source: &str, line_index: &LineIndex) -> Self {
        let (line, column) = line_index.line_col(source, range.start);
        Self {
            range,
            line,
            column,
        }
    }
}

/// A single marker occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Always [`DIAGNOSTIC_ID`]
    pub id: String,
    /// Human readable description
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Anchor location
    pub location: Location,
    /// Match confidence
    pub confidence: Confidence,
}

impl Diagnostic {
    /// Create a warning with the standard id
    #[must_use]
    pub fn warning(message: impl Into<String>, location: Location, confidence: Confidence) -> Self {
        Self {
            id: DIAGNOSTIC_ID.to_owned(),
            message: message.into(),
            severity: Severity::Warning,
            location,
            confidence,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} {}: {}",
            self.location.line, self.location.column, self.severity, self.id, self.message
        )
    }
}
