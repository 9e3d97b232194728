//! Resolved type identities.

use compact_str::CompactString;
use serde::Serialize;
use std::fmt;

/// Where a type was declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolOrigin {
    /// A referenced assembly
    Metadata {
        /// Assembly the type lives in
        assembly: CompactString,
    },
    /// The analysed source file
    Source,
}

/// Identity of a declared type.
///
/// Two identities are equal iff they denote the same declared type, however
/// the name was spelled at the use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SymbolIdentity {
    metadata_name: CompactString,
    origin: SymbolOrigin,
}

impl SymbolIdentity {
    /// A type from referenced metadata
    #[must_use]
    pub fn metadata(
        metadata_name: impl Into<CompactString>,
        assembly: impl Into<CompactString>,
    ) -> Self {
        Self {
            metadata_name: metadata_name.into(),
            origin: SymbolOrigin::Metadata {
                assembly: assembly.into(),
            },
        }
    }

    /// A type declared in source
    #[must_use]
    pub fn source(metadata_name: impl Into<CompactString>) -> Self {
        Self {
            metadata_name: metadata_name.into(),
            origin: SymbolOrigin::Source,
        }
    }

    /// Fully qualified name, e.g. `System.ObsoleteAttribute`
    #[must_use]
    pub fn metadata_name(&self) -> &str {
        &self.metadata_name
    }

    /// Declaring origin
    #[must_use]
    pub const fn origin(&self) -> &SymbolOrigin {
        &self.origin
    }

    /// Name without its namespace
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.metadata_name
            .rsplit_once('.')
            .map_or(self.metadata_name.as_str(), |(_, name)| name)
    }
}

impl fmt::Display for SymbolIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            SymbolOrigin::Metadata { assembly } => {
                write!(f, "[{assembly}]{}", self.metadata_name)
            }
            SymbolOrigin::Source => write!(f, "{}", self.metadata_name),
        }
    }
}
