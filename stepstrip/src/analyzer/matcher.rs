//! Recognising the marker attribute.

use super::diagnostic::Confidence;
use crate::constants::{ATTRIBUTE_SUFFIX, MARKER_METADATA_NAME, MARKER_SHORT_NAME};
use crate::semantic::{SemanticBindings, SymbolIdentity, TypeName};
use crate::syntax::SyntaxNode;
use serde::{Deserialize, Serialize};

/// How attributes are compared with the marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Compare resolved type identities
    #[default]
    Semantic,
    /// Compare the written name only
    Textual,
}

/// Decides whether an attribute node denotes the marker type.
#[derive(Debug, Clone)]
pub struct Matcher {
    mode: MatchMode,
    target: Option<SymbolIdentity>,
}

impl Matcher {
    /// Create a matcher for one binding context.
    ///
    /// In semantic mode the marker identity is looked up once here. If the
    /// bindings do not know the marker type, nothing matches.
    #[must_use]
    pub fn new<B>(mode: MatchMode, bindings: &B) -> Self
    where
        B: SemanticBindings + ?Sized,
    {
        let target = match mode {
            MatchMode::Semantic => {
                let target = bindings.metadata_type(MARKER_METADATA_NAME);
                if target.is_none() {
                    log::debug!("{MARKER_METADATA_NAME} is not a known metadata type");
                }
                target
            }
            MatchMode::Textual => None,
        };
        Self { mode, target }
    }

    /// Semantic matcher
    #[must_use]
    pub fn semantic<B>(bindings: &B) -> Self
    where
        B: SemanticBindings + ?Sized,
    {
        Self::new(MatchMode::Semantic, bindings)
    }

    /// Name-only matcher
    #[must_use]
    pub const fn textual() -> Self {
        Self {
            mode: MatchMode::Textual,
            target: None,
        }
    }

    /// Matching mode
    #[must_use]
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The marker identity, when resolved
    #[must_use]
    pub const fn target(&self) -> Option<&SymbolIdentity> {
        self.target.as_ref()
    }

    /// Confidence attached to diagnostics produced by this matcher
    #[must_use]
    pub const fn confidence(&self) -> Confidence {
        match self.mode {
            MatchMode::Semantic => Confidence::High,
            MatchMode::Textual => Confidence::Low,
        }
    }

    /// Whether `attribute` denotes the marker.
    ///
    /// Attributes whose name does not resolve never match.
    pub fn matches<B>(&self, attribute: &SyntaxNode, bindings: &B) -> bool
    where
        B: SemanticBindings + ?Sized,
    {
        match self.mode {
            MatchMode::Semantic => self.target.as_ref().is_some_and(|target| {
                bindings.resolve_attribute(attribute).as_ref() == Some(target)
            }),
            MatchMode::Textual => TypeName::of_attribute(attribute).is_some_and(|name| {
                let last = name.last();
                last == MARKER_SHORT_NAME
                    || last
                        .strip_suffix(ATTRIBUTE_SUFFIX)
                        .is_some_and(|stem| stem == MARKER_SHORT_NAME)
            }),
        }
    }
}
