//! Finding marker attributes in a document.

use super::anchor::Anchor;
use super::declaration::{attribute_lists, attributes, declaration_kind, display_name, DeclarationKind};
use super::diagnostic::{Diagnostic, Location};
use super::document::Document;
use super::matcher::{MatchMode, Matcher};
use crate::constants::MARKER_SHORT_NAME;
use crate::semantic::SemanticBindings;
use crate::utils::LineIndex;
use serde::{Deserialize, Serialize};

/// Scanner settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Identity or name matching
    pub mode: MatchMode,
    /// Also visit methods, constructors, accessors and local functions
    pub include_members: bool,
}

/// Walks declarations and reports every marker attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    /// Create a scanner
    #[must_use]
    pub const fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Settings in use
    #[must_use]
    pub const fn options(&self) -> ScanOptions {
        self.options
    }

    /// Report every marker attribute in `document`, in source order.
    #[must_use]
    pub fn scan(&self, document: &Document) -> Vec<Diagnostic> {
        self.scan_with(document, document.model())
    }

    /// [`Self::scan`] with caller-supplied bindings instead of the
    /// document's own model.
    #[must_use]
    pub fn scan_with<B>(&self, document: &Document, model: &B) -> Vec<Diagnostic>
    where
        B: SemanticBindings + ?Sized,
    {
        let matcher = Matcher::new(self.options.mode, model);
        let line_index = LineIndex::new(document.text());
        let mut diagnostics = Vec::new();

        for node in document.tree().root().descendants() {
            let Some(kind) = declaration_kind(&node, self.options.include_members) else {
                continue;
            };
            for list in attribute_lists(&node) {
                for attribute in attributes(&list) {
                    if !matcher.matches(&attribute, model) {
                        continue;
                    }
                    let Some(anchor) = Anchor::for_attribute(&attribute) else {
                        continue;
                    };
                    let location = Location::new(anchor.range(), document.text(), &line_index);
                    diagnostics.push(Diagnostic::warning(
                        message(&display_name(&node, kind), kind),
                        location,
                        matcher.confidence(),
                    ));
                }
            }
        }

        log::debug!(
            "{}: {} diagnostic(s)",
            document
                .path()
                .map_or_else(|| "<memory>".into(), |p| p.display().to_string()),
            diagnostics.len()
        );
        diagnostics
    }
}

fn message(name: &str, kind: DeclarationKind) -> String {
    match kind {
        DeclarationKind::Type => {
            format!("Type '{name}' is decorated with {MARKER_SHORT_NAME} attribute")
        }
        DeclarationKind::Member => {
            format!("Member '{name}' is decorated with {MARKER_SHORT_NAME} attribute")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Confidence;

    fn scan(source: &str, options: ScanOptions) -> Vec<Diagnostic> {
        let document = Document::parse(source).expect("parse");
        Scanner::new(options).scan(&document)
    }

    #[test]
    fn test_message_and_severity() {
        let diagnostics = scan(
            "using System.Diagnostics;\n[DebuggerStepThrough]\nclass Worker {}\n",
            ScanOptions::default(),
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "DebuggerStepThroughRemover");
        assert_eq!(
            diagnostics[0].message,
            "Type 'Worker' is decorated with DebuggerStepThrough attribute"
        );
        assert_eq!(diagnostics[0].confidence, Confidence::High);
        assert_eq!((diagnostics[0].location.line, diagnostics[0].location.column), (2, 1));
    }

    #[test]
    fn test_members_only_when_enabled() {
        let source = "using System.Diagnostics;\nclass Outer\n{\n    class Inner\n    {\n        [DebuggerStepThrough]\n        void Run() {}\n        int Size { [DebuggerStepThrough] get; set; }\n    }\n}\n";
        assert!(scan(source, ScanOptions::default()).is_empty());

        let options = ScanOptions {
            include_members: true,
            ..ScanOptions::default()
        };
        let messages: Vec<String> = scan(source, options).into_iter().map(|d| d.message).collect();
        assert_eq!(
            messages,
            vec![
                "Member 'Outer.Inner.Run' is decorated with DebuggerStepThrough attribute",
                "Member 'Outer.Inner.Size.get' is decorated with DebuggerStepThrough attribute",
            ]
        );
    }

    #[test]
    fn test_textual_mode_ignores_bindings() {
        let source = "namespace Mine { class DebuggerStepThroughAttribute : System.Attribute {} }\n[Mine.DebuggerStepThrough]\nclass T {}\n";
        assert!(scan(source, ScanOptions::default()).is_empty());

        let options = ScanOptions {
            mode: MatchMode::Textual,
            ..ScanOptions::default()
        };
        let diagnostics = scan(source, options);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].confidence, Confidence::Low);
    }
}
