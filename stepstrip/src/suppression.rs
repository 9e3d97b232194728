//! `#pragma warning disable/restore` handling.
//!
//! A region opened by `#pragma warning disable` (bare, or listing
//! `DebuggerStepThroughRemover`) hides diagnostics until the matching
//! `restore` or the end of the file.

use crate::analyzer::{Diagnostic, Document};
use crate::constants::{DIAGNOSTIC_ID, PRAGMA_WARNING_RE};
use crate::syntax::{SyntaxTree, Trivia, TriviaKind};
use crate::utils::LineIndex;

/// Line regions where the diagnostic is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suppressions {
    /// Inclusive 1-based `(first, last)` line pairs
    regions: Vec<(usize, usize)>,
}

impl Suppressions {
    /// Collect pragma regions from the document's directive trivia.
    ///
    /// Only real directives count: `#pragma` text inside a string or a
    /// comment opens nothing.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let lines = LineIndex::new(document.text());
        let mut regions = Vec::new();
        let mut open: Option<usize> = None;

        for (offset, text) in directives(document.tree()) {
            let Some(caps) = PRAGMA_WARNING_RE().captures(&text) else {
                continue;
            };
            if !applies(caps.get(2).map_or("", |m| m.as_str())) {
                continue;
            }
            let line_no = lines.line_index(offset);
            match (&caps[1], open) {
                ("disable", None) => open = Some(line_no),
                ("restore", Some(start)) => {
                    regions.push((start, line_no));
                    open = None;
                }
                _ => {}
            }
        }

        if let Some(start) = open {
            regions.push((start, usize::MAX));
        }
        Self { regions }
    }

    /// Whether a diagnostic on `line` is hidden.
    #[must_use]
    pub fn is_suppressed(&self, line: usize) -> bool {
        self.regions
            .iter()
            .any(|&(first, last)| first <= line && line <= last)
    }

    /// Whether no region was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Split diagnostics into (kept, suppressed count).
    #[must_use]
    pub fn filter(&self, diagnostics: Vec<Diagnostic>) -> (Vec<Diagnostic>, usize) {
        if self.is_empty() {
            return (diagnostics, 0);
        }
        let total = diagnostics.len();
        let kept: Vec<Diagnostic> = diagnostics
            .into_iter()
            .filter(|d| !self.is_suppressed(d.location.line))
            .collect();
        let suppressed = total - kept.len();
        (kept, suppressed)
    }
}

/// Offset and text of every preprocessor directive, in source order.
fn directives(tree: &SyntaxTree) -> Vec<(usize, String)> {
    let mut found = Vec::new();
    for token in tree.root().tokens() {
        let mut offset = token.full_range().start;
        let mut visit = |pieces: &[Trivia], offset: &mut usize| {
            for piece in pieces {
                if piece.kind() == TriviaKind::Directive {
                    found.push((*offset, piece.text().to_owned()));
                }
                *offset += piece.len();
            }
        };
        visit(token.leading(), &mut offset);
        offset += token.text().len();
        visit(token.trailing(), &mut offset);
    }
    found
}

/// A bare pragma covers every warning; a list must name ours.
fn applies(ids: &str) -> bool {
    let mut ids = ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .peekable();
    ids.peek().is_none() || ids.any(|id| id == DIAGNOSTIC_ID)
}
