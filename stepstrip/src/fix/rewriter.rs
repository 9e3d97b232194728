//! Removing marker attributes located by diagnostics.

use super::apply::apply_edits;
use super::edit::EditPlan;
use super::error::FixError;
use crate::analyzer::{
    attribute_lists, attributes, enclosing_declaration, Anchor, Document, Matcher, ScanOptions,
};
use crate::syntax::TextRange;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between a caller and a running fix.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that is not cancelled
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), FixError> {
        if self.is_cancelled() {
            Err(FixError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Produces fixed documents from diagnostic locations.
///
/// The rewriter must use the same [`ScanOptions`] as the scanner that
/// produced the locations, otherwise attributes may not be re-located.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rewriter {
    options: ScanOptions,
}

impl Rewriter {
    /// Create a rewriter
    #[must_use]
    pub const fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Remove the marker anchored at `range`.
    ///
    /// # Errors
    ///
    /// Returns [`FixError::StaleFixTarget`] if `range` does not identify
    /// exactly one marker attribute in `document`.
    pub fn fix(&self, document: &Document, range: TextRange) -> Result<Document, FixError> {
        self.fix_all(document, &[range])
    }

    /// Remove every marker anchored at `ranges` in one pass.
    ///
    /// # Errors
    ///
    /// Returns [`FixError::StaleFixTarget`] for a range that cannot be
    /// re-located and [`FixError::OverlappingEdits`] when two ranges
    /// target the same attribute or a group and one of its attributes.
    pub fn fix_all(&self, document: &Document, ranges: &[TextRange]) -> Result<Document, FixError> {
        self.fix_all_with_cancellation(document, ranges, &CancellationToken::new())
    }

    /// [`Self::fix_all`], checking `cancel` before each step.
    ///
    /// # Errors
    ///
    /// As [`Self::fix_all`], plus [`FixError::Cancelled`]. A cancelled fix
    /// never yields a partially edited document.
    pub fn fix_all_with_cancellation(
        &self,
        document: &Document,
        ranges: &[TextRange],
        cancel: &CancellationToken,
    ) -> Result<Document, FixError> {
        let matcher = Matcher::new(self.options.mode, document.model());
        let mut plan = EditPlan::default();
        for &range in ranges {
            cancel.check()?;
            let anchor = self.locate(document, &matcher, range)?;
            plan.add(&anchor)?;
        }
        cancel.check()?;

        if plan.len() == 0 {
            return Ok(document.clone());
        }
        let edits = plan.into_edits();
        log::debug!("Applying {} edit(s)", edits.len());
        let root = apply_edits(document.tree().root(), &edits);
        Ok(document.with_syntax_root(root))
    }

    /// Find the marker whose anchor span is exactly `range`.
    fn locate(
        &self,
        document: &Document,
        matcher: &Matcher,
        range: TextRange,
    ) -> Result<Anchor, FixError> {
        let stale = |candidates| FixError::StaleFixTarget { range, candidates };
        let token = document
            .tree()
            .root()
            .token_at_offset(range.start)
            .ok_or_else(|| stale(0))?;
        let (declaration, _) = enclosing_declaration(token.parent(), self.options.include_members)
            .ok_or_else(|| stale(0))?;

        let mut candidates: Vec<Anchor> = attribute_lists(&declaration)
            .flat_map(|list| attributes(&list).collect::<Vec<_>>())
            .filter(|attribute| matcher.matches(attribute, document.model()))
            .filter_map(|attribute| Anchor::for_attribute(&attribute))
            .filter(|anchor| anchor.range() == range)
            .collect();

        match candidates.len() {
            1 => candidates.pop().ok_or_else(|| stale(0)),
            n => Err(stale(n)),
        }
    }
}
