use crate::syntax::TextRange;

/// Error during fixing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixError {
    /// The location no longer identifies exactly one marker attribute
    #[error("No unique DebuggerStepThrough attribute at {range} ({candidates} candidates)")]
    StaleFixTarget {
        /// Requested anchor range
        range: TextRange,
        /// Number of attributes found at that range
        candidates: usize,
    },
    /// Two fixes target the same node or a node and its parent
    #[error("Fixes at {first} and {second} overlap")]
    OverlappingEdits {
        /// Range of the fix added first
        first: TextRange,
        /// Range of the conflicting fix
        second: TextRange,
    },
    /// The caller cancelled the operation
    #[error("Fix was cancelled")]
    Cancelled,
}
