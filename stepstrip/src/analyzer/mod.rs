//! Detection of the `DebuggerStepThrough` marker.
//!
//! - `matcher`: decides whether an attribute denotes the marker
//! - `anchor`: the group/attribute tie-break shared with the rewriter
//! - `scanner`: walks declarations and emits diagnostics
//! - `document`: text, tree and bindings of one file

mod anchor;
mod declaration;
mod diagnostic;
mod document;
mod matcher;
mod scanner;

pub use anchor::Anchor;
pub use declaration::{
    attribute_lists, attributes, declaration_kind, display_name, enclosing_declaration,
    DeclarationKind,
};
pub use diagnostic::{Confidence, Diagnostic, Location, Severity};
pub use document::Document;
pub use matcher::{MatchMode, Matcher};
pub use scanner::{ScanOptions, Scanner};
