//! Removal of marker attributes.
//!
//! Fixes are node substitutions on the immutable syntax tree: the rewriter
//! re-locates each attribute from its diagnostic range, plans one edit per
//! attribute group and applies all edits in a single pass. The original
//! document is never modified.
//!
//! # Usage
//!
//! ```
//! use stepstrip::analyzer::{Document, ScanOptions, Scanner};
//! use stepstrip::fix::Rewriter;
//!
//! let source = "using System.Diagnostics;\n[Serializable, DebuggerStepThrough]\nclass T {}\n";
//! let document = Document::parse(source).expect("should parse");
//! let diagnostics = Scanner::new(ScanOptions::default()).scan(&document);
//! let ranges: Vec<_> = diagnostics.iter().map(|d| d.location.range).collect();
//! let fixed = Rewriter::default().fix_all(&document, &ranges).expect("should fix");
//! assert_eq!(fixed.text(), "using System.Diagnostics;\n[Serializable]\nclass T {}\n");
//! ```

mod apply;
mod edit;
mod error;
mod rewriter;

pub use apply::apply_edits;
pub use edit::{attribute_removal, group_removal, EditAction, NodeEdit};
pub use error::FixError;
pub use rewriter::{CancellationToken, Rewriter};
