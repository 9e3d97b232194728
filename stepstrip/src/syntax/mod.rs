//! Lossless C# syntax trees.
//!
//! [`CsParser`] turns source text into a [`SyntaxTree`] whose tokens carry
//! their surrounding whitespace and comments as trivia. The tree is immutable;
//! edits produce a new green root that shares unchanged subtrees with the old
//! one.

mod green;
mod kind;
mod node;
mod parser;
mod range;

pub use green::{
    split_trivia, trivia_width, GreenElement, GreenNode, GreenToken, Trivia, TriviaKind,
    TriviaList,
};
pub use kind::SyntaxKind;
pub use node::{Descendants, SyntaxElement, SyntaxNode, SyntaxToken, SyntaxTree};
pub use parser::{CsParser, ParseError};
pub use range::TextRange;
