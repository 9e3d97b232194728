//! Immutable, position-independent tree storage.
//!
//! Green nodes know their width but not their offset, so unchanged subtrees
//! can be shared between an original tree and a rewritten one.

use super::kind::SyntaxKind;
use compact_str::CompactString;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Kind of a trivia piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriviaKind {
    /// Spaces, tabs, form feeds
    Whitespace,
    /// `\n`, `\r\n` or `\r`
    EndOfLine,
    /// Line, block or doc comment
    Comment,
    /// A single-line preprocessor directive such as `#pragma` or `#region`
    Directive,
    /// Source text the parser did not attach to any token
    Skipped,
}

/// Non-semantic source text attached to a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trivia {
    kind: TriviaKind,
    text: CompactString,
}

impl Trivia {
    /// Create a trivia piece
    #[must_use]
    pub fn new(kind: TriviaKind, text: impl Into<CompactString>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Kind of this piece
    #[must_use]
    pub const fn kind(&self) -> TriviaKind {
        self.kind
    }

    /// Text of this piece
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the piece is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether this piece is a line break
    #[must_use]
    pub fn is_end_of_line(&self) -> bool {
        self.kind == TriviaKind::EndOfLine
    }
}

/// Trivia attached to one side of a token.
pub type TriviaList = SmallVec<[Trivia; 2]>;

/// Total byte width of a trivia list.
#[must_use]
pub fn trivia_width(list: &[Trivia]) -> usize {
    list.iter().map(Trivia::len).sum()
}

/// Split raw inter-token text into trivia pieces.
#[must_use]
pub fn split_trivia(text: &str) -> TriviaList {
    let mut pieces = TriviaList::new();
    let mut rest = text;
    while let Some(first) = rest.chars().next() {
        let (kind, len) = match first {
            '\r' if rest.starts_with("\r\n") => (TriviaKind::EndOfLine, 2),
            '\n' | '\r' => (TriviaKind::EndOfLine, 1),
            c if is_inline_space(c) => (
                TriviaKind::Whitespace,
                rest.find(|c: char| !is_inline_space(c)).unwrap_or(rest.len()),
            ),
            _ => (
                TriviaKind::Skipped,
                rest.find(|c: char| is_inline_space(c) || c == '\n' || c == '\r')
                    .unwrap_or(rest.len()),
            ),
        };
        let (piece, tail) = rest.split_at(len);
        pieces.push(Trivia::new(kind, piece));
        rest = tail;
    }
    pieces
}

fn is_inline_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{0B}' | '\u{0C}')
}

/// A token: its text plus the trivia that surrounds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenToken {
    kind: SyntaxKind,
    raw_kind: &'static str,
    field: Option<&'static str>,
    text: CompactString,
    leading: TriviaList,
    trailing: TriviaList,
}

impl GreenToken {
    /// Create a token without trivia
    #[must_use]
    pub fn new(kind: SyntaxKind, raw_kind: &'static str, text: impl Into<CompactString>) -> Self {
        Self {
            kind,
            raw_kind,
            field: None,
            text: text.into(),
            leading: TriviaList::new(),
            trailing: TriviaList::new(),
        }
    }

    /// Set the field name this token occupies in its parent
    #[must_use]
    pub fn with_field(mut self, field: Option<&'static str>) -> Self {
        self.field = field;
        self
    }

    /// Replace the leading trivia
    #[must_use]
    pub fn with_leading(mut self, leading: TriviaList) -> Self {
        self.leading = leading;
        self
    }

    /// Replace the trailing trivia
    #[must_use]
    pub fn with_trailing(mut self, trailing: TriviaList) -> Self {
        self.trailing = trailing;
        self
    }

    pub(crate) fn push_trailing(&mut self, trivia: Trivia) {
        self.trailing.push(trivia);
    }

    /// Token kind
    #[must_use]
    pub const fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Tree-sitter kind name
    #[must_use]
    pub const fn raw_kind(&self) -> &'static str {
        self.raw_kind
    }

    /// Field name in the parent, if any
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        self.field
    }

    /// Token text without trivia
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Leading trivia
    #[must_use]
    pub fn leading(&self) -> &[Trivia] {
        &self.leading
    }

    /// Trailing trivia
    #[must_use]
    pub fn trailing(&self) -> &[Trivia] {
        &self.trailing
    }

    /// Width of the leading trivia
    #[must_use]
    pub fn leading_width(&self) -> usize {
        trivia_width(&self.leading)
    }

    /// Width of the trailing trivia
    #[must_use]
    pub fn trailing_width(&self) -> usize {
        trivia_width(&self.trailing)
    }

    /// Width including trivia
    #[must_use]
    pub fn full_width(&self) -> usize {
        self.leading_width() + self.text.len() + self.trailing_width()
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        for piece in &self.leading {
            out.push_str(piece.text());
        }
        out.push_str(&self.text);
        for piece in &self.trailing {
            out.push_str(piece.text());
        }
    }
}

/// An interior node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreenNode {
    kind: SyntaxKind,
    raw_kind: &'static str,
    field: Option<&'static str>,
    width: usize,
    children: Vec<GreenElement>,
}

impl GreenNode {
    /// Create a node; its width is computed from the children
    #[must_use]
    pub fn new(
        kind: SyntaxKind,
        raw_kind: &'static str,
        field: Option<&'static str>,
        children: Vec<GreenElement>,
    ) -> Self {
        let width = children.iter().map(GreenElement::full_width).sum();
        Self {
            kind,
            raw_kind,
            field,
            width,
            children,
        }
    }

    /// Same kind and field, different children
    #[must_use]
    pub fn with_children(&self, children: Vec<GreenElement>) -> Self {
        Self::new(self.kind, self.raw_kind, self.field, children)
    }

    /// Node kind
    #[must_use]
    pub const fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Tree-sitter kind name
    #[must_use]
    pub const fn raw_kind(&self) -> &'static str {
        self.raw_kind
    }

    /// Field name in the parent, if any
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        self.field
    }

    /// Width including all trivia
    #[must_use]
    pub const fn full_width(&self) -> usize {
        self.width
    }

    /// Child elements in source order
    #[must_use]
    pub fn children(&self) -> &[GreenElement] {
        &self.children
    }

    /// First token in this subtree
    #[must_use]
    pub fn first_token(&self) -> Option<&GreenToken> {
        self.children.iter().find_map(|child| match child {
            GreenElement::Node(node) => node.first_token(),
            GreenElement::Token(token) => Some(token.as_ref()),
        })
    }

    /// Last token in this subtree
    #[must_use]
    pub fn last_token(&self) -> Option<&GreenToken> {
        self.children.iter().rev().find_map(|child| match child {
            GreenElement::Node(node) => node.last_token(),
            GreenElement::Token(token) => Some(token.as_ref()),
        })
    }

    /// Whether the subtree contains an error node
    #[must_use]
    pub fn contains_error(&self) -> bool {
        self.kind == SyntaxKind::Error
            || self.children.iter().any(|child| match child {
                GreenElement::Node(node) => node.contains_error(),
                GreenElement::Token(_) => false,
            })
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        for child in &self.children {
            child.write_to(out);
        }
    }
}

impl fmt::Display for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.width);
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

/// Either a node or a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreenElement {
    /// Interior node
    Node(Arc<GreenNode>),
    /// Leaf token
    Token(Arc<GreenToken>),
}

impl GreenElement {
    /// Width including trivia
    #[must_use]
    pub fn full_width(&self) -> usize {
        match self {
            Self::Node(node) => node.full_width(),
            Self::Token(token) => token.full_width(),
        }
    }

    /// Kind of the element
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Node(node) => node.kind(),
            Self::Token(token) => token.kind(),
        }
    }

    /// The node, if this is one
    #[must_use]
    pub fn as_node(&self) -> Option<&Arc<GreenNode>> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    /// The token, if this is one
    #[must_use]
    pub fn as_token(&self) -> Option<&Arc<GreenToken>> {
        match self {
            Self::Node(_) => None,
            Self::Token(token) => Some(token),
        }
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match self {
            Self::Node(node) => node.write_to(out),
            Self::Token(token) => token.write_to(out),
        }
    }
}
