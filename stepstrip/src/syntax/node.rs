//! Positioned views over the green tree.
//!
//! A [`SyntaxNode`] pairs a green node with its absolute offset and parent
//! pointer. Views are created on demand and are cheap to clone.

use super::green::{GreenElement, GreenNode, GreenToken, Trivia};
use super::kind::SyntaxKind;
use super::range::TextRange;
use std::fmt;
use std::sync::Arc;

#[derive(Debug)]
struct NodeData {
    green: Arc<GreenNode>,
    parent: Option<SyntaxNode>,
    index: usize,
    offset: usize,
}

/// A node together with its position in the tree.
#[derive(Clone)]
pub struct SyntaxNode(Arc<NodeData>);

impl SyntaxNode {
    /// Create the root view of a green tree
    #[must_use]
    pub fn new_root(green: Arc<GreenNode>) -> Self {
        Self(Arc::new(NodeData {
            green,
            parent: None,
            index: 0,
            offset: 0,
        }))
    }

    fn new_child(green: Arc<GreenNode>, parent: &Self, index: usize, offset: usize) -> Self {
        Self(Arc::new(NodeData {
            green,
            parent: Some(parent.clone()),
            index,
            offset,
        }))
    }

    /// Underlying green node
    #[must_use]
    pub fn green(&self) -> &Arc<GreenNode> {
        &self.0.green
    }

    /// Node kind
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.0.green.kind()
    }

    /// Tree-sitter kind name
    #[must_use]
    pub fn raw_kind(&self) -> &'static str {
        self.0.green.raw_kind()
    }

    /// Field name in the parent, if any
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        self.0.green.field()
    }

    /// Parent node
    #[must_use]
    pub fn parent(&self) -> Option<&Self> {
        self.0.parent.as_ref()
    }

    /// Index among the parent's children
    #[must_use]
    pub fn index(&self) -> usize {
        self.0.index
    }

    /// This node followed by its parent chain up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self.clone()), |node| node.parent().cloned())
    }

    /// Direct children, nodes and tokens alike
    pub fn children_with_tokens(&self) -> impl Iterator<Item = SyntaxElement> + '_ {
        let mut offset = self.0.offset;
        self.0
            .green
            .children()
            .iter()
            .enumerate()
            .map(move |(index, child)| {
                let element = match child {
                    GreenElement::Node(green) => {
                        SyntaxElement::Node(Self::new_child(Arc::clone(green), self, index, offset))
                    }
                    GreenElement::Token(green) => SyntaxElement::Token(SyntaxToken {
                        green: Arc::clone(green),
                        parent: self.clone(),
                        index,
                        offset,
                    }),
                };
                offset += child.full_width();
                element
            })
    }

    /// Direct child nodes
    pub fn children(&self) -> impl Iterator<Item = Self> + '_ {
        self.children_with_tokens()
            .filter_map(SyntaxElement::into_node)
    }

    /// Pre-order traversal of this subtree, starting with this node
    #[must_use]
    pub fn descendants(&self) -> Descendants {
        Descendants {
            stack: vec![self.clone()],
        }
    }

    /// All tokens of this subtree in source order
    #[must_use]
    pub fn tokens(&self) -> Vec<SyntaxToken> {
        let mut tokens = Vec::new();
        self.collect_tokens(&mut tokens);
        tokens
    }

    fn collect_tokens(&self, out: &mut Vec<SyntaxToken>) {
        for child in self.children_with_tokens() {
            match child {
                SyntaxElement::Node(node) => node.collect_tokens(out),
                SyntaxElement::Token(token) => out.push(token),
            }
        }
    }

    /// First child element stored under the given field name
    #[must_use]
    pub fn child_by_field(&self, field: &str) -> Option<SyntaxElement> {
        self.children_with_tokens()
            .find(|child| child.field() == Some(field))
    }

    /// Range including leading and trailing trivia
    #[must_use]
    pub fn full_range(&self) -> TextRange {
        TextRange::new(self.0.offset, self.0.offset + self.0.green.full_width())
    }

    /// Range of the node's text, trivia excluded
    #[must_use]
    pub fn range(&self) -> TextRange {
        let full = self.full_range();
        let leading = self
            .0
            .green
            .first_token()
            .map_or(0, GreenToken::leading_width);
        let trailing = self
            .0
            .green
            .last_token()
            .map_or(0, GreenToken::trailing_width);
        let start = full.start + leading;
        TextRange::new(start, full.end.saturating_sub(trailing).max(start))
    }

    /// First token of the subtree
    #[must_use]
    pub fn first_token(&self) -> Option<SyntaxToken> {
        self.children_with_tokens()
            .find_map(|child| child.first_token())
    }

    /// Last token of the subtree
    #[must_use]
    pub fn last_token(&self) -> Option<SyntaxToken> {
        let children: Vec<SyntaxElement> = self.children_with_tokens().collect();
        children
            .into_iter()
            .rev()
            .find_map(|child| child.last_token())
    }

    /// Token whose full range covers `offset`
    #[must_use]
    pub fn token_at_offset(&self, offset: usize) -> Option<SyntaxToken> {
        let full = self.full_range();
        if offset == full.end {
            return self.last_token();
        }
        if !full.contains(offset) {
            return None;
        }
        for child in self.children_with_tokens() {
            if child.full_range().contains(offset) {
                return match child {
                    SyntaxElement::Node(node) => node.token_at_offset(offset),
                    SyntaxElement::Token(token) => Some(token),
                };
            }
        }
        None
    }

    /// Text including trivia
    #[must_use]
    pub fn full_text(&self) -> String {
        self.0.green.to_string()
    }

    /// Source text of [`Self::range`]
    #[must_use]
    pub fn text(&self) -> String {
        let full = self.full_range();
        let range = self.range();
        let text = self.full_text();
        text.get(range.start - full.start..range.end - full.start)
            .unwrap_or_default()
            .to_owned()
    }

    /// Concatenated token texts with all trivia dropped
    #[must_use]
    pub fn token_text(&self) -> String {
        self.tokens().iter().map(SyntaxToken::text).collect()
    }
}

impl PartialEq for SyntaxNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0.green, &other.0.green) && self.0.offset == other.0.offset
    }
}

impl Eq for SyntaxNode {}

impl fmt::Debug for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.kind(), self.full_range())
    }
}

/// Pre-order iterator returned by [`SyntaxNode::descendants`].
pub struct Descendants {
    stack: Vec<SyntaxNode>,
}

impl Iterator for Descendants {
    type Item = SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children: Vec<SyntaxNode> = node.children().collect();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

/// A token together with its position in the tree.
#[derive(Clone)]
pub struct SyntaxToken {
    green: Arc<GreenToken>,
    parent: SyntaxNode,
    index: usize,
    offset: usize,
}

impl SyntaxToken {
    /// Underlying green token
    #[must_use]
    pub fn green(&self) -> &Arc<GreenToken> {
        &self.green
    }

    /// Token kind
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    /// Tree-sitter kind name
    #[must_use]
    pub fn raw_kind(&self) -> &'static str {
        self.green.raw_kind()
    }

    /// Field name in the parent, if any
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        self.green.field()
    }

    /// Token text without trivia
    #[must_use]
    pub fn text(&self) -> &str {
        self.green.text()
    }

    /// Leading trivia
    #[must_use]
    pub fn leading(&self) -> &[Trivia] {
        self.green.leading()
    }

    /// Trailing trivia
    #[must_use]
    pub fn trailing(&self) -> &[Trivia] {
        self.green.trailing()
    }

    /// Parent node
    #[must_use]
    pub fn parent(&self) -> &SyntaxNode {
        &self.parent
    }

    /// Index among the parent's children
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Range including trivia
    #[must_use]
    pub fn full_range(&self) -> TextRange {
        TextRange::new(self.offset, self.offset + self.green.full_width())
    }

    /// Range of the token text
    #[must_use]
    pub fn range(&self) -> TextRange {
        let start = self.offset + self.green.leading_width();
        TextRange::new(start, start + self.green.text().len())
    }

    /// The token preceding this one in source order
    #[must_use]
    pub fn prev_token(&self) -> Option<Self> {
        let mut parent = self.parent.clone();
        let mut index = self.index;
        loop {
            let before: Vec<SyntaxElement> = parent.children_with_tokens().take(index).collect();
            if let Some(token) = before.into_iter().rev().find_map(|e| e.last_token()) {
                return Some(token);
            }
            let grandparent = parent.parent()?.clone();
            index = parent.index();
            parent = grandparent;
        }
    }

    /// The token following this one in source order
    #[must_use]
    pub fn next_token(&self) -> Option<Self> {
        let mut parent = self.parent.clone();
        let mut index = self.index;
        loop {
            let found = parent
                .children_with_tokens()
                .skip(index + 1)
                .find_map(|e| e.first_token());
            if found.is_some() {
                return found;
            }
            let grandparent = parent.parent()?.clone();
            index = parent.index();
            parent = grandparent;
        }
    }
}

impl PartialEq for SyntaxToken {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.green, &other.green) && self.offset == other.offset
    }
}

impl Eq for SyntaxToken {}

impl fmt::Debug for SyntaxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{} {:?}", self.kind(), self.range(), self.text())
    }
}

/// A node or a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElement {
    /// Interior node
    Node(SyntaxNode),
    /// Leaf token
    Token(SyntaxToken),
}

impl SyntaxElement {
    /// Element kind
    #[must_use]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Self::Node(node) => node.kind(),
            Self::Token(token) => token.kind(),
        }
    }

    /// Field name in the parent, if any
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Node(node) => node.field(),
            Self::Token(token) => token.field(),
        }
    }

    /// Range including trivia
    #[must_use]
    pub fn full_range(&self) -> TextRange {
        match self {
            Self::Node(node) => node.full_range(),
            Self::Token(token) => token.full_range(),
        }
    }

    /// Range excluding trivia
    #[must_use]
    pub fn range(&self) -> TextRange {
        match self {
            Self::Node(node) => node.range(),
            Self::Token(token) => token.range(),
        }
    }

    /// Token texts with trivia dropped
    #[must_use]
    pub fn token_text(&self) -> String {
        match self {
            Self::Node(node) => node.token_text(),
            Self::Token(token) => token.text().to_owned(),
        }
    }

    /// The node, if this is one
    #[must_use]
    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    /// The token, if this is one
    #[must_use]
    pub fn as_token(&self) -> Option<&SyntaxToken> {
        match self {
            Self::Node(_) => None,
            Self::Token(token) => Some(token),
        }
    }

    /// Convert into a node
    #[must_use]
    pub fn into_node(self) -> Option<SyntaxNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Token(_) => None,
        }
    }

    /// First token of the element
    #[must_use]
    pub fn first_token(&self) -> Option<SyntaxToken> {
        match self {
            Self::Node(node) => node.first_token(),
            Self::Token(token) => Some(token.clone()),
        }
    }

    /// Last token of the element
    #[must_use]
    pub fn last_token(&self) -> Option<SyntaxToken> {
        match self {
            Self::Node(node) => node.last_token(),
            Self::Token(token) => Some(token.clone()),
        }
    }
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    root: SyntaxNode,
    has_errors: bool,
}

impl SyntaxTree {
    /// Wrap a green root
    #[must_use]
    pub fn new(root: Arc<GreenNode>, has_errors: bool) -> Self {
        Self {
            root: SyntaxNode::new_root(root),
            has_errors,
        }
    }

    /// Root node (the compilation unit)
    #[must_use]
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Whether the parser reported syntax errors
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Full source text, reconstructed from the tree
    #[must_use]
    pub fn text(&self) -> String {
        self.root.full_text()
    }

    /// A tree with a different root and the same error state
    #[must_use]
    pub fn with_root(&self, root: Arc<GreenNode>) -> Self {
        let has_errors = self.has_errors || root.contains_error();
        Self::new(root, has_errors)
    }
}
