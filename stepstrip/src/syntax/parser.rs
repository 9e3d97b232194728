//! Tree-sitter based parser for C# source code.
//!
//! Builds a lossless tree: every byte of the input ends up either in a
//! token or in the trivia attached to one, so rendering the tree returns the
//! input unchanged.
//!
//! Trivia follows the usual ownership rule: a token owns the trailing trivia
//! up to and including the first line break after it; everything after that
//! break belongs to the next token as leading trivia.

use super::green::{split_trivia, GreenElement, GreenNode, GreenToken, Trivia, TriviaKind, TriviaList};
use super::kind::SyntaxKind;
use super::node::SyntaxTree;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tree_sitter::{Node, Parser};

/// Node kinds that are kept as a single token even though tree-sitter gives
/// them children.
const ATOMIC_KINDS: &[&str] = &[
    "string_literal",
    "verbatim_string_literal",
    "raw_string_literal",
    "interpolated_string_expression",
    "character_literal",
];

/// Single-line preprocessor directives, kept as trivia.
const DIRECTIVE_KINDS: &[&str] = &[
    "preproc_pragma",
    "preproc_region",
    "preproc_endregion",
    "preproc_nullable",
    "preproc_define",
    "preproc_undef",
    "preproc_line",
    "preproc_warning",
    "preproc_error",
];

/// Error type for parsing operations
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the tree-sitter language
    #[error("Failed to set language: {0}")]
    LanguageError(String),
    /// Tree-sitter produced no tree
    #[error("Failed to parse source code")]
    ParseFailed,
}

/// C# parser producing [`SyntaxTree`]s
pub struct CsParser {
    parser: Parser,
}

impl CsParser {
    /// Create a new C# parser
    ///
    /// # Errors
    ///
    /// Returns an error if the tree-sitter language cannot be set.
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| ParseError::LanguageError(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse C# source code into a lossless syntax tree
    ///
    /// # Errors
    ///
    /// Returns an error if tree-sitter fails to produce a tree.
    pub fn parse(&mut self, source: &str) -> Result<SyntaxTree, ParseError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)?;
        let root = tree.root_node();

        let mut leaves = Vec::new();
        collect_leaves(root, &mut leaves);

        let mut sink = TokenSink::default();
        let mut pos = 0;
        for leaf in &leaves {
            if leaf.start < pos {
                continue;
            }
            sink.push_gap(&source[pos..leaf.start]);
            let text = &source[leaf.start..leaf.end];
            if let Some(kind) = leaf.trivia {
                let body = text.trim_end_matches(['\r', '\n']);
                sink.push_trivia(Trivia::new(kind, body));
                sink.push_gap(&text[body.len()..]);
            } else {
                sink.push_token(
                    leaf.start,
                    leaf.end,
                    GreenToken::new(SyntaxKind::from_raw(leaf.kind), leaf.kind, text),
                );
            }
            pos = leaf.end;
        }
        sink.push_gap(&source[pos..]);

        let eof = GreenToken::new(SyntaxKind::EndOfFile, "end_of_file", "")
            .with_leading(std::mem::take(&mut sink.pending));
        let mut builder = TreeBuilder {
            tokens: sink.tokens,
        };
        let mut children = builder.build_children(root);
        children.push(GreenElement::Token(Arc::new(eof)));

        let green = GreenNode::new(
            SyntaxKind::from_raw(root.kind()),
            root.kind(),
            None,
            children,
        );
        debug_assert_eq!(green.full_width(), source.len());
        Ok(SyntaxTree::new(Arc::new(green), root.has_error()))
    }
}

struct Leaf {
    start: usize,
    end: usize,
    kind: &'static str,
    trivia: Option<TriviaKind>,
}

fn trivia_kind(node: &Node<'_>) -> Option<TriviaKind> {
    match node.kind() {
        "comment" => Some(TriviaKind::Comment),
        kind if DIRECTIVE_KINDS.contains(&kind) => Some(TriviaKind::Directive),
        _ => None,
    }
}

fn is_token(node: &Node<'_>) -> bool {
    node.child_count() == 0 || ATOMIC_KINDS.contains(&node.kind())
}

fn collect_leaves(node: Node<'_>, leaves: &mut Vec<Leaf>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let trivia = trivia_kind(&child);
        if trivia.is_some() || is_token(&child) {
            if child.end_byte() > child.start_byte() {
                leaves.push(Leaf {
                    start: child.start_byte(),
                    end: child.end_byte(),
                    kind: child.kind(),
                    trivia,
                });
            }
        } else {
            collect_leaves(child, leaves);
        }
    }
}

/// Collects tokens in source order and distributes gap text as trivia.
#[derive(Default)]
struct TokenSink {
    tokens: FxHashMap<usize, (usize, GreenToken)>,
    last: Option<usize>,
    trailing_open: bool,
    pending: TriviaList,
}

impl TokenSink {
    fn push_gap(&mut self, gap: &str) {
        for piece in split_trivia(gap) {
            self.push_trivia(piece);
        }
    }

    fn push_trivia(&mut self, piece: Trivia) {
        let last = if self.trailing_open {
            self.last.and_then(|start| self.tokens.get_mut(&start))
        } else {
            None
        };
        match last {
            Some((_, token)) => {
                if piece.is_end_of_line() {
                    self.trailing_open = false;
                }
                token.push_trailing(piece);
            }
            None => self.pending.push(piece),
        }
    }

    fn push_token(&mut self, start: usize, end: usize, token: GreenToken) {
        let token = token.with_leading(std::mem::take(&mut self.pending));
        self.tokens.insert(start, (end, token));
        self.last = Some(start);
        self.trailing_open = true;
    }
}

/// Rebuilds the tree-sitter shape on top of the trivia-carrying tokens.
struct TreeBuilder {
    tokens: FxHashMap<usize, (usize, GreenToken)>,
}

impl TreeBuilder {
    fn build_children(&mut self, node: Node<'_>) -> Vec<GreenElement> {
        let mut children = Vec::new();
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if let Some(element) = self.build_element(child, cursor.field_name()) {
                    children.push(element);
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        children
    }

    fn build_element(
        &mut self,
        node: Node<'_>,
        field: Option<&'static str>,
    ) -> Option<GreenElement> {
        if trivia_kind(&node).is_some() {
            return None;
        }
        if is_token(&node) {
            if node.end_byte() == node.start_byte() {
                return None;
            }
            let start = node.start_byte();
            if self.tokens.get(&start).map(|(end, _)| *end) != Some(node.end_byte()) {
                return None;
            }
            let (_, token) = self.tokens.remove(&start)?;
            return Some(GreenElement::Token(Arc::new(token.with_field(field))));
        }
        let children = self.build_children(node);
        Some(GreenElement::Node(Arc::new(GreenNode::new(
            SyntaxKind::from_raw(node.kind()),
            node.kind(),
            field,
            children,
        ))))
    }
}
