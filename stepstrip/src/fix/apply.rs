//! Applying node edits to a tree in a single pass.

use super::edit::{EditAction, NodeEdit};
use crate::syntax::{
    GreenElement, GreenNode, GreenToken, SyntaxElement, SyntaxKind, SyntaxNode, TextRange, Trivia,
    TriviaList,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Substitute every edited node of `root` and return the new green root.
///
/// Edits are identified by the full range and kind of the node they target
/// in `root`'s tree. Subtrees without edits are shared with the original.
/// Trivia carried out of removed nodes lands on the next surviving token.
#[must_use]
pub fn apply_edits(root: &SyntaxNode, edits: &[NodeEdit]) -> Arc<GreenNode> {
    if edits.is_empty() {
        return Arc::clone(root.green());
    }
    let mut rebuild = Rebuild {
        edits: edits
            .iter()
            .map(|edit| ((edit.target(), edit.kind()), edit.action()))
            .collect(),
        targets: edits.iter().map(NodeEdit::target).collect(),
        pending: TriviaList::new(),
    };
    let green = rebuild.node(root);
    if !rebuild.pending.is_empty() {
        log::warn!("Dropping {} trivia piece(s) with no token to attach to", rebuild.pending.len());
    }
    green
}

struct Rebuild<'e> {
    edits: FxHashMap<(TextRange, SyntaxKind), &'e EditAction>,
    targets: Vec<TextRange>,
    pending: TriviaList,
}

impl Rebuild<'_> {
    fn touches(&self, node: &SyntaxNode) -> bool {
        let range = node.full_range();
        self.targets.iter().any(|target| range.contains_range(*target))
    }

    fn node(&mut self, node: &SyntaxNode) -> Arc<GreenNode> {
        let mut changed = false;
        let mut children = Vec::with_capacity(node.green().children().len());

        for child in node.children_with_tokens() {
            match child {
                SyntaxElement::Node(child) => {
                    match self.edits.get(&(child.full_range(), child.kind())).copied() {
                        Some(EditAction::Remove { carry }) => {
                            self.pending.extend(carry.iter().cloned());
                            changed = true;
                        }
                        Some(EditAction::Replace(replacement)) => {
                            let replacement = self.flush_into_node(replacement);
                            children.push(GreenElement::Node(replacement));
                            changed = true;
                        }
                        None if self.touches(&child) => {
                            let rebuilt = self.node(&child);
                            changed |= !Arc::ptr_eq(&rebuilt, child.green());
                            children.push(GreenElement::Node(rebuilt));
                        }
                        None => {
                            let green = self.flush_into_node(child.green());
                            changed |= !Arc::ptr_eq(&green, child.green());
                            children.push(GreenElement::Node(green));
                        }
                    }
                }
                SyntaxElement::Token(token) => {
                    if self.pending.is_empty() {
                        children.push(GreenElement::Token(Arc::clone(token.green())));
                    } else {
                        let pending = std::mem::take(&mut self.pending);
                        children.push(GreenElement::Token(Arc::new(prepend_to_token(
                            token.green(),
                            &pending,
                        ))));
                        changed = true;
                    }
                }
            }
        }

        if changed {
            Arc::new(node.green().with_children(children))
        } else {
            Arc::clone(node.green())
        }
    }

    /// Attach pending trivia to the first token of `green`.
    fn flush_into_node(&mut self, green: &Arc<GreenNode>) -> Arc<GreenNode> {
        if self.pending.is_empty() {
            return Arc::clone(green);
        }
        match prepend_to_node(green, &self.pending) {
            Some(updated) => {
                self.pending.clear();
                Arc::new(updated)
            }
            None => Arc::clone(green),
        }
    }
}

fn prepend_to_token(token: &GreenToken, prefix: &[Trivia]) -> GreenToken {
    let leading: TriviaList = prefix
        .iter()
        .chain(token.leading())
        .cloned()
        .collect();
    token.clone().with_leading(leading)
}

fn prepend_to_node(green: &GreenNode, prefix: &[Trivia]) -> Option<GreenNode> {
    let mut children = green.children().to_vec();
    for index in 0..children.len() {
        let replacement = match &children[index] {
            GreenElement::Token(token) => {
                Some(GreenElement::Token(Arc::new(prepend_to_token(token, prefix))))
            }
            GreenElement::Node(node) => {
                prepend_to_node(node, prefix).map(|node| GreenElement::Node(Arc::new(node)))
            }
        };
        if let Some(replacement) = replacement {
            children[index] = replacement;
            return Some(green.with_children(children));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::CsParser;

    #[test]
    fn test_no_edits_returns_same_root() {
        let mut parser = CsParser::new().expect("parser");
        let tree = parser.parse("class A {}\n").expect("parse");
        let green = apply_edits(tree.root(), &[]);
        assert!(Arc::ptr_eq(&green, tree.root().green()));
    }

    #[test]
    fn test_untouched_subtrees_are_shared() {
        let mut parser = CsParser::new().expect("parser");
        let tree = parser
            .parse("class A {}\n[X]\nclass B {}\n")
            .expect("parse");
        let list = tree
            .root()
            .descendants()
            .find(|n| n.kind() == SyntaxKind::AttributeList)
            .expect("list");
        let green = apply_edits(tree.root(), &[NodeEdit::remove(&list, TriviaList::new())]);
        assert_eq!(green.to_string(), "class A {}\nclass B {}\n");

        let old_first = tree.root().green().children()[0].as_node().expect("class A");
        let new_first = green.children()[0].as_node().expect("class A");
        assert!(Arc::ptr_eq(old_first, new_first));
    }
}
