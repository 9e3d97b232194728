//! Node edits and the plan that merges them per attribute group.

use super::error::FixError;
use crate::analyzer::{attributes, Anchor};
use crate::syntax::{
    GreenElement, GreenNode, GreenToken, SyntaxKind, SyntaxNode, TextRange, Trivia,
    TriviaKind, TriviaList,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// What happens to the node an edit targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// Drop the node; `carry` is prepended to the next token's leading trivia
    Remove {
        /// Trivia that survives the removal
        carry: TriviaList,
    },
    /// Put a different node in its place
    Replace(Arc<GreenNode>),
}

/// A substitution of one node of the original tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEdit {
    target: TextRange,
    kind: SyntaxKind,
    action: EditAction,
}

impl NodeEdit {
    /// Remove `node`, handing `carry` to the following token
    #[must_use]
    pub fn remove(node: &SyntaxNode, carry: TriviaList) -> Self {
        Self {
            target: node.full_range(),
            kind: node.kind(),
            action: EditAction::Remove { carry },
        }
    }

    /// Replace `node` with `replacement`
    #[must_use]
    pub fn replace(node: &SyntaxNode, replacement: Arc<GreenNode>) -> Self {
        Self {
            target: node.full_range(),
            kind: node.kind(),
            action: EditAction::Replace(replacement),
        }
    }

    /// Full range of the targeted node in the original tree
    #[must_use]
    pub const fn target(&self) -> TextRange {
        self.target
    }

    /// Kind of the targeted node
    #[must_use]
    pub const fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// The substitution
    #[must_use]
    pub const fn action(&self) -> &EditAction {
        &self.action
    }
}

fn has_end_of_line(trivia: &[Trivia]) -> bool {
    trivia.iter().any(Trivia::is_end_of_line)
}

fn strip_leading_whitespace(trivia: &[Trivia]) -> TriviaList {
    trivia
        .iter()
        .skip_while(|piece| piece.kind() == TriviaKind::Whitespace)
        .cloned()
        .collect()
}

fn is_comment_like(piece: &Trivia) -> bool {
    matches!(piece.kind(), TriviaKind::Comment | TriviaKind::Directive)
}

fn space() -> Trivia {
    Trivia::new(TriviaKind::Whitespace, " ")
}

/// Splits off the run of whitespace at the end of `trivia`.
fn split_indent(trivia: &[Trivia]) -> (&[Trivia], &[Trivia]) {
    let start = trivia
        .iter()
        .rposition(|piece| piece.kind() != TriviaKind::Whitespace)
        .map_or(0, |i| i + 1);
    trivia.split_at(start)
}

/// Drops whitespace that sits directly before a line break.
fn trim_before_line_breaks(trivia: TriviaList) -> TriviaList {
    let mut out = TriviaList::new();
    for piece in trivia {
        if piece.is_end_of_line() {
            while out.last().is_some_and(|p: &Trivia| p.kind() == TriviaKind::Whitespace) {
                out.pop();
            }
        }
        out.push(piece);
    }
    out
}

/// Comments and directives in `pieces`, each with the line break ending it.
fn comments(pieces: &[Trivia]) -> Vec<(Trivia, Option<Trivia>)> {
    pieces
        .iter()
        .enumerate()
        .filter(|(_, piece)| is_comment_like(piece))
        .map(|(i, piece)| {
            let eol = pieces[i + 1..]
                .iter()
                .find(|next| next.kind() != TriviaKind::Whitespace)
                .filter(|next| next.is_end_of_line())
                .cloned();
            (piece.clone(), eol)
        })
        .collect()
}

fn push_trivia(element: &GreenElement, out: &mut Vec<Trivia>) {
    match element {
        GreenElement::Token(token) => {
            out.extend(token.leading().iter().cloned());
            out.extend(token.trailing().iter().cloned());
        }
        GreenElement::Node(node) => {
            for child in node.children() {
                push_trivia(child, out);
            }
        }
    }
}

fn first_leading(element: &GreenElement) -> &[Trivia] {
    match element {
        GreenElement::Token(token) => token.leading(),
        GreenElement::Node(node) => node.first_token().map(GreenToken::leading).unwrap_or_default(),
    }
}

fn last_trailing(element: &GreenElement) -> &[Trivia] {
    match element {
        GreenElement::Token(token) => token.trailing(),
        GreenElement::Node(node) => node.last_token().map(GreenToken::trailing).unwrap_or_default(),
    }
}

/// Rewrites the leading trivia of the first token under `element`.
fn map_first_leading(
    element: &GreenElement,
    f: &dyn Fn(&[Trivia]) -> TriviaList,
) -> Option<GreenElement> {
    match element {
        GreenElement::Token(token) => Some(GreenElement::Token(Arc::new(
            (**token).clone().with_leading(f(token.leading())),
        ))),
        GreenElement::Node(node) => {
            let mut children = node.children().to_vec();
            for index in 0..children.len() {
                if let Some(updated) = map_first_leading(&children[index], f) {
                    children[index] = updated;
                    return Some(GreenElement::Node(Arc::new(node.with_children(children))));
                }
            }
            None
        }
    }
}

/// Leading trivia for the attribute that moves up into a removed one's slot.
///
/// Own-line comments stay on their lines at the attribute's indentation;
/// inline comments sit right before the attribute.
fn comments_before(lead: &[Trivia], kept: &[(Trivia, Option<Trivia>)]) -> TriviaList {
    let (head, indent) = split_indent(lead);
    let mut out: TriviaList = head.iter().cloned().collect();
    for (comment, eol) in kept {
        if let Some(eol) = eol {
            out.extend(indent.iter().cloned());
            out.push(comment.clone());
            out.push(eol.clone());
        }
    }
    out.extend(indent.iter().cloned());
    for (comment, eol) in kept {
        if eol.is_none() {
            out.push(comment.clone());
            out.push(space());
        }
    }
    out
}

/// Trivia that replaces the last attribute of a group and its separator.
///
/// Inline comments follow the previous attribute, then the removed
/// attribute's own line ending, then any comment lines.
fn comments_after(interior: &[Trivia], trailing: &[Trivia], indent: &[Trivia]) -> TriviaList {
    let kept = comments(interior);
    let mut out = TriviaList::new();
    for (comment, eol) in &kept {
        if eol.is_none() {
            out.push(space());
            out.push(comment.clone());
        }
    }
    out.extend(trailing.iter().cloned());
    for (comment, eol) in &kept {
        if let Some(eol) = eol {
            if out.last().is_some_and(Trivia::is_end_of_line) {
                out.extend(indent.iter().cloned());
            } else {
                out.push(space());
            }
            out.push(comment.clone());
            out.push(eol.clone());
        }
    }
    out
}

/// Removal of a whole attribute group.
///
/// - alone on its line: the indentation, the group and its line break go
/// - at line start with code after it: the indentation stays for that code
/// - inline: the whitespace after the group stays unless the previous token
///   already ends with whitespace
///
/// Comments are always kept: comment lines before the group, and comments
/// before or after it on its own line.
#[must_use]
pub fn group_removal(list: &SyntaxNode) -> NodeEdit {
    let (Some(first), Some(last)) = (list.first_token(), list.last_token()) else {
        return NodeEdit::remove(list, TriviaList::new());
    };
    let lead = first.leading();
    let trail = last.trailing();
    let prev = first.prev_token();

    let split = lead
        .iter()
        .rposition(Trivia::is_end_of_line)
        .map_or(0, |i| i + 1);
    let (kept_lead, indent) = lead.split_at(split);

    let starts_line = split > 0
        || prev
            .as_ref()
            .is_none_or(|token| has_end_of_line(token.trailing()));
    let ends_line = has_end_of_line(trail);
    let keeps_line = trail.iter().any(is_comment_like) || indent.iter().any(is_comment_like);

    let mut carry: TriviaList = kept_lead.iter().cloned().collect();
    if starts_line {
        if keeps_line {
            let line: TriviaList = indent
                .iter()
                .cloned()
                .chain(strip_leading_whitespace(trail))
                .collect();
            carry.extend(trim_before_line_breaks(line));
        } else if !ends_line {
            carry.extend(indent.iter().cloned());
        }
    } else {
        carry.extend(indent.iter().cloned());
        let prev_has_space = prev
            .as_ref()
            .is_some_and(|token| !token.trailing().is_empty());
        if prev_has_space {
            carry.extend(strip_leading_whitespace(trail));
        } else {
            carry.extend(trail.iter().cloned());
        }
    }
    NodeEdit::remove(list, carry)
}

/// Rebuild a group without the attributes at the given child indices.
///
/// Each removed attribute takes one separator with it: the comma after it
/// when another attribute follows, otherwise the comma before it. Comments
/// in the removed trivia move to the next surviving token. Returns a group
/// removal when no attribute would remain.
#[must_use]
pub fn attribute_removal(list: &SyntaxNode, mut indices: Vec<usize>) -> NodeEdit {
    let total = attributes(list).count();
    indices.sort_unstable();
    indices.dedup();
    if indices.len() >= total {
        return group_removal(list);
    }

    let mut children: Vec<GreenElement> = list.green().children().to_vec();
    for &index in indices.iter().rev() {
        if index >= children.len() {
            continue;
        }
        let comma_after = children.get(index + 1).is_some_and(|c| c.kind() == SyntaxKind::Comma)
            && children[index + 2..]
                .iter()
                .any(|c| c.kind() == SyntaxKind::Attribute);
        if comma_after {
            let mut removed = Vec::new();
            push_trivia(&children[index], &mut removed);
            push_trivia(&children[index + 1], &mut removed);
            children.drain(index..=index + 1);

            let kept = comments(&removed);
            if !kept.is_empty() {
                let rewrite = |lead: &[Trivia]| -> TriviaList { comments_before(lead, &kept) };
                let next = children
                    .get(index)
                    .and_then(|next| map_first_leading(next, &rewrite));
                if let Some(next) = next {
                    children[index] = next;
                }
            }
        } else {
            let start = if index > 0 && children[index - 1].kind() == SyntaxKind::Comma {
                index - 1
            } else {
                index
            };
            let own_trailing = last_trailing(&children[index]);
            let trailing: TriviaList =
                if has_end_of_line(own_trailing) || own_trailing.iter().any(is_comment_like) {
                    own_trailing.iter().cloned().collect()
                } else {
                    TriviaList::new()
                };
            let own_trailing_len = own_trailing.len();
            let indent: TriviaList = split_indent(first_leading(&children[index]))
                .1
                .iter()
                .cloned()
                .collect();

            let mut interior = Vec::new();
            for child in &children[start..=index] {
                push_trivia(child, &mut interior);
            }
            interior.truncate(interior.len().saturating_sub(own_trailing_len));
            children.drain(start..=index);

            let carry = comments_after(&interior, &trailing, &indent);
            if !carry.is_empty() {
                let rewrite = |lead: &[Trivia]| -> TriviaList { carry.iter().chain(lead).cloned().collect() };
                let next = children
                    .get(start)
                    .and_then(|next| map_first_leading(next, &rewrite));
                match next {
                    Some(next) => children[start] = next,
                    None => log::debug!("No token after removed attribute, dropping its trivia"),
                }
            }
        }
    }
    NodeEdit::replace(list, Arc::new(list.green().with_children(children)))
}

struct GroupPlan {
    list: SyntaxNode,
    whole: Option<TextRange>,
    attributes: Vec<(usize, TextRange)>,
}

/// Fixes of one document, merged per attribute group.
#[derive(Default)]
pub(crate) struct EditPlan {
    groups: BTreeMap<TextRange, GroupPlan>,
}

impl EditPlan {
    fn group(&mut self, list: &SyntaxNode) -> &mut GroupPlan {
        self.groups
            .entry(list.full_range())
            .or_insert_with(|| GroupPlan {
                list: list.clone(),
                whole: None,
                attributes: Vec::new(),
            })
    }

    /// Add one located fix
    pub(crate) fn add(&mut self, anchor: &Anchor) -> Result<(), FixError> {
        match anchor {
            Anchor::Group(list) => {
                let second = list.range();
                let group = self.group(list);
                let existing = group
                    .whole
                    .or_else(|| group.attributes.first().map(|(_, range)| *range));
                if let Some(first) = existing {
                    return Err(FixError::OverlappingEdits { first, second });
                }
                group.whole = Some(second);
            }
            Anchor::Attribute(attribute) => {
                let second = attribute.range();
                let list = attribute.parent().ok_or(FixError::StaleFixTarget {
                    range: second,
                    candidates: 0,
                })?;
                let group = self.group(list);
                let existing = group.whole.or_else(|| {
                    group
                        .attributes
                        .iter()
                        .find(|(index, _)| *index == attribute.index())
                        .map(|(_, range)| *range)
                });
                if let Some(first) = existing {
                    return Err(FixError::OverlappingEdits { first, second });
                }
                group.attributes.push((attribute.index(), second));
            }
        }
        Ok(())
    }

    /// Number of groups touched
    pub(crate) fn len(&self) -> usize {
        self.groups.len()
    }

    /// One edit per touched group, in source order
    pub(crate) fn into_edits(self) -> Vec<NodeEdit> {
        self.groups
            .into_values()
            .map(|group| {
                if group.whole.is_some() {
                    group_removal(&group.list)
                } else {
                    let indices = group.attributes.iter().map(|(index, _)| *index).collect();
                    attribute_removal(&group.list, indices)
                }
            })
            .collect()
    }
}
