//! Declarations that can carry the marker attribute.

use crate::syntax::{SyntaxKind, SyntaxNode};

/// What kind of declaration owns an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// Class, struct, record, interface or enum
    Type,
    /// Method-like member, accessor or local function
    Member,
}

/// Classify `node` as a declaration the scanner visits.
#[must_use]
pub fn declaration_kind(node: &SyntaxNode, include_members: bool) -> Option<DeclarationKind> {
    let kind = node.kind();
    if kind.is_type_declaration() {
        Some(DeclarationKind::Type)
    } else if include_members && kind.is_member_declaration() {
        Some(DeclarationKind::Member)
    } else {
        None
    }
}

/// Nearest declaration at or above `node`.
#[must_use]
pub fn enclosing_declaration(
    node: &SyntaxNode,
    include_members: bool,
) -> Option<(SyntaxNode, DeclarationKind)> {
    node.ancestors()
        .find_map(|ancestor| declaration_kind(&ancestor, include_members).map(|kind| (ancestor, kind)))
}

/// Attribute groups written directly on a declaration.
pub fn attribute_lists(declaration: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + '_ {
    declaration
        .children()
        .filter(|child| child.kind() == SyntaxKind::AttributeList)
}

/// Attributes of a group in source order.
pub fn attributes(list: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> + '_ {
    list.children()
        .filter(|child| child.kind() == SyntaxKind::Attribute)
}

fn identifier(node: &SyntaxNode) -> Option<String> {
    node.child_by_field("name")
        .map(|name| name.token_text())
        .or_else(|| {
            node.children_with_tokens()
                .find(|child| child.kind() == SyntaxKind::Identifier)
                .map(|child| child.token_text())
        })
}

/// Name used in diagnostic messages.
///
/// Types use their identifier. Members are prefixed with the containing
/// type chain, e.g. `Outer.Inner.Run` or `Widget.Size.get`.
#[must_use]
pub fn display_name(declaration: &SyntaxNode, kind: DeclarationKind) -> String {
    match kind {
        DeclarationKind::Type => identifier(declaration).unwrap_or_default(),
        DeclarationKind::Member => {
            let member = member_name(declaration);
            let owner: Vec<String> = declaration
                .ancestors()
                .skip(1)
                .filter(|node| node.kind().is_type_declaration())
                .filter_map(|node| identifier(&node))
                .collect();
            if owner.is_empty() {
                member
            } else {
                let mut chain: Vec<String> = owner.into_iter().rev().collect();
                chain.push(member);
                chain.join(".")
            }
        }
    }
}

fn member_name(declaration: &SyntaxNode) -> String {
    match declaration.kind() {
        SyntaxKind::AccessorDeclaration => {
            let keyword = declaration
                .child_by_field("name")
                .map(|name| name.token_text())
                .or_else(|| {
                    declaration.tokens().into_iter().find_map(|token| {
                        matches!(token.text(), "get" | "set" | "init" | "add" | "remove")
                            .then(|| token.text().to_owned())
                    })
                })
                .unwrap_or_default();
            let property = declaration
                .ancestors()
                .find(|node| {
                    matches!(
                        node.kind(),
                        SyntaxKind::PropertyDeclaration
                            | SyntaxKind::IndexerDeclaration
                            | SyntaxKind::EventDeclaration
                    )
                })
                .map(|node| match node.kind() {
                    SyntaxKind::IndexerDeclaration => "this".to_owned(),
                    _ => identifier(&node).unwrap_or_default(),
                })
                .unwrap_or_default();
            format!("{property}.{keyword}")
        }
        SyntaxKind::DestructorDeclaration => {
            format!("~{}", identifier(declaration).unwrap_or_default())
        }
        SyntaxKind::OperatorDeclaration => {
            let symbol = declaration
                .child_by_field("operator")
                .map(|op| op.token_text())
                .unwrap_or_default();
            format!("operator {symbol}")
        }
        SyntaxKind::ConversionOperatorDeclaration => {
            let target = declaration
                .child_by_field("type")
                .map(|ty| ty.token_text())
                .unwrap_or_default();
            format!("operator {target}")
        }
        _ => identifier(declaration).unwrap_or_default(),
    }
}
