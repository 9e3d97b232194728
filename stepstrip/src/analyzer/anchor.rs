//! Where a marker diagnostic points, and what its fix removes.
//!
//! An attribute alone in its group is reported on the group, brackets
//! included; an attribute sharing a group is reported on itself. The
//! scanner and the rewriter both go through [`Anchor::for_attribute`].

use super::declaration::attributes;
use crate::syntax::{SyntaxKind, SyntaxNode, TextRange};

/// The node a diagnostic is anchored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// The whole attribute group
    Group(SyntaxNode),
    /// A single attribute of a larger group
    Attribute(SyntaxNode),
}

impl Anchor {
    /// Anchor for an attribute node; `None` if it is not inside a group.
    #[must_use]
    pub fn for_attribute(attribute: &SyntaxNode) -> Option<Self> {
        let list = attribute
            .parent()
            .filter(|parent| parent.kind() == SyntaxKind::AttributeList)?;
        if attributes(list).count() == 1 {
            Some(Self::Group(list.clone()))
        } else {
            Some(Self::Attribute(attribute.clone()))
        }
    }

    /// The anchored node
    #[must_use]
    pub fn node(&self) -> &SyntaxNode {
        match self {
            Self::Group(node) | Self::Attribute(node) => node,
        }
    }

    /// Span of the anchored node without trivia
    #[must_use]
    pub fn range(&self) -> TextRange {
        self.node().range()
    }

    /// Whether the anchor covers the whole group
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::CsParser;

    fn anchors(source: &str) -> Vec<(bool, String)> {
        let mut parser = CsParser::new().expect("parser");
        let tree = parser.parse(source).expect("parse");
        tree.root()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::Attribute)
            .filter_map(|a| Anchor::for_attribute(&a))
            .map(|anchor| (anchor.is_group(), anchor.node().text()))
            .collect()
    }

    #[test]
    fn test_single_attribute_anchors_on_group() {
        assert_eq!(
            anchors("[Serializable]\nclass A {}"),
            vec![(true, "[Serializable]".to_owned())]
        );
        assert_eq!(
            anchors("[type: Serializable]\nclass A {}"),
            vec![(true, "[type: Serializable]".to_owned())]
        );
    }

    #[test]
    fn test_shared_group_anchors_on_attribute() {
        assert_eq!(
            anchors("[Obsolete(\"x\"), Serializable]\nclass A {}"),
            vec![
                (false, "Obsolete(\"x\")".to_owned()),
                (false, "Serializable".to_owned())
            ]
        );
    }
}
