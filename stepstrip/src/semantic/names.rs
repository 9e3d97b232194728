//! Type names as written in source.

use crate::constants::ATTRIBUTE_SUFFIX;
use crate::syntax::{SyntaxKind, SyntaxNode};
use compact_str::CompactString;
use smallvec::{smallvec, SmallVec};

/// A possibly alias-qualified dotted name: `alias::A.B.C`.
///
/// Generic argument lists are dropped; `Foo<int>` is stored as `Foo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    alias: Option<CompactString>,
    segments: SmallVec<[CompactString; 4]>,
    verbatim_last: bool,
}

impl TypeName {
    /// Parse a name. Returns `None` for text that is not a type name.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let compact: String = strip_generic_arguments(text)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let (alias, rest) = match compact.split_once("::") {
            Some((alias, rest)) => (Some(alias), rest),
            None => (None, compact.as_str()),
        };
        let alias = match alias {
            Some(alias) => {
                let alias = alias.strip_prefix('@').unwrap_or(alias);
                if !is_identifier(alias) {
                    return None;
                }
                Some(CompactString::from(alias))
            }
            None => None,
        };

        let mut segments = SmallVec::new();
        let mut verbatim_last = false;
        for part in rest.split('.') {
            verbatim_last = part.starts_with('@');
            let ident = part.strip_prefix('@').unwrap_or(part);
            if !is_identifier(ident) {
                return None;
            }
            segments.push(CompactString::from(ident));
        }

        Some(Self {
            alias,
            segments,
            verbatim_last,
        })
    }

    /// The name an attribute node is written with
    #[must_use]
    pub fn of_attribute(attribute: &SyntaxNode) -> Option<Self> {
        let name = attribute.child_by_field("name").or_else(|| {
            attribute
                .children_with_tokens()
                .find(|child| child.kind() != SyntaxKind::AttributeArgumentList)
        })?;
        Self::parse(&name.token_text())
    }

    /// Alias qualifier before `::`, `global` included
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Dotted segments
    #[must_use]
    pub fn segments(&self) -> &[CompactString] {
        &self.segments
    }

    /// Last segment
    #[must_use]
    pub fn last(&self) -> &str {
        self.segments.last().map_or("", CompactString::as_str)
    }

    /// Segments joined with `.`, alias excluded
    #[must_use]
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// Dotted name without its first segment
    #[must_use]
    pub fn tail(&self) -> Option<String> {
        (self.segments.len() > 1).then(|| self.segments[1..].join("."))
    }

    /// Whether the last segment was written with `@`
    #[must_use]
    pub const fn is_verbatim(&self) -> bool {
        self.verbatim_last
    }

    /// Names the compiler tries for an attribute: as written, then with the
    /// `Attribute` suffix unless the last segment is verbatim.
    #[must_use]
    pub fn attribute_candidates(&self) -> SmallVec<[Self; 2]> {
        let mut candidates = smallvec![self.clone()];
        if !self.verbatim_last {
            let mut suffixed = self.clone();
            if let Some(last) = suffixed.segments.last_mut() {
                last.push_str(ATTRIBUTE_SUFFIX);
            }
            candidates.push(suffixed);
        }
        candidates
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn strip_generic_arguments(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_and_qualified() {
        let name = TypeName::parse("DebuggerStepThrough").expect("simple");
        assert_eq!(name.alias(), None);
        assert_eq!(name.dotted(), "DebuggerStepThrough");

        let name = TypeName::parse("System . Diagnostics.DebuggerStepThrough").expect("qualified");
        assert_eq!(name.segments().len(), 3);
        assert_eq!(name.last(), "DebuggerStepThrough");
        assert_eq!(name.tail().as_deref(), Some("Diagnostics.DebuggerStepThrough"));
    }

    #[test]
    fn test_parse_alias_and_generics() {
        let name = TypeName::parse("global::System.Diagnostics.DebuggerStepThroughAttribute")
            .expect("global");
        assert_eq!(name.alias(), Some("global"));
        assert_eq!(name.dotted(), "System.Diagnostics.DebuggerStepThroughAttribute");

        let name = TypeName::parse("Tracing.Marker<List<int>, string>").expect("generic");
        assert_eq!(name.dotted(), "Tracing.Marker");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TypeName::parse("").is_none());
        assert!(TypeName::parse("A..B").is_none());
        assert!(TypeName::parse("1Bad").is_none());
    }

    #[test]
    fn test_attribute_candidates() {
        let name = TypeName::parse("Diag.DebuggerStepThrough").expect("name");
        let candidates: Vec<String> = name
            .attribute_candidates()
            .iter()
            .map(TypeName::dotted)
            .collect();
        assert_eq!(
            candidates,
            vec!["Diag.DebuggerStepThrough", "Diag.DebuggerStepThroughAttribute"]
        );

        let verbatim = TypeName::parse("@DebuggerStepThrough").expect("verbatim");
        assert!(verbatim.is_verbatim());
        assert_eq!(verbatim.attribute_candidates().len(), 1);
    }
}
