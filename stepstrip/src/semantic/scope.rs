//! Lexical scopes a name is bound in.
//!
//! A scope level is a container (type or namespace) whose members are visible
//! by simple name, plus the `using` directives that apply at that level.
//! Levels are ordered innermost first and always end with the compilation
//! unit.

use super::names::TypeName;
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};
use compact_str::CompactString;
use rustc_hash::FxHashMap;

/// A `using` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UsingDirective {
    /// `using A.B;`
    Namespace(CompactString),
    /// `using X = A.B.C;`
    Alias {
        alias: CompactString,
        target: TypeName,
    },
    /// `using static A.B.C;`
    Static(TypeName),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScopeLevel {
    container: String,
    usings: Vec<UsingDirective>,
}

impl ScopeLevel {
    pub(crate) fn container(&self) -> &str {
        &self.container
    }

    /// Full name of `name` as a member of this level's container
    pub(crate) fn qualify(&self, name: &str) -> String {
        join_dotted(&self.container, name)
    }

    pub(crate) fn alias(&self, name: &str) -> Option<&TypeName> {
        self.usings.iter().find_map(|using| match using {
            UsingDirective::Alias { alias, target } if alias == name => Some(target),
            _ => None,
        })
    }

    /// The same container with its `using` directives ignored
    pub(crate) fn without_usings(&self) -> Self {
        Self {
            container: self.container.clone(),
            usings: Vec::new(),
        }
    }

    /// Containers imported by `using` and `using static`
    pub(crate) fn imports(&self) -> impl Iterator<Item = String> + '_ {
        self.usings.iter().filter_map(|using| match using {
            UsingDirective::Namespace(namespace) => Some(namespace.to_string()),
            UsingDirective::Static(target) => Some(target.dotted()),
            UsingDirective::Alias { .. } => None,
        })
    }
}

fn join_dotted(prefix: &str, name: &str) -> String {
    match (prefix.is_empty(), name.is_empty()) {
        (true, _) => name.to_owned(),
        (_, true) => prefix.to_owned(),
        _ => format!("{prefix}.{name}"),
    }
}

/// Scope levels visible from `context` at byte `position`.
///
/// `position` decides which side of a file-scoped namespace declaration a
/// top-level node is on.
pub(crate) fn scope_levels(context: &SyntaxNode, position: usize) -> Vec<ScopeLevel> {
    let mut types: Vec<String> = Vec::new();
    let mut namespaces: Vec<(String, Vec<UsingDirective>)> = Vec::new();
    let mut file_scoped: Option<SyntaxNode> = None;
    let mut unit: Option<SyntaxNode> = None;

    for ancestor in context.ancestors() {
        match ancestor.kind() {
            kind if kind.is_type_declaration() => {
                if namespaces.is_empty() {
                    if let Some(name) = declared_name(&ancestor) {
                        types.push(name);
                    }
                }
            }
            SyntaxKind::NamespaceDeclaration => {
                namespaces.push((namespace_name(&ancestor), block_usings(&ancestor)));
            }
            SyntaxKind::FileScopedNamespaceDeclaration => file_scoped = Some(ancestor),
            SyntaxKind::CompilationUnit => unit = Some(ancestor),
            _ => {}
        }
    }

    let mut unit_usings = Vec::new();
    if let Some(unit) = &unit {
        let file_scoped = file_scoped.or_else(|| {
            unit.children().find(|child| {
                child.kind() == SyntaxKind::FileScopedNamespaceDeclaration
                    && child.range().start <= position
            })
        });
        let boundary = file_scoped
            .as_ref()
            .map_or(usize::MAX, |node| node.range().start);
        let mut trailing_usings = Vec::new();
        for child in unit.children() {
            if child.kind() != SyntaxKind::UsingDirective {
                continue;
            }
            if let Some(directive) = parse_using(&child) {
                if child.range().start < boundary {
                    unit_usings.push(directive);
                } else {
                    trailing_usings.push(directive);
                }
            }
        }
        if let Some(node) = file_scoped {
            let mut usings = direct_usings(&node);
            usings.extend(trailing_usings);
            namespaces.push((namespace_name(&node), usings));
        }
    }

    let mut full_namespace = String::new();
    let mut usings_by_namespace: FxHashMap<String, Vec<UsingDirective>> = FxHashMap::default();
    for (name, usings) in namespaces.into_iter().rev() {
        full_namespace = join_dotted(&full_namespace, &name);
        usings_by_namespace
            .entry(full_namespace.clone())
            .or_default()
            .extend(usings);
    }

    let mut levels = Vec::new();
    for depth in 0..types.len() {
        let chain: Vec<&str> = types[depth..].iter().rev().map(String::as_str).collect();
        levels.push(ScopeLevel {
            container: join_dotted(&full_namespace, &chain.join(".")),
            usings: Vec::new(),
        });
    }

    let mut current = full_namespace;
    while !current.is_empty() {
        let usings = usings_by_namespace.remove(&current).unwrap_or_default();
        let parent = current
            .rsplit_once('.')
            .map_or_else(String::new, |(head, _)| head.to_owned());
        levels.push(ScopeLevel {
            container: current,
            usings,
        });
        current = parent;
    }

    levels.push(ScopeLevel {
        container: String::new(),
        usings: unit_usings,
    });
    levels
}

/// Identifier of a type or member declaration
pub(crate) fn declared_name(declaration: &SyntaxNode) -> Option<String> {
    declaration
        .child_by_field("name")
        .map(|name| name.token_text())
        .or_else(|| {
            declaration
                .children_with_tokens()
                .find(|child| child.kind() == SyntaxKind::Identifier)
                .map(|child| child.token_text())
        })
}

fn namespace_name(namespace: &SyntaxNode) -> String {
    namespace
        .child_by_field("name")
        .or_else(|| {
            namespace.children_with_tokens().find(|child| {
                matches!(
                    child.kind(),
                    SyntaxKind::Identifier | SyntaxKind::QualifiedName
                )
            })
        })
        .map(|name| name.token_text())
        .unwrap_or_default()
}

fn block_usings(namespace: &SyntaxNode) -> Vec<UsingDirective> {
    namespace
        .children()
        .find(|child| child.kind() == SyntaxKind::DeclarationList)
        .map(|body| direct_usings(&body))
        .unwrap_or_default()
}

fn direct_usings(node: &SyntaxNode) -> Vec<UsingDirective> {
    node.children()
        .filter(|child| child.kind() == SyntaxKind::UsingDirective)
        .filter_map(|child| parse_using(&child))
        .collect()
}

fn text_at(tokens: &[SyntaxToken], index: usize) -> Option<&str> {
    tokens.get(index).map(SyntaxToken::text)
}

pub(crate) fn parse_using(node: &SyntaxNode) -> Option<UsingDirective> {
    let tokens = node.tokens();
    let mut texts: &[SyntaxToken] = &tokens;

    if text_at(texts, 0) == Some("global") && text_at(texts, 1) == Some("using") {
        texts = &texts[1..];
    }
    if text_at(texts, 0) == Some("using") {
        texts = &texts[1..];
    }
    let is_static = text_at(texts, 0) == Some("static");
    while matches!(text_at(texts, 0), Some("static" | "unsafe")) {
        texts = &texts[1..];
    }
    if let Some((last, rest)) = texts.split_last() {
        if last.text() == ";" {
            texts = rest;
        }
    }

    let concat = |slice: &[SyntaxToken]| slice.iter().map(SyntaxToken::text).collect::<String>();
    if let Some(eq) = texts.iter().position(|token| token.text() == "=") {
        let alias = concat(&texts[..eq]);
        let target = TypeName::parse(&concat(&texts[eq + 1..]))?;
        return Some(UsingDirective::Alias {
            alias: alias.trim_start_matches('@').into(),
            target,
        });
    }

    let name = TypeName::parse(&concat(texts))?;
    Some(if is_static {
        UsingDirective::Static(name)
    } else {
        UsingDirective::Namespace(name.dotted().into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::CsParser;

    fn levels_at(source: &str, marker: &str) -> Vec<ScopeLevel> {
        let mut parser = CsParser::new().expect("parser");
        let tree = parser.parse(source).expect("parse");
        let offset = source.find(marker).expect("marker");
        let token = tree.root().token_at_offset(offset).expect("token");
        scope_levels(token.parent(), offset)
    }

    fn containers(levels: &[ScopeLevel]) -> Vec<&str> {
        levels.iter().map(ScopeLevel::container).collect()
    }

    #[test]
    fn test_nested_namespace_levels() {
        let source = "using System;\nnamespace A.B\n{\n    using Diag = System.Diagnostics;\n    namespace C\n    {\n        class T { [X] void M() {} }\n    }\n}\n";
        let levels = levels_at(source, "[X]");
        assert_eq!(containers(&levels), vec!["A.B.C.T", "A.B.C", "A.B", "A", ""]);
        assert!(levels[2].alias("Diag").is_some());
        assert_eq!(levels[4].imports().collect::<Vec<_>>(), vec!["System".to_owned()]);
    }

    #[test]
    fn test_file_scoped_namespace_levels() {
        let source = "using System;\nnamespace App.Core;\nusing System.Diagnostics;\n\nclass T {}\n";
        let levels = levels_at(source, "class");
        assert_eq!(containers(&levels), vec!["App.Core.T", "App.Core", "App", ""]);
        assert_eq!(
            levels[1].imports().collect::<Vec<_>>(),
            vec!["System.Diagnostics".to_owned()]
        );
        assert_eq!(levels[3].imports().collect::<Vec<_>>(), vec!["System".to_owned()]);
    }

    #[test]
    fn test_parse_using_forms() {
        let source = "global using System.Text;\nusing static System.Math;\nusing DST = global::System.Diagnostics.DebuggerStepThroughAttribute;\nusing global::System.IO;\n";
        let mut parser = CsParser::new().expect("parser");
        let tree = parser.parse(source).expect("parse");
        let directives: Vec<UsingDirective> = tree
            .root()
            .children()
            .filter(|n| n.kind() == SyntaxKind::UsingDirective)
            .filter_map(|n| parse_using(&n))
            .collect();
        assert_eq!(directives.len(), 4);
        assert_eq!(directives[0], UsingDirective::Namespace("System.Text".into()));
        assert!(matches!(&directives[1], UsingDirective::Static(name) if name.dotted() == "System.Math"));
        match &directives[2] {
            UsingDirective::Alias { alias, target } => {
                assert_eq!(alias, "DST");
                assert_eq!(target.alias(), Some("global"));
                assert_eq!(
                    target.dotted(),
                    "System.Diagnostics.DebuggerStepThroughAttribute"
                );
            }
            other => panic!("expected alias, got {other:?}"),
        }
        assert_eq!(directives[3], UsingDirective::Namespace("System.IO".into()));
    }
}
