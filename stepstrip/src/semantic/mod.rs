//! Attribute binding.
//!
//! The binder answers one question: which declared type does an attribute
//! name denote? It follows C# lookup rules closely enough for attribute
//! names (enclosing namespaces, `using` directives, aliases, `global::`, the
//! `Attribute` suffix) and knows types from two places: the analysed file
//! itself and a [`TypeCatalog`] standing in for referenced assemblies.

mod catalog;
mod names;
mod scope;
mod symbol;

pub use catalog::{TypeCatalog, CONFIGURED_ASSEMBLY};
pub use names::TypeName;
pub use symbol::{SymbolIdentity, SymbolOrigin};

use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxTree};
use compact_str::CompactString;
use rustc_hash::FxHashSet;
use scope::{declared_name, scope_levels, ScopeLevel};
use smallvec::SmallVec;
use std::sync::Arc;

/// Name binding as needed by attribute matching.
pub trait SemanticBindings {
    /// The type an attribute node constructs, or `None` when the name does
    /// not bind to exactly one type.
    fn resolve_attribute(&self, attribute: &SyntaxNode) -> Option<SymbolIdentity>;

    /// A type from referenced metadata by its fully qualified name.
    /// Source declarations are not consulted.
    fn metadata_type(&self, metadata_name: &str) -> Option<SymbolIdentity>;
}

/// Bindings for one syntax tree.
#[derive(Debug, Clone)]
pub struct SemanticModel {
    catalog: Arc<TypeCatalog>,
    declared: Arc<FxHashSet<CompactString>>,
}

impl SemanticModel {
    /// Build the model for `tree`, collecting the types it declares
    #[must_use]
    pub fn new(tree: &SyntaxTree, catalog: Arc<TypeCatalog>) -> Self {
        let mut declared = FxHashSet::default();
        for node in tree.root().descendants() {
            if !node.kind().is_type_declaration() {
                continue;
            }
            let (Some(name), Some(parent)) = (declared_name(&node), node.parent()) else {
                continue;
            };
            let levels = scope_levels(parent, node.range().start);
            if let Some(innermost) = levels.first() {
                declared.insert(CompactString::from(innermost.qualify(&name)));
            }
        }
        Self {
            catalog,
            declared: Arc::new(declared),
        }
    }

    /// The metadata catalog
    #[must_use]
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Fully qualified names of the types declared in the tree
    pub fn declared_types(&self) -> impl Iterator<Item = &str> {
        self.declared.iter().map(CompactString::as_str)
    }

    fn lookup_type(&self, full_name: &str) -> Option<SymbolIdentity> {
        if self.declared.contains(full_name) {
            return Some(SymbolIdentity::source(full_name));
        }
        self.catalog.get(full_name)
    }

    fn resolve_name(&self, name: &TypeName, levels: &[ScopeLevel]) -> Option<SymbolIdentity> {
        let mut found: SmallVec<[SymbolIdentity; 2]> = SmallVec::new();
        for candidate in name.attribute_candidates() {
            if let Some(identity) = self.lookup(&candidate, levels) {
                if !found.contains(&identity) {
                    found.push(identity);
                }
            }
        }
        if found.len() == 1 {
            found.pop()
        } else {
            None
        }
    }

    fn lookup(&self, name: &TypeName, levels: &[ScopeLevel]) -> Option<SymbolIdentity> {
        match name.alias() {
            Some("global") => self.lookup_type(&name.dotted()),
            Some(alias) => {
                let (depth, target) = levels
                    .iter()
                    .enumerate()
                    .find_map(|(depth, level)| level.alias(alias).map(|t| (depth, t)))?;
                let namespace = self.alias_container(target, &levels[depth + 1..]);
                self.lookup_type(&format!("{namespace}.{}", name.dotted()))
            }
            None if name.segments().len() == 1 => self.lookup_simple(name.last(), levels),
            None => self.lookup_qualified(name, levels),
        }
    }

    fn lookup_simple(&self, ident: &str, levels: &[ScopeLevel]) -> Option<SymbolIdentity> {
        for (depth, level) in levels.iter().enumerate() {
            if let Some(identity) = self.lookup_type(&level.qualify(ident)) {
                return Some(identity);
            }
            if let Some(target) = level.alias(ident) {
                return self.resolve_alias_target(target, level, &levels[depth + 1..]);
            }
            let mut hits: SmallVec<[SymbolIdentity; 2]> = SmallVec::new();
            for import in level.imports() {
                if let Some(identity) = self.lookup_type(&format!("{import}.{ident}")) {
                    if !hits.contains(&identity) {
                        hits.push(identity);
                    }
                }
            }
            match hits.len() {
                0 => {}
                1 => return hits.pop(),
                _ => {
                    log::debug!("Ambiguous attribute name '{ident}'");
                    return None;
                }
            }
        }
        None
    }

    fn lookup_qualified(&self, name: &TypeName, levels: &[ScopeLevel]) -> Option<SymbolIdentity> {
        let head = name.segments().first()?;
        let dotted = name.dotted();
        for (depth, level) in levels.iter().enumerate() {
            if let Some(identity) = self.lookup_type(&level.qualify(&dotted)) {
                return Some(identity);
            }
            if let (Some(target), Some(tail)) = (level.alias(head), name.tail()) {
                let container = self.alias_container(target, &levels[depth + 1..]);
                return self.lookup_type(&format!("{container}.{tail}"));
            }
        }
        None
    }

    /// Alias targets bind as if the directive's own level had no `using`
    /// directives; outer levels keep their aliases and imports.
    fn resolve_alias_target(
        &self,
        target: &TypeName,
        own: &ScopeLevel,
        outer: &[ScopeLevel],
    ) -> Option<SymbolIdentity> {
        if target.alias() == Some("global") {
            return self.lookup_type(&target.dotted());
        }
        let mut levels = Vec::with_capacity(outer.len() + 1);
        levels.push(own.without_usings());
        levels.extend(outer.iter().cloned());
        self.lookup(target, &levels)
            .or_else(|| self.lookup_type(&target.dotted()))
    }

    /// Namespace an alias stands for, qualified against the enclosing scope
    /// when that names a known container.
    fn alias_container(&self, target: &TypeName, outer: &[ScopeLevel]) -> String {
        let dotted = target.dotted();
        if target.alias() == Some("global") {
            return dotted;
        }
        outer
            .iter()
            .filter(|level| !level.container().is_empty())
            .map(|level| level.qualify(&dotted))
            .find(|candidate| self.is_known_container(candidate))
            .unwrap_or(dotted)
    }

    fn is_known_container(&self, name: &str) -> bool {
        let prefix = format!("{name}.");
        self.declared.iter().any(|t| t.starts_with(&prefix))
    }
}

impl SemanticBindings for SemanticModel {
    fn resolve_attribute(&self, attribute: &SyntaxNode) -> Option<SymbolIdentity> {
        let name = TypeName::of_attribute(attribute)?;
        // Attributes bind in the scope enclosing the declaration they decorate.
        let declaration = attribute
            .ancestors()
            .find(|node| node.kind() == SyntaxKind::AttributeList)
            .and_then(|list| list.parent().cloned())?;
        let context = declaration.parent().unwrap_or(&declaration);
        let levels = scope_levels(context, attribute.range().start);
        let identity = self.resolve_name(&name, &levels);
        log::trace!("Attribute '{}' resolved to {identity:?}", name.dotted());
        identity
    }

    fn metadata_type(&self, metadata_name: &str) -> Option<SymbolIdentity> {
        self.catalog.get(metadata_name)
    }
}
