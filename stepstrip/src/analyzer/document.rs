//! A parsed source file with its bindings.

use crate::semantic::{SemanticModel, TypeCatalog};
use crate::syntax::{CsParser, GreenNode, ParseError, SyntaxTree};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source text, syntax tree and semantic model of one file.
///
/// Documents are immutable. Fixes return new documents and leave the
/// original untouched.
#[derive(Debug, Clone)]
pub struct Document {
    path: Option<PathBuf>,
    text: Arc<str>,
    tree: SyntaxTree,
    model: SemanticModel,
    catalog: Arc<TypeCatalog>,
}

impl Document {
    /// Parse `text` with the default type catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the parser cannot be created or gives up.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Self::parse_with_catalog(text, TypeCatalog::shared_default())
    }

    /// Parse `text` against a specific catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the parser cannot be created or gives up.
    pub fn parse_with_catalog(text: &str, catalog: Arc<TypeCatalog>) -> Result<Self, ParseError> {
        let mut parser = CsParser::new()?;
        Self::parse_with(&mut parser, text, catalog)
    }

    /// Parse `text` reusing an existing parser
    ///
    /// # Errors
    ///
    /// Returns an error if tree-sitter gives up.
    pub fn parse_with(
        parser: &mut CsParser,
        text: &str,
        catalog: Arc<TypeCatalog>,
    ) -> Result<Self, ParseError> {
        Ok(Self::from_tree(parser.parse(text)?, catalog))
    }

    /// Wrap an already parsed tree
    #[must_use]
    pub fn from_tree(tree: SyntaxTree, catalog: Arc<TypeCatalog>) -> Self {
        let model = SemanticModel::new(&tree, Arc::clone(&catalog));
        Self {
            path: None,
            text: Arc::from(tree.text()),
            tree,
            model,
            catalog,
        }
    }

    /// Attach the file path
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// A new document for a rewritten root; bindings are rebuilt
    #[must_use]
    pub fn with_syntax_root(&self, root: Arc<GreenNode>) -> Self {
        let tree = self.tree.with_root(root);
        let mut document = Self::from_tree(tree, Arc::clone(&self.catalog));
        document.path.clone_from(&self.path);
        document
    }

    /// File path, if known
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Source text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Syntax tree
    #[must_use]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Semantic model
    #[must_use]
    pub fn model(&self) -> &SemanticModel {
        &self.model
    }

    /// Type catalog the model was built with
    #[must_use]
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }
}
