//! Node and token kinds of the C# syntax tree.
//!
//! Only the kinds the engine inspects get their own variant; everything else
//! maps to [`SyntaxKind::Other`] and keeps its tree-sitter name in
//! `raw_kind`.

/// Kind of a syntax node or token.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    CompilationUnit,
    NamespaceDeclaration,
    FileScopedNamespaceDeclaration,
    DeclarationList,
    UsingDirective,

    ClassDeclaration,
    StructDeclaration,
    RecordDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,

    MethodDeclaration,
    ConstructorDeclaration,
    DestructorDeclaration,
    OperatorDeclaration,
    ConversionOperatorDeclaration,
    AccessorDeclaration,
    LocalFunctionStatement,
    PropertyDeclaration,
    IndexerDeclaration,
    EventDeclaration,

    AttributeList,
    Attribute,
    AttributeTargetSpecifier,
    AttributeArgumentList,

    Identifier,
    QualifiedName,
    AliasQualifiedName,
    GenericName,

    OpenBracket,
    CloseBracket,
    Comma,

    /// A region tree-sitter could not parse.
    Error,
    /// Zero-width token holding the trivia at the end of the file.
    EndOfFile,
    Other,
}

impl SyntaxKind {
    /// Map a tree-sitter-c-sharp node kind to a [`SyntaxKind`].
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "compilation_unit" => Self::CompilationUnit,
            "namespace_declaration" => Self::NamespaceDeclaration,
            "file_scoped_namespace_declaration" => Self::FileScopedNamespaceDeclaration,
            "declaration_list" => Self::DeclarationList,
            "using_directive" => Self::UsingDirective,
            "class_declaration" => Self::ClassDeclaration,
            "struct_declaration" => Self::StructDeclaration,
            "record_declaration" | "record_struct_declaration" => Self::RecordDeclaration,
            "interface_declaration" => Self::InterfaceDeclaration,
            "enum_declaration" => Self::EnumDeclaration,
            "method_declaration" => Self::MethodDeclaration,
            "constructor_declaration" => Self::ConstructorDeclaration,
            "destructor_declaration" => Self::DestructorDeclaration,
            "operator_declaration" => Self::OperatorDeclaration,
            "conversion_operator_declaration" => Self::ConversionOperatorDeclaration,
            "accessor_declaration" => Self::AccessorDeclaration,
            "local_function_statement" => Self::LocalFunctionStatement,
            "property_declaration" => Self::PropertyDeclaration,
            "indexer_declaration" => Self::IndexerDeclaration,
            "event_declaration" => Self::EventDeclaration,
            "attribute_list" => Self::AttributeList,
            "attribute" => Self::Attribute,
            "attribute_target_specifier" => Self::AttributeTargetSpecifier,
            "attribute_argument_list" => Self::AttributeArgumentList,
            "identifier" => Self::Identifier,
            "qualified_name" => Self::QualifiedName,
            "alias_qualified_name" => Self::AliasQualifiedName,
            "generic_name" => Self::GenericName,
            "[" => Self::OpenBracket,
            "]" => Self::CloseBracket,
            "," => Self::Comma,
            "ERROR" => Self::Error,
            _ => Self::Other,
        }
    }

    /// Class, struct, record, interface or enum declaration.
    #[must_use]
    pub const fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Self::ClassDeclaration
                | Self::StructDeclaration
                | Self::RecordDeclaration
                | Self::InterfaceDeclaration
                | Self::EnumDeclaration
        )
    }

    /// Method-like member declarations that can carry method attributes.
    #[must_use]
    pub const fn is_member_declaration(self) -> bool {
        matches!(
            self,
            Self::MethodDeclaration
                | Self::ConstructorDeclaration
                | Self::DestructorDeclaration
                | Self::OperatorDeclaration
                | Self::ConversionOperatorDeclaration
                | Self::AccessorDeclaration
                | Self::LocalFunctionStatement
        )
    }

    /// Namespace declarations of either form.
    #[must_use]
    pub const fn is_namespace_declaration(self) -> bool {
        matches!(
            self,
            Self::NamespaceDeclaration | Self::FileScopedNamespaceDeclaration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_known_kinds() {
        assert_eq!(SyntaxKind::from_raw("attribute_list"), SyntaxKind::AttributeList);
        assert_eq!(
            SyntaxKind::from_raw("record_struct_declaration"),
            SyntaxKind::RecordDeclaration
        );
        assert_eq!(SyntaxKind::from_raw("["), SyntaxKind::OpenBracket);
        assert_eq!(SyntaxKind::from_raw("while_statement"), SyntaxKind::Other);
    }

    #[test]
    fn test_declaration_groups() {
        assert!(SyntaxKind::ClassDeclaration.is_type_declaration());
        assert!(!SyntaxKind::ClassDeclaration.is_member_declaration());
        assert!(SyntaxKind::AccessorDeclaration.is_member_declaration());
        assert!(!SyntaxKind::PropertyDeclaration.is_member_declaration());
        assert!(SyntaxKind::FileScopedNamespaceDeclaration.is_namespace_declaration());
    }
}
