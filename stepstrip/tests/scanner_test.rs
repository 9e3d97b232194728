//! Tests for marker detection: identity matching, anchors and locations.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use stepstrip::analyzer::{Confidence, Diagnostic, Document, MatchMode, ScanOptions, Scanner, Severity};
use stepstrip::semantic::{SemanticBindings, SymbolIdentity, TypeCatalog};
use stepstrip::syntax::SyntaxNode;
use std::sync::Arc;

fn scan(source: &str) -> Vec<Diagnostic> {
    let document = Document::parse(source).expect("should parse");
    Scanner::default().scan(&document)
}

fn positions(diagnostics: &[Diagnostic]) -> Vec<(usize, usize)> {
    diagnostics
        .iter()
        .map(|d| (d.location.line, d.location.column))
        .collect()
}

fn anchor_text<'a>(source: &'a str, diagnostic: &Diagnostic) -> &'a str {
    let range = diagnostic.location.range;
    &source[range.start..range.end]
}

const IMPORTED: &str = "
using System.Diagnostics;

namespace ConsoleApplication1
{
    [DebuggerStepThrough]
    class TypeName
    {
    }
}";

const QUALIFIED: &str = "
namespace ConsoleApplication1
{
    [System.Diagnostics.DebuggerStepThrough]
    class TypeName
    {
    }
}";

const TWO_GROUPS: &str = "
using System;
using System.Diagnostics;

namespace ConsoleApplication1
{
    [Obsolete]
    [DebuggerStepThrough]
    class TypeName
    {
    }
}";

const ONE_GROUP: &str = "
using System;
using System.Diagnostics;

namespace ConsoleApplication1
{
    [Obsolete, DebuggerStepThrough]
    class TypeName
    {
    }
}";

#[test]
fn test_empty_source_has_no_diagnostics() {
    assert!(scan("").is_empty());
}

#[test]
fn test_reference_sources() {
    for (source, expected) in [
        (IMPORTED, (6, 5)),
        (QUALIFIED, (4, 5)),
        (TWO_GROUPS, (8, 5)),
        (ONE_GROUP, (7, 16)),
    ] {
        let diagnostics = scan(source);
        assert_eq!(positions(&diagnostics), vec![expected], "source: {source}");
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.id, "DebuggerStepThroughRemover");
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(
            diagnostic.message,
            "Type 'TypeName' is decorated with DebuggerStepThrough attribute"
        );
    }
}

#[test]
fn test_anchor_tie_break() {
    // A group holding only the marker anchors on the group.
    let source = "using System.Diagnostics;\n[DebuggerStepThrough]\nclass T {}\n";
    assert_eq!(anchor_text(source, &scan(source)[0]), "[DebuggerStepThrough]");

    // Otherwise the marker attribute itself is the anchor.
    let source = "using System;\nusing System.Diagnostics;\n[Obsolete, DebuggerStepThrough]\nclass T {}\n";
    assert_eq!(anchor_text(source, &scan(source)[0]), "DebuggerStepThrough");

    let source = "using System;\nusing System.Diagnostics;\n[DebuggerStepThrough, Obsolete]\nclass T {}\n";
    assert_eq!(anchor_text(source, &scan(source)[0]), "DebuggerStepThrough");
}

#[test]
fn test_scenarios() {
    let a = "using System.Diagnostics;\n[DebuggerStepThrough]\nclass T {}";
    assert_eq!(positions(&scan(a)), vec![(2, 1)]);

    let b = "using System;\nusing System.Diagnostics;\n[Obsolete]\n[DebuggerStepThrough]\nclass T {}";
    assert_eq!(positions(&scan(b)), vec![(4, 1)]);

    let c = "using System;\nusing System.Diagnostics;\n[Obsolete, DebuggerStepThrough]\nclass T {}";
    assert_eq!(positions(&scan(c)), vec![(3, 12)]);
}

#[test]
fn test_suffix_and_spellings() {
    let sources = [
        "using System.Diagnostics;\n[DebuggerStepThroughAttribute]\nclass T {}",
        "[global::System.Diagnostics.DebuggerStepThrough]\nclass T {}",
        "using D = System.Diagnostics;\n[D.DebuggerStepThrough]\nclass T {}",
        "using D = System.Diagnostics;\n[D::DebuggerStepThrough]\nclass T {}",
        "using Step = System.Diagnostics.DebuggerStepThroughAttribute;\n[Step]\nclass T {}",
        "using System.Diagnostics;\nnamespace N\n{\n    using Step = DebuggerStepThroughAttribute;\n    [Step]\n    class T {}\n}",
        "namespace System.Diagnostics.Tools\n{\n    [DebuggerStepThrough]\n    class T {}\n}",
    ];
    for source in sources {
        assert_eq!(scan(source).len(), 1, "source: {source}");
    }
}

#[test]
fn test_no_false_positives() {
    let sources = [
        "class T {}",
        "using System;\n[Obsolete]\n[Serializable]\nclass T {}",
        // name written but namespace not imported
        "[DebuggerStepThrough]\nclass T {}",
        // a user type with the same short name
        "using System.Diagnostics;\nnamespace Mine\n{\n    class DebuggerStepThroughAttribute : System.Attribute {}\n    [DebuggerStepThrough]\n    class T {}\n}",
        // on a method, members off by default
        "using System.Diagnostics;\nclass T\n{\n    [DebuggerStepThrough]\n    void M() {}\n}",
        // in a comment or string
        "using System.Diagnostics;\n// [DebuggerStepThrough]\nclass T { string s = \"[DebuggerStepThrough]\"; }",
    ];
    for source in sources {
        assert!(scan(source).is_empty(), "source: {source}");
    }
}

#[test]
fn test_every_type_kind() {
    let source = "using System.Diagnostics;
[DebuggerStepThrough] class C {}
[DebuggerStepThrough] struct S {}
[DebuggerStepThrough] interface I {}
[DebuggerStepThrough] record R(int X);
[DebuggerStepThrough] record struct RS(int X);
[DebuggerStepThrough] enum E { A }
";
    let names: Vec<String> = scan(source).into_iter().map(|d| d.message).collect();
    assert_eq!(names.len(), 6);
    assert!(names[0].starts_with("Type 'C'"));
    assert!(names[4].starts_with("Type 'RS'"));
    assert!(names[5].starts_with("Type 'E'"));
}

#[test]
fn test_nested_types_report_separately() {
    let source = "using System.Diagnostics;
[DebuggerStepThrough]
class Outer
{
    [DebuggerStepThrough]
    class Inner {}
}
";
    assert_eq!(positions(&scan(source)), vec![(2, 1), (5, 5)]);
}

#[test]
fn test_members_and_textual_mode() {
    let source = "using System.Diagnostics;
class Worker
{
    [DebuggerStepThrough]
    public Worker() {}

    [method: DebuggerStepThrough]
    void Run() {}
}
";
    let document = Document::parse(source).unwrap();
    let members = Scanner::new(ScanOptions {
        include_members: true,
        ..ScanOptions::default()
    })
    .scan(&document);
    assert_eq!(positions(&members), vec![(4, 5), (7, 5)]);

    let textual = Scanner::new(ScanOptions {
        mode: MatchMode::Textual,
        include_members: false,
    });
    let document = Document::parse("[DebuggerStepThrough]\nclass T {}").unwrap();
    let diagnostics = textual.scan(&document);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].confidence, Confidence::Low);
}

#[test]
fn test_catalog_without_marker_matches_nothing() {
    let source = "using System.Diagnostics;\n[DebuggerStepThrough]\nclass T {}";
    let document = Document::parse_with_catalog(source, Arc::new(TypeCatalog::empty())).unwrap();
    assert!(Scanner::default().scan(&document).is_empty());
}

struct NoBindings;

impl SemanticBindings for NoBindings {
    fn resolve_attribute(&self, _attribute: &SyntaxNode) -> Option<SymbolIdentity> {
        None
    }

    fn metadata_type(&self, metadata_name: &str) -> Option<SymbolIdentity> {
        TypeCatalog::with_defaults().get(metadata_name)
    }
}

#[test]
fn test_unresolved_attributes_never_match() {
    let source = "using System.Diagnostics;\n[DebuggerStepThrough]\nclass T {}";
    let document = Document::parse(source).unwrap();
    assert!(Scanner::default().scan_with(&document, &NoBindings).is_empty());
    let dynamic: &dyn SemanticBindings = document.model();
    assert_eq!(Scanner::default().scan_with(&document, dynamic).len(), 1);
}

#[test]
fn test_syntax_errors_are_recorded() {
    let source = "using System.Diagnostics;\n[DebuggerStepThrough]\nclass T\n{\n    void M( {}\n}\n";
    let document = Document::parse(source).unwrap();
    assert!(document.tree().has_errors());
    assert_eq!(document.text(), source);
}
