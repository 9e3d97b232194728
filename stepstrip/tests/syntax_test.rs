//! Tests for the lossless syntax tree.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use stepstrip::fix::{apply_edits, group_removal};
use stepstrip::syntax::{CsParser, SyntaxKind, SyntaxTree, TextRange};
use std::sync::Arc;

fn parse(source: &str) -> SyntaxTree {
    CsParser::new().unwrap().parse(source).unwrap()
}

#[test]
fn test_round_trip() {
    let sources = [
        "",
        "   \n\t\n",
        "using System;\n\nnamespace A.B;\n\n[Serializable]\npublic sealed partial class C<T> where T : new()\n{\n    /// <summary>doc</summary>\n    public int X { get; init; } = 42;\n}\n",
        "class S { string a = @\"multi\nline\"; string b = \"\"\"\n  raw\n  \"\"\"; char c = '\\''; }",
        "#region R\nclass A {}\n#endregion\n",
        "class Broken { void M( {}",
        "namespace N { [A][B, C(1, Named = \"x\")] record R(int X); }\r\n",
    ];
    for source in sources {
        assert_eq!(parse(source).text(), source, "source: {source:?}");
    }
}

#[test]
fn test_ranges_exclude_trivia() {
    let source = "  // lead\n  [X]  \nclass A {}\n";
    let tree = parse(source);
    let list = tree
        .root()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::AttributeList)
        .unwrap();
    let range = list.range();
    assert_eq!(&source[range.start..range.end], "[X]");
    assert!(list.full_range().contains_range(range));
    assert_eq!(list.text(), "[X]");
}

#[test]
fn test_token_navigation() {
    let tree = parse("[X]\nclass A {}");
    let root = tree.root();
    let class = root.token_at_offset(4).unwrap();
    assert_eq!(class.text(), "class");
    let bracket = class.prev_token().unwrap();
    assert_eq!(bracket.kind(), SyntaxKind::CloseBracket);
    assert_eq!(bracket.next_token().unwrap().text(), "class");
    assert_eq!(root.token_at_offset(root.full_range().end).unwrap().kind(), SyntaxKind::EndOfFile);
}

#[test]
fn test_edits_share_unchanged_subtrees() {
    let source = "class A { int x; }\n[X]\nclass B {}\n";
    let tree = parse(source);
    let root = tree.root();
    let list = root
        .descendants()
        .find(|n| n.kind() == SyntaxKind::AttributeList)
        .unwrap();

    let green = apply_edits(root, &[group_removal(&list)]);
    let edited = tree.with_root(green);
    assert_eq!(edited.text(), "class A { int x; }\nclass B {}\n");
    assert_eq!(tree.text(), source);

    let before = root.children().next().unwrap();
    let after = edited.root().children().next().unwrap();
    assert_eq!(before.kind(), SyntaxKind::ClassDeclaration);
    assert!(Arc::ptr_eq(before.green(), after.green()));
}

#[test]
fn test_text_range() {
    let range = TextRange::new(3, 8);
    assert_eq!(range.len(), 5);
    assert!(range.contains(3));
    assert!(!range.contains(8));
    assert!(range.overlaps(TextRange::new(7, 10)));
    assert!(!range.overlaps(TextRange::new(8, 10)));
    assert_eq!(range.to_string(), "3..8");
}
