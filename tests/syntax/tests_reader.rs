//! Reading outline lines into statements.

use rstest::rstest;
use truth::syntax::{Statement, TokenKind, tokenize};
use truth::{DocumentId, StatementId};

fn read(text: &str) -> Statement {
    Statement::read(StatementId::new(DocumentId::new(0), 0), text, 4)
}

fn subjects(statement: &Statement) -> (Vec<&str>, Vec<&str>) {
    (
        statement.declarations.iter().map(|s| s.subject.as_str()).collect(),
        statement.annotations.iter().map(|s| s.subject.as_str()).collect(),
    )
}

#[rstest]
#[case("Dog", &["Dog"], &[])]
#[case("Dog : Animal", &["Dog"], &["Animal"])]
#[case("Dog:Animal", &["Dog"], &["Animal"])]
#[case("Dog, Cat : Animal, Pet", &["Dog", "Cat"], &["Animal", "Pet"])]
#[case("\t\tFirst Name : Text", &["First Name"], &["Text"])]
#[case(": Base", &[], &["Base"])]
#[case("A : B : C", &["A"], &["B", "C"])]
#[case("A,,B:", &["A", "B"], &[])]
fn test_declarations_and_annotations(
    #[case] line: &str,
    #[case] declarations: &[&str],
    #[case] annotations: &[&str],
) {
    let statement = read(line);
    assert!(!statement.is_noop());
    assert_eq!(
        subjects(&statement),
        (declarations.to_vec(), annotations.to_vec())
    );
}

#[rstest]
#[case("")]
#[case("\t\t")]
#[case("// comment : here")]
#[case("    // indented comment")]
fn test_noop_lines(#[case] line: &str) {
    let statement = read(line);
    assert!(statement.is_noop());
    assert!(statement.declarations.is_empty());
    assert!(statement.annotations.is_empty());
}

#[rstest]
#[case("A", 0, false)]
#[case("\tA", 4, false)]
#[case("  A", 2, false)]
#[case("\t A", 5, true)]
fn test_indentation(#[case] line: &str, #[case] indent: u32, #[case] mixed: bool) {
    let statement = read(line);
    assert_eq!(statement.indent, indent);
    assert_eq!(statement.mixed_indent, mixed);
}

#[test]
fn test_span_ranges_index_the_line() {
    let statement = read("\tSound, Voice : Bark");
    for span in statement.declarations.iter().chain(&statement.annotations) {
        assert_eq!(&statement.text[span.range], span.subject.as_str());
    }
}

#[test]
fn test_tokenize_line() {
    let kinds: Vec<TokenKind> = tokenize("A, B:C").into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Word,
            TokenKind::Comma,
            TokenKind::Whitespace,
            TokenKind::Word,
            TokenKind::Joint,
            TokenKind::Word,
        ]
    );
}
