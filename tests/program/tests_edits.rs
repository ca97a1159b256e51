//! Edit transactions through the program host.

use truth::syntax::EditError;
use truth::{DocumentId, Program, ProgramError, ProgramOptions};

use crate::helpers::graph_assertions::shape;
use crate::helpers::program_helpers::{drill, program_from};

#[test]
fn test_failed_plan_applies_nothing() {
    let (mut program, doc) = program_from("A\n\tB");
    let before = shape(program.graph());
    let result = program.edit(doc, |tx| {
        tx.insert(1, "\tC").delete(9, 1);
    });
    assert_eq!(
        result,
        Err(ProgramError::Edit(EditError::OutOfRange { index: 9, len: 3 }))
    );
    assert_eq!(program.document(doc).unwrap().text(), "A\n\tB");
    assert_eq!(shape(program.graph()), before);
    assert_eq!(program.version(), 1);
}

#[test]
fn test_empty_transaction_keeps_the_graph() {
    let (mut program, doc) = program_from("A : B\n\tC\nB");
    let before = shape(program.graph());
    let ids: Vec<_> = program.graph().nodes().map(|n| n.id()).collect();
    program.edit(doc, |_| {}).unwrap();
    assert_eq!(shape(program.graph()), before);
    for id in ids {
        assert!(program.graph().node(id).is_some());
    }
}

#[test]
fn test_comments_and_blank_lines_are_ignored() {
    let (mut program, doc) = program_from("A\n\n// note\n\tB : C\nC");
    assert!(program.graph().node_at(&program.path(doc, "A/B").unwrap()).is_some());
    program
        .edit(doc, |tx| {
            tx.insert(1, "   ").update(3, "// another note");
        })
        .unwrap();
    assert_eq!(program.graph().node_count(), 3);
    assert!(drill(&mut program, doc, "A/B").is_some());
}

#[test]
fn test_tab_size_option_controls_nesting() {
    let source = "A\n\tB\n    C";
    let (program, doc) = program_from(source);
    assert!(program.graph().node_at(&program.path(doc, "A/C").unwrap()).is_some());

    let mut narrow = Program::with_options(ProgramOptions::default().with_tab_size(2));
    let doc = narrow.add_document(source);
    assert!(narrow.graph().node_at(&narrow.path(doc, "A/C").unwrap()).is_none());
    assert!(narrow.graph().node_at(&narrow.path(doc, "A/B/C").unwrap()).is_some());
}

#[test]
fn test_documents_resolve_independently() {
    let mut program = Program::new();
    let first = program.add_document("Dog : Animal\nAnimal");
    let second = program.add_document("Dog : Missing");
    assert!(drill(&mut program, first, "Dog").is_some());
    assert!(drill(&mut program, second, "Dog").is_some());

    let faults = program.faults();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults.faults()[0].document, second);
}

#[test]
fn test_api_errors() {
    let mut program = Program::new();
    let doc = program.add_document("A");
    let missing = DocumentId::new(42);
    assert_eq!(
        program.drill(missing, "A"),
        Err(ProgramError::UnknownDocument(missing))
    );
    assert_eq!(
        program.drill(doc, ""),
        Err(ProgramError::InvalidPath(String::new()))
    );
    assert_eq!(
        ProgramError::UnknownDocument(missing).to_string(),
        "unknown document: doc#42"
    );
}
