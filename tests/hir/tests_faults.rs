//! Faults and cruft: graceful degradation on malformed documents.

use rstest::rstest;
use truth::hir::{CruftTarget, FaultKind, Severity};

use crate::helpers::program_helpers::{base_paths, count_faults, drill, fault_lines, program_from};

#[test]
fn test_self_annotation_terminates_with_circular_fault() {
    let (mut program, doc) = program_from("A : A");
    let a = drill(&mut program, doc, "A").expect("A is still constructed");
    assert!(base_paths(&program, a).is_empty());

    assert_eq!(fault_lines(&mut program), vec![("E0002".to_string(), 1)]);
    let edge = program.graph().read(doc, "A").unwrap().outbound("A").unwrap();
    let cruft = program.session().unwrap().cruft();
    assert!(cruft.has_edge(edge));
    assert_eq!(
        cruft.reason(CruftTarget::Edge(edge)),
        Some(FaultKind::CircularTypeReference)
    );
}

#[rstest]
#[case("Number\nClass\n\tNumber : Number", "Class/Number", "Number")]
#[case("T\nA\n\tB\n\t\tT : T\n\tT", "A/B/T", "A/T")]
fn test_field_named_like_an_outer_type_inherits_it(
    #[case] source: &str,
    #[case] field: &str,
    #[case] expected: &str,
) {
    let (mut program, doc) = program_from(source);
    let id = drill(&mut program, doc, field).expect("field is declared");
    assert_eq!(base_paths(&program, id), vec![expected]);
    assert!(program.faults().is_empty());
}

#[rstest]
#[case("A : B\nB : A", "A", 2)]
#[case("A : B\nB : C\nC : A", "B", 3)]
#[case("X : A\nA : B\nB : A", "X", 2)]
fn test_cycles_mark_every_edge_on_the_loop(
    #[case] source: &str,
    #[case] start: &str,
    #[case] expected: usize,
) {
    let (mut program, doc) = program_from(source);
    drill(&mut program, doc, start).expect("cycle members are still constructed");
    assert_eq!(count_faults(&mut program, FaultKind::CircularTypeReference), expected);

    let session = program.session().unwrap();
    for p in session.parallels() {
        for base in p.bases() {
            assert_ne!(base, p.id(), "no parallel may inherit itself after sanitizing");
        }
    }
    assert_eq!(session.cruft().len(), expected);
}

#[test]
fn test_chain_into_a_cycle_keeps_its_own_base() {
    let (mut program, doc) = program_from("X : A\nA : B\nB : A");
    let x = drill(&mut program, doc, "X").unwrap();
    assert_eq!(base_paths(&program, x), vec!["A"]);
    let a = drill(&mut program, doc, "A").unwrap();
    assert!(base_paths(&program, a).is_empty());
}

#[test]
fn test_unresolved_annotation_degrades_gracefully() {
    let (mut program, doc) = program_from("Dog : Missing, Animal\nAnimal");
    let dog = drill(&mut program, doc, "Dog").expect("Dog is still constructed");
    assert_eq!(base_paths(&program, dog), vec!["Animal"]);

    let faults = program.faults();
    assert_eq!(faults.len(), 1);
    let fault = &faults.faults()[0];
    assert_eq!(fault.kind, FaultKind::UnresolvedAnnotation);
    assert_eq!(fault.severity, Severity::Error);
    assert!(fault.message.contains("Missing"));
    assert_eq!(fault.line, 0);
}

#[test]
fn test_each_source_of_an_unresolved_edge_is_reported() {
    let (mut program, doc) = program_from("Dog : Missing\nDog : Missing");
    drill(&mut program, doc, "Dog").unwrap();
    assert_eq!(
        fault_lines(&mut program),
        vec![("E0001".to_string(), 1), ("E0001".to_string(), 2)]
    );
}

#[test]
fn test_mixed_indentation_is_cruft() {
    let (mut program, doc) = program_from("A\n \tB : A\n\tC");
    assert_eq!(drill(&mut program, doc, "A/B"), None);
    assert!(drill(&mut program, doc, "A/C").is_some());
    assert_eq!(fault_lines(&mut program), vec![("E0003".to_string(), 2)]);

    let b = program.path(doc, "A/B").unwrap();
    let node = program.graph().node_at(&b).unwrap();
    assert!(program.session().unwrap().cruft().has_node(node.id()));
}

#[test]
fn test_faults_reset_with_a_new_version() {
    let (mut program, doc) = program_from("Dog : Missing");
    drill(&mut program, doc, "Dog");
    assert!(program.faults().has_errors());

    program
        .edit(doc, |tx| {
            tx.insert(1, "Missing");
        })
        .unwrap();
    drill(&mut program, doc, "Dog");
    assert!(program.faults().is_empty());
}
