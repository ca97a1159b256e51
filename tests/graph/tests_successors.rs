//! Successor discovery: which nodes an annotation may refer to.

use truth::Program;
use truth::graph::HyperGraph;

use crate::helpers::program_helpers::{base_paths, drill, program_from};

const LAYERED: &str = "A\n\tB\n\t\tC : T\n\t\tT\n\tT\nT";

fn successors(program: &Program, from: &str, subject: &str) -> Vec<(String, u32)> {
    let doc = program.documents().keys().copied().next().unwrap();
    let graph: &HyperGraph = program.graph();
    let node = graph.node_at(&program.path(doc, from).unwrap()).unwrap();
    let edge = graph.edge(node.outbound(subject).unwrap()).unwrap();
    edge.successors()
        .iter()
        .map(|s| (graph.node(s.node).unwrap().path().to_string(), s.longitude))
        .collect()
}

#[test]
fn test_successors_sorted_nearest_first() {
    let (program, _) = program_from(LAYERED);
    assert_eq!(
        successors(&program, "A/B/C", "T"),
        vec![("A/B/T".into(), 0), ("A/T".into(), 1), ("T".into(), 2)]
    );
}

#[test]
fn test_resolution_takes_the_nearest_candidate() {
    let (mut program, doc) = program_from(LAYERED);
    let c = drill(&mut program, doc, "A/B/C").unwrap();
    assert_eq!(base_paths(&program, c), vec!["A/B/T"]);
}

#[test]
fn test_removing_the_nearest_candidate_falls_back_outward() {
    let (mut program, doc) = program_from(LAYERED);
    program
        .edit(doc, |tx| {
            tx.delete(3, 1);
        })
        .unwrap();
    assert_eq!(
        successors(&program, "A/B/C", "T"),
        vec![("A/T".into(), 1), ("T".into(), 2)]
    );
    let c = drill(&mut program, doc, "A/B/C").unwrap();
    assert_eq!(base_paths(&program, c), vec!["A/T"]);
}

#[test]
fn test_new_candidate_joins_existing_edge() {
    let (mut program, doc) = program_from("A\n\tC : T");
    assert!(successors(&program, "A/C", "T").is_empty());
    program
        .edit(doc, |tx| {
            tx.insert(2, "T");
        })
        .unwrap();
    assert_eq!(successors(&program, "A/C", "T"), vec![("T".into(), 1)]);
    let t = program.graph().read(doc, "T").unwrap();
    assert_eq!(t.inbounds().count(), 1);
}

#[test]
fn test_self_annotation_sees_itself() {
    let (program, _) = program_from("A : A");
    assert_eq!(successors(&program, "A", "A"), vec![("A".into(), 0)]);
}

#[test]
fn test_annotations_do_not_cross_documents() {
    let mut program = Program::new();
    let first = program.add_document("Dog : Animal");
    let second = program.add_document("Animal");
    let dog = program.graph().read(first, "Dog").unwrap();
    let edge = program.graph().edge(dog.outbound("Animal").unwrap()).unwrap();
    assert!(edge.successors().is_empty());
    assert!(program.graph().read(second, "Animal").unwrap().inbounds().next().is_none());
}
