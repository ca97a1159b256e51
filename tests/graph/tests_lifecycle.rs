//! Node and edge lifecycle under edit transactions.

use rstest::rstest;
use truth::Program;

use crate::helpers::graph_assertions::shape;
use crate::helpers::program_helpers::program_from;

const ZOO: &str = "Animal\n\tSound\nDog : Animal\n\tSound : Bark\nBark";

#[test]
fn test_read_finds_root_nodes_only() {
    let (program, doc) = program_from(ZOO);
    let graph = program.graph();
    assert!(graph.read(doc, "Dog").is_some());
    assert!(graph.read(doc, "Bark").is_some());
    assert!(graph.read(doc, "Sound").is_none());
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_roots_keep_declaration_order() {
    let (program, doc) = program_from(ZOO);
    let roots: Vec<String> = program
        .graph()
        .roots(doc)
        .map(|n| n.subject().to_string())
        .collect();
    assert_eq!(roots, vec!["Animal", "Dog", "Bark"]);
}

#[test]
fn test_fragmented_declarations_share_one_node() {
    let (program, doc) = program_from("Dog\n\tSound : Bark\nDog\n\tSound : Woof\nBark\nWoof");
    let graph = program.graph();
    let dog = graph.read(doc, "Dog").unwrap();
    assert_eq!(dog.declarations().count(), 2);
    let sound = graph.node(dog.content("Sound").unwrap()).unwrap();
    assert_eq!(sound.declarations().count(), 2);
    assert_eq!(sound.outbounds().count(), 2);
}

#[test]
fn test_repeated_annotation_aggregates_sources() {
    let (program, doc) = program_from("Dog : Animal\nDog : Animal\nAnimal");
    let graph = program.graph();
    let dog = graph.read(doc, "Dog").unwrap();
    let edge = graph.edge(dog.outbound("Animal").unwrap()).unwrap();
    assert_eq!(edge.sources().count(), 2);
    assert_eq!(graph.edge_count(), 1);
}

#[rstest]
#[case(ZOO, 1, "\tSound")]
#[case(ZOO, 3, "\tSound : Bark")]
#[case("A, B\n\tC : A\n\t\tD\nA", 2, "\t\tD")]
#[case("A : B\nB : A", 0, "A : B")]
fn test_delete_then_reinsert_restores_graph(
    #[case] source: &str,
    #[case] at: usize,
    #[case] line: &str,
) {
    let (mut program, doc) = program_from(source);
    let before = shape(program.graph());
    let ids_before: Vec<_> = program.graph().nodes().map(|n| (n.path().clone(), n.id())).collect();

    program
        .edit(doc, |tx| {
            tx.delete(at, 1).insert(at, line);
        })
        .unwrap();

    assert_eq!(shape(program.graph()), before);
    for (path, id) in ids_before {
        assert_eq!(
            program.graph().node_at(&path).map(|n| n.id()),
            Some(id),
            "node {path} should keep its identity"
        );
    }
}

#[test]
fn test_node_disposed_with_last_declaration() {
    let (mut program, doc) = program_from("Dog\n\tSound\nDog\n\tLegs");
    program
        .edit(doc, |tx| {
            tx.delete(2, 2);
        })
        .unwrap();
    let graph = program.graph();
    let dog = graph.read(doc, "Dog").unwrap();
    assert_eq!(dog.declarations().count(), 1);
    assert!(dog.content("Legs").is_none());
    assert!(dog.content("Sound").is_some());
    assert_eq!(graph.node_count(), 2);
}

#[test]
fn test_edge_disposed_with_last_source() {
    let (mut program, doc) = program_from("Dog : Animal\nAnimal");
    program
        .edit(doc, |tx| {
            tx.update(0, "Dog");
        })
        .unwrap();
    let graph = program.graph();
    assert_eq!(graph.edge_count(), 0);
    let animal = graph.read(doc, "Animal").unwrap();
    assert_eq!(animal.inbounds().count(), 0);
}

#[test]
fn test_reparenting_moves_contents() {
    let (mut program, doc) = program_from("A\n\tC\nB");
    program
        .edit(doc, |tx| {
            tx.delete(1, 1).insert(2, "\tC");
        })
        .unwrap();
    let graph = program.graph();
    assert!(graph.node_at(&program.path(doc, "A/C").unwrap()).is_none());
    assert!(graph.node_at(&program.path(doc, "B/C").unwrap()).is_some());
}

#[test]
fn test_removing_a_document_empties_its_graph() {
    let mut program = Program::new();
    let doc = program.add_document(ZOO);
    let other = program.add_document("Bark");
    program.remove_document(doc).unwrap();
    assert_eq!(program.graph().node_count(), 1);
    assert_eq!(program.graph().edge_count(), 0);
    assert!(program.graph().read(other, "Bark").is_some());
}
