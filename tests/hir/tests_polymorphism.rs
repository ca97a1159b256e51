//! Polymorphic base selection and contract enforcement.

use rstest::rstest;
use truth::hir::FaultKind;
use truth::{Program, ProgramOptions};

use crate::helpers::program_helpers::{
    base_paths, count_faults, drill, fault_lines, parallel, program_from,
};

/// `Dog/Sound : Noise` may mean `Dog/Noise` or the root `Noise`.
const OVERRIDDEN_NOISE: &str =
    "Animal\n\tNoise\n\tSound : Noise\nDog : Animal\n\tNoise\n\tSound : Noise\nNoise";

/// Same, but `Dog/Noise` overrides nothing.
const UNRELATED_NOISE: &str = "Animal\n\tSound : Noise\nDog : Animal\n\tNoise\n\tSound : Noise\nNoise";

#[test]
fn test_candidate_overriding_the_condition_wins() {
    let (mut program, doc) = program_from(OVERRIDDEN_NOISE);
    let sound = drill(&mut program, doc, "Dog/Sound").unwrap();
    assert_eq!(base_paths(&program, sound), vec!["Dog/Noise"]);

    let contract = parallel(&program, sound).explicit().unwrap().contract().unwrap();
    assert_eq!(contract.conditions().count(), 1);
    assert!(!contract.has_unsatisfied());
    assert!(program.faults().is_empty());
}

#[test]
fn test_nearest_candidate_is_skipped_when_it_breaks_the_contract() {
    let (mut program, doc) = program_from(UNRELATED_NOISE);
    let sound = drill(&mut program, doc, "Dog/Sound").unwrap();
    assert_eq!(base_paths(&program, sound), vec!["Noise"]);
    assert!(program.faults().is_empty());
}

#[test]
fn test_apex_takes_the_nearest_candidate() {
    let (mut program, doc) = program_from(UNRELATED_NOISE);
    let dog_sound = program.path(doc, "Dog/Sound").unwrap();
    let animal_sound = drill(&mut program, doc, "Animal/Sound").unwrap();
    assert_eq!(base_paths(&program, animal_sound), vec!["Noise"]);
    assert!(program.session().unwrap().lookup(&dog_sound).is_none());
}

#[rstest]
#[case("Animal\n\tSound : Noise\nDog : Animal\n\tSound : Meow\nNoise\nMeow", 1)]
#[case("Animal\n\tSound : Noise\nDog : Animal\n\tSound : Meow\nNoise\nMeow : Noise", 0)]
#[case("Animal\n\tSound : Noise\nDog : Animal\n\tSound : Bark, Meow\nNoise\nMeow\nBark : Noise", 0)]
#[case("Animal\n\tSound : Noise, Tone\nDog : Animal\n\tSound : Bark\nNoise\nTone\nBark : Noise", 1)]
fn test_contract_violations(#[case] source: &str, #[case] violations: usize) {
    let (mut program, doc) = program_from(source);
    drill(&mut program, doc, "Dog/Sound").expect("violations still construct the type");
    assert_eq!(count_faults(&mut program, FaultKind::ContractViolation), violations);
    assert!(!program.faults().has_errors());
}

#[test]
fn test_violation_is_reported_on_every_declaring_statement() {
    let source = "Animal\n\tSound : Noise\nDog : Animal\n\tSound : Meow\nDog\n\tSound\nNoise\nMeow";
    let (mut program, doc) = program_from(source);
    let sound = drill(&mut program, doc, "Dog/Sound").unwrap();
    assert_eq!(base_paths(&program, sound), vec!["Meow"]);
    assert_eq!(
        fault_lines(&mut program),
        vec![("W0001".to_string(), 4), ("W0001".to_string(), 6)]
    );
}

#[test]
fn test_contracts_can_be_switched_off() {
    let source = "Animal\n\tSound : Noise\nDog : Animal\n\tSound : Meow\nNoise\nMeow";
    let mut program = Program::with_options(ProgramOptions::default().with_contracts(false));
    let doc = program.add_document(source);
    let sound = drill(&mut program, doc, "Dog/Sound").unwrap();
    assert_eq!(base_paths(&program, sound), vec!["Meow"]);
    assert!(parallel(&program, sound).explicit().unwrap().contract().is_none());
    assert!(program.faults().is_empty());
}

#[test]
fn test_without_contracts_polymorphic_edges_take_the_nearest() {
    let mut program = Program::with_options(ProgramOptions::default().with_contracts(false));
    let doc = program.add_document(UNRELATED_NOISE);
    let sound = drill(&mut program, doc, "Dog/Sound").unwrap();
    assert_eq!(base_paths(&program, sound), vec!["Dog/Noise"]);
}
