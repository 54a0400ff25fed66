//! Falsification Tests: Category B - Argument Capture (F021-F040)

use decoy_capture::{CaptureError, CapturedList, Mode, Slot, any, capture, capture_list, eq};
use decoy_core::DispatchError;

use super::greeter::{Greeter, GreeterMock, GreeterSpy, RealGreeter};

fn stub_greet(mock: &GreeterMock) {
    mock.decoy()
        .every("greet", [any()])
        .unwrap()
        .returns("hi".to_string())
        .unwrap();
}

/// F021: Verifying with a slot captor yields the argument of the call
#[test]
fn f021_slot_captures_verified_argument() {
    let mock = GreeterMock::new();
    stub_greet(&mock);
    assert_eq!(mock.greet("bob".to_string()), "hi");

    let slot = Slot::<String>::with_mode(Mode::MultiThread);
    mock.decoy().verify("greet", [capture(&slot)]).unwrap();
    assert_eq!(
        slot.get().unwrap().as_deref(),
        Some("bob"),
        "F021 FALSIFIED: slot does not hold the verified argument"
    );
}

/// F022: A slot keeps only the most recent matching value
#[test]
fn f022_slot_holds_last_match() {
    let mock = GreeterMock::new();
    stub_greet(&mock);
    for name in ["a", "b", "c"] {
        mock.greet(name.to_string());
    }

    let slot = Slot::<String>::with_mode(Mode::MultiThread);
    mock.decoy()
        .matching_invocations("greet", [capture(&slot)])
        .unwrap();
    assert_eq!(
        slot.get().unwrap().as_deref(),
        Some("c"),
        "F022 FALSIFIED: slot is not last-write-wins"
    );
}

/// F023: A list captor holds every matching value in call order
#[test]
fn f023_list_holds_all_in_order() {
    let mock = GreeterMock::new();
    stub_greet(&mock);
    let names: Vec<String> = (0..10).map(|i| format!("n{i}")).collect();
    for name in &names {
        mock.greet(name.clone());
    }

    let list = CapturedList::<String>::with_mode(Mode::MultiThread);
    mock.decoy()
        .matching_invocations("greet", [capture_list(&list)])
        .unwrap();
    assert_eq!(list.get().unwrap(), names, "F023 FALSIFIED");
}

/// F024: A captor never stores on a failed overall match
#[test]
fn f024_no_capture_on_failed_match() {
    let mock = GreeterMock::new();
    mock.decoy()
        .every("greet_times", [any(), any()])
        .unwrap()
        .returns(String::new())
        .unwrap();
    mock.greet_times("bob", 1);
    mock.greet_times("amy", 2);

    let names = CapturedList::<String>::with_mode(Mode::MultiThread);
    mock.decoy()
        .matching_invocations("greet_times", [capture_list(&names), eq(2u32)])
        .unwrap();
    assert_eq!(
        names.get().unwrap(),
        vec!["amy".to_string()],
        "F024 FALSIFIED: captor fired for a call rejected by a later matcher"
    );
}

/// F025: Captors in stub rules fire at call time, once per matching call
#[test]
fn f025_stub_captor_fires_per_call() {
    let mock = GreeterMock::new();
    let seen = CapturedList::<String>::with_mode(Mode::MultiThread);
    mock.decoy()
        .every("greet", [capture_list(&seen)])
        .unwrap()
        .returns("ok".to_string())
        .unwrap();

    mock.greet("x".to_string());
    mock.greet("y".to_string());
    assert_eq!(seen.len().unwrap(), 2, "F025 FALSIFIED");
}

/// F026: Borrowed arguments are captured as owned values
#[test]
fn f026_borrowed_argument_captured_owned() {
    let spy = GreeterSpy::new(RealGreeter::default());
    spy.greet_times("hey", 1);

    let slot = Slot::<String>::with_mode(Mode::MultiThread);
    spy.decoy()
        .verify("greet_times", [capture(&slot), any()])
        .unwrap();
    assert_eq!(slot.get().unwrap().as_deref(), Some("hey"), "F026 FALSIFIED");
}

/// F027: A captor of the wrong element type reports a type mismatch
#[test]
fn f027_wrong_captor_type_reported() {
    let mock = GreeterMock::new();
    stub_greet(&mock);
    mock.greet("bob".to_string());

    let wrong = Slot::<u64>::with_mode(Mode::MultiThread);
    let err = mock
        .decoy()
        .matching_invocations("greet", [capture(&wrong)])
        .unwrap_err();
    assert!(
        matches!(
            err,
            DispatchError::Capture(CaptureError::TypeMismatch { .. })
        ),
        "F027 FALSIFIED: got {err}"
    );
    assert!(wrong.is_empty().unwrap());
}
