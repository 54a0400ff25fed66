//! Falsification Tests: Category C - Verification (F041-F060)

use decoy_capture::{any, eq};
use decoy_core::{DispatchError, VerificationMode};

use super::greeter::{Greeter, GreeterMock, GreeterSpy, RealGreeter};

fn greeted(names: &[&str]) -> GreeterMock {
    let mock = GreeterMock::new();
    mock.decoy()
        .every("greet", [any()])
        .unwrap()
        .returns("hi".to_string())
        .unwrap();
    for name in names {
        mock.greet((*name).to_string());
    }
    mock
}

/// F041: Default verification expects exactly one matching call
#[test]
fn f041_default_is_exactly_once() {
    let mock = greeted(&["bob"]);
    assert!(
        mock.decoy().verify("greet", [eq("bob".to_string())]).is_ok(),
        "F041 FALSIFIED: single call failed default verification"
    );

    let twice = greeted(&["bob", "bob"]);
    assert!(
        twice.decoy().verify("greet", [eq("bob".to_string())]).is_err(),
        "F041 FALSIFIED: two calls passed exactly-once verification"
    );
}

/// F042: Explicit verification modes count matching calls only
#[test]
fn f042_explicit_modes() {
    let mock = greeted(&["bob", "amy", "bob"]);
    let core = mock.decoy();
    let bob = || [eq("bob".to_string())];

    assert!(core.verify_with("greet", bob(), VerificationMode::Exactly(2)).is_ok());
    assert!(core.verify_with("greet", bob(), VerificationMode::AtLeast(2)).is_ok());
    assert!(core.verify_with("greet", bob(), VerificationMode::AtMost(1)).is_err());
    assert!(
        core.verify_with("greet", [eq("zed".to_string())], VerificationMode::Never)
            .is_ok(),
        "F042 FALSIFIED: never-called argument failed never()"
    );
}

/// F043: A failed verification lists the recorded calls of the signature
#[test]
fn f043_failure_lists_recorded_calls() {
    let mock = greeted(&["bob", "amy"]);
    let err = mock
        .decoy()
        .verify("greet", [eq("zed".to_string())])
        .unwrap_err();
    match err {
        DispatchError::Verification {
            expected,
            actual,
            recorded,
            ..
        } => {
            assert_eq!(expected, VerificationMode::Exactly(1));
            assert_eq!(actual, 0);
            assert_eq!(recorded.len(), 2, "F043 FALSIFIED: recorded calls missing");
            assert!(recorded[0].contains("\"bob\""));
            assert!(recorded[1].contains("\"amy\""));
        }
        other => panic!("F043 FALSIFIED: unexpected error {other}"),
    }
}

/// F044: Matching invocations come back in call order
#[test]
fn f044_matches_in_sequence_order() {
    let mock = greeted(&["a", "b", "c", "d"]);
    let calls = mock.decoy().matching_invocations("greet", [any()]).unwrap();
    assert_eq!(calls.len(), 4);
    assert!(
        calls.windows(2).all(|w| w[0].sequence() < w[1].sequence()),
        "F044 FALSIFIED: invocations out of order"
    );
}

/// F045: Sequence numbers are ordered across doubles
#[test]
fn f045_sequence_total_across_instances() {
    let first = greeted(&[]);
    let second = greeted(&[]);
    first.greet("1".to_string());
    second.greet("2".to_string());
    first.greet("3".to_string());

    let a = first.decoy().invocations().unwrap();
    let b = second.decoy().invocations().unwrap();
    assert!(a[0].sequence() < b[0].sequence() && b[0].sequence() < a[1].sequence(),
        "F045 FALSIFIED: sequence numbers are not a total order over calls");
    assert_ne!(a[0].instance(), b[0].instance());
}

/// F046: Spy calls are recorded whether answered or delegated
#[test]
fn f046_spy_records_call_through() {
    let spy = GreeterSpy::new(RealGreeter::default());
    spy.greet("bob".to_string());
    assert!(
        spy.decoy().verify("greet", [any()]).is_ok(),
        "F046 FALSIFIED: delegated call not recorded"
    );
}

/// F047: Unknown member names are contract violations
#[test]
fn f047_unknown_member_rejected() {
    let mock = greeted(&[]);
    let err = mock.decoy().verify("wave", Vec::new()).unwrap_err();
    assert!(err.is_contract_violation(), "F047 FALSIFIED: got {err}");
}
