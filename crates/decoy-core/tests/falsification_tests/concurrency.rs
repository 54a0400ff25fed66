//! Falsification Tests: Category D - Modes and Concurrency (F061-F080)

use std::sync::Arc;
use std::thread;

use decoy_capture::{CaptureError, CapturedList, Mode, Value, any, capture_list};
use decoy_core::{DispatchError, DoubleCore, DoubleKind};

use super::greeter::{COUNT, GREET, Greeter, GreeterMock, signatures};

/// F061: Concurrent calls on a multi-thread double are all recorded in order
#[test]
fn f061_concurrent_calls_recorded() {
    let mock = Arc::new(GreeterMock::with_mode(Mode::MultiThread));
    mock.decoy()
        .every("greet", [any()])
        .unwrap()
        .returns("hi".to_string())
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let mock = Arc::clone(&mock);
            thread::spawn(move || {
                for i in 0..50 {
                    assert_eq!(mock.greet(format!("{t}:{i}")), "hi");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let ledger = mock.decoy().invocations().unwrap();
    assert_eq!(ledger.len(), 400, "F061 FALSIFIED: lost invocations");
    assert!(
        ledger.windows(2).all(|w| w[0].sequence() < w[1].sequence()),
        "F061 FALSIFIED: ledger not in sequence order"
    );
}

/// F062: Per-thread call order survives interleaving in a shared list captor
#[test]
fn f062_per_thread_order_in_shared_list() {
    let mock = Arc::new(GreeterMock::with_mode(Mode::MultiThread));
    let seen = CapturedList::<String>::with_mode(Mode::MultiThread);
    mock.decoy()
        .every("greet", [capture_list(&seen)])
        .unwrap()
        .returns(String::new())
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let mock = Arc::clone(&mock);
            thread::spawn(move || {
                for i in 0..25 {
                    mock.greet(format!("{t}:{i:02}"));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let values = seen.get().unwrap();
    assert_eq!(values.len(), 100);
    for t in 0..4 {
        let prefix = format!("{t}:");
        let own: Vec<_> = values.iter().filter(|v| v.starts_with(&prefix)).collect();
        assert!(
            own.windows(2).all(|w| w[0] < w[1]),
            "F062 FALSIFIED: thread {t} values reordered"
        );
    }
}

/// F063: A single-thread double rejects calls from other threads
#[test]
fn f063_single_thread_double_is_confined() {
    let core = Arc::new(DoubleCore::with_mode(
        DoubleKind::Mock,
        "GreeterMock",
        signatures(),
        Mode::SingleThread,
    ));
    core.every("count", []).unwrap().returns(1u32).unwrap();
    assert_eq!(core.dispatch::<u32>(COUNT, vec![]).unwrap(), 1);

    let remote = Arc::clone(&core);
    let err = thread::spawn(move || remote.dispatch::<u32>(COUNT, vec![]).unwrap_err())
        .join()
        .unwrap();
    assert!(
        matches!(err, DispatchError::Capture(CaptureError::ForeignThread { .. })),
        "F063 FALSIFIED: foreign thread reached a single-thread ledger: {err}"
    );
    assert_eq!(core.invocations().unwrap().len(), 1);
}

/// F064: A double keeps the mode it was built with
#[test]
fn f064_mode_fixed_at_construction() {
    let single = GreeterMock::with_mode(Mode::SingleThread);
    let multi = GreeterMock::with_mode(Mode::MultiThread);
    assert_eq!(single.decoy().mode(), Mode::SingleThread);
    assert_eq!(multi.decoy().mode(), Mode::MultiThread, "F064 FALSIFIED");
}

/// F065: Answers may call back into the same double without deadlock
#[test]
fn f065_reentrant_answer() {
    let core = Arc::new(DoubleCore::with_mode(
        DoubleKind::Mock,
        "GreeterMock",
        signatures(),
        Mode::MultiThread,
    ));
    core.every("count", []).unwrap().returns(2u32).unwrap();
    let inner = Arc::clone(&core);
    core.every("greet", [any()])
        .unwrap()
        .answers(move |args| {
            let n: u32 = inner.dispatch(COUNT, vec![])?;
            Ok(Value::new(format!("{}#{n}", args[0].take::<String>()?)))
        })
        .unwrap();

    let out: String = core
        .dispatch(GREET, vec![Value::new("bob".to_string())])
        .unwrap();
    assert_eq!(out, "bob#2", "F065 FALSIFIED");
    assert_eq!(core.invocations().unwrap().len(), 2);
}
