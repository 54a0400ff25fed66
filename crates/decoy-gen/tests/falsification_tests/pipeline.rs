//! Falsification Tests: Category G - Configured Runs (F141-F160)

use std::fs;
use std::path::Path;

use decoy_gen::{DEFAULT_CONFIG, GenConfig, GenError, run};

const DESCRIPTORS: &str = r#"{
    "types": [
        {
            "name": "app::Greeter",
            "ancestors": ["app::Named"],
            "members": [
                {"kind": "function", "name": "greet", "params": [{"name": "name", "ty": "String"}], "return_type": "String"},
                {"kind": "function", "name": "build", "return_type": "Self", "has_receiver": false}
            ]
        },
        {
            "name": "app::Named",
            "members": [
                {"kind": "property", "name": "name", "type": "String"}
            ]
        },
        {
            "name": "app::Clock",
            "members": [
                {"kind": "function", "name": "now", "return_type": "u64", "is_async": true}
            ]
        }
    ]
}"#;

fn project(dir: &Path, mocks: &str, spies: &str) -> GenConfig {
    fs::write(dir.join("descriptors.json"), DESCRIPTORS).unwrap();
    fs::write(
        dir.join(DEFAULT_CONFIG),
        format!(
            "descriptors = \"descriptors.json\"\noutput_dir = \"generated\"\nmocks = {mocks}\nspies = {spies}\n"
        ),
    )
    .unwrap();
    GenConfig::load(dir.join(DEFAULT_CONFIG)).unwrap()
}

/// F141: A configured run writes one file per requested double
#[test]
fn f141_run_writes_requested_doubles() {
    let dir = tempfile::tempdir().unwrap();
    let config = project(dir.path(), r#"["app::Greeter"]"#, r#"["app::Clock"]"#);

    let report = run(&config).unwrap();
    assert_eq!(report.generated, vec!["GreeterMock", "ClockSpy"]);
    assert_eq!(report.rejected.len(), 1);

    let out = dir.path().join("generated");
    let mock = fs::read_to_string(out.join("app").join("greeter_mock.rs")).unwrap();
    assert!(mock.contains("impl app::Greeter for GreeterMock {"));
    let (_, named) = mock
        .split_once("impl app::Named for GreeterMock {")
        .expect("F141 FALSIFIED: supertrait impl missing");
    assert!(
        named.contains("fn name(&self) -> String"),
        "F141 FALSIFIED: inherited property missing"
    );
    let spy = fs::read_to_string(out.join("app").join("clock_spy.rs")).unwrap();
    assert!(
        spy.contains("self.delegate.now().await"),
        "F141 FALSIFIED: async call-through missing"
    );
}

/// F142: Each run starts from an empty output directory
#[test]
fn f142_output_reset_each_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = project(dir.path(), r#"["app::Clock"]"#, "[]");
    run(&config).unwrap();
    let stale = dir.path().join("generated").join("stale.rs");
    fs::write(&stale, "// left behind").unwrap();

    let report = run(&config).unwrap();
    assert!(!stale.exists(), "F142 FALSIFIED: stale artifact survived");
    assert_eq!(report.generated, vec!["ClockMock"]);
    assert!(report.skipped.is_empty());
}

/// F143: Duplicate requests in one config are skipped, not fatal
#[test]
fn f143_duplicate_request_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = project(dir.path(), r#"["app::Clock", "app::Clock"]"#, "[]");
    let report = run(&config).unwrap();
    assert_eq!(report.generated, vec!["ClockMock"]);
    assert_eq!(report.skipped, vec!["ClockMock"], "F143 FALSIFIED");
}

/// F144: An unknown type fails the run before touching existing output
#[test]
fn f144_unknown_type_is_fatal_and_safe() {
    let dir = tempfile::tempdir().unwrap();
    let good = project(dir.path(), r#"["app::Clock"]"#, "[]");
    run(&good).unwrap();

    let mut bad = good.clone();
    bad.spies.push("app::Missing".into());
    let err = run(&bad).unwrap_err();
    assert!(matches!(err, GenError::UnknownType(ref n) if n == "app::Missing"));
    assert!(
        dir.path().join("generated/app/clock_mock.rs").exists(),
        "F144 FALSIFIED: previous output destroyed by a failing run"
    );
}

/// F145: A missing descriptor file is a configuration error
#[test]
fn f145_missing_descriptors_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = GenConfig::new(dir.path().join("none.json"), dir.path().join("out"));
    assert!(matches!(run(&config), Err(GenError::Config(_))), "F145 FALSIFIED");
}

/// F146: Types sharing a simple name in different modules both get doubles
#[test]
fn f146_same_simple_name_in_two_modules() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("descriptors.json"),
        r#"{"types": [
            {"name": "a::Greeter", "members": [{"kind": "function", "name": "greet", "return_type": "String"}]},
            {"name": "b::Greeter", "members": [{"kind": "function", "name": "wave", "return_type": ""}]}
        ]}"#,
    )
    .unwrap();
    let mut config = GenConfig::new(dir.path().join("descriptors.json"), dir.path().join("out"));
    config.mocks = vec!["a::Greeter".into(), "b::Greeter".into()];

    let report = run(&config).unwrap();
    assert_eq!(report.generated, vec!["GreeterMock", "GreeterMock"], "F146 FALSIFIED");
    assert!(report.skipped.is_empty());
    let a = fs::read_to_string(dir.path().join("out/a/greeter_mock.rs")).unwrap();
    let b = fs::read_to_string(dir.path().join("out/b/greeter_mock.rs")).unwrap();
    assert!(a.contains("impl a::Greeter for GreeterMock {"));
    assert!(b.contains("impl b::Greeter for GreeterMock {"));
}

/// F147: A type seen twice by discovery does not fail the run
#[test]
fn f147_repeated_declaration_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let clock = r#"{"name": "app::Clock", "members": [{"kind": "function", "name": "now", "return_type": "u64"}]}"#;
    fs::write(
        dir.path().join("descriptors.json"),
        format!(r#"{{"types": [{clock}, {clock}]}}"#),
    )
    .unwrap();
    let mut config = GenConfig::new(dir.path().join("descriptors.json"), dir.path().join("out"));
    config.mocks = vec!["app::Clock".into()];

    let report = run(&config).expect("F147 FALSIFIED: repeated declaration was fatal");
    assert_eq!(report.generated, vec!["ClockMock"]);
}

/// F148: Two types mapping to one artifact fail the run before any output is touched
#[test]
fn f148_artifact_clash_is_fatal_and_safe() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("descriptors.json"),
        r#"{"types": [{"name": "app::HTTPClient"}, {"name": "app::HttpClient"}]}"#,
    )
    .unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("kept.rs"), "// previous run").unwrap();

    let mut config = GenConfig::new(dir.path().join("descriptors.json"), &out);
    config.mocks = vec!["app::HTTPClient".into(), "app::HttpClient".into()];
    let err = run(&config).unwrap_err();
    assert!(
        matches!(err, GenError::NameClash { ref stem, .. } if stem == "app/http_client_mock"),
        "F148 FALSIFIED: {err}"
    );
    assert!(out.join("kept.rs").exists(), "F148 FALSIFIED: output reset before failing");
}
