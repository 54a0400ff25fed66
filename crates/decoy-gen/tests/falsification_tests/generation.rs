//! Falsification Tests: Category F - Generation and Idempotence (F121-F140)

use decoy_core::{DoubleKind, FunctionSignature};
use decoy_gen::{
    ArtifactBackend, DescriptorSet, Emission, Fallback, FunctionDecl, GenerationSession,
    MemoryBackend, MockGenerator, RustRenderer, SpyGenerator, TypeDecl, create_double,
    Generator,
};

fn greeter_set() -> DescriptorSet {
    DescriptorSet::new(vec![TypeDecl::new("app::Greeter")
        .member(FunctionDecl::new("greet", "String").param("name", "String"))
        .member(FunctionDecl {
            is_final: true,
            ..FunctionDecl::new("id", "u64")
        })])
    .unwrap()
}

/// F121: Every mined signature becomes exactly one member, in order
#[test]
fn f121_one_member_per_signature() {
    let sigs = vec![
        FunctionSignature::new("a", ""),
        FunctionSignature::new("b", "u8").param("x", "u8"),
        FunctionSignature::new("c", "String").asynchronous(),
    ];
    let ty = MockGenerator.create_double("x::Thing", &sigs);
    let indices: Vec<_> = ty.members.iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![0, 1, 2], "F121 FALSIFIED");
    assert!(ty.signatures().zip(&sigs).all(|(a, b)| a == b));
}

/// F122: Mocks fail unmatched calls; spies call through
#[test]
fn f122_fallback_by_kind() {
    let sigs = [FunctionSignature::new("a", "")];
    assert_eq!(MockGenerator.create_double("T", &sigs).members[0].fallback, Fallback::Fail);
    assert_eq!(
        SpyGenerator.create_double("T", &sigs).members[0].fallback,
        Fallback::CallThrough,
        "F122 FALSIFIED"
    );
}

/// F123: Generating the same (type, kind) twice emits once
#[test]
fn f123_generation_idempotent() {
    let set = greeter_set();
    let greeter = set.get("app::Greeter").unwrap();
    let mut session = GenerationSession::new(MemoryBackend::new());

    let first = session.generate(&greeter, DoubleKind::Mock).unwrap();
    let before = session.backend().get("app/greeter_mock").unwrap().source.clone();
    let second = session.generate(&greeter, DoubleKind::Mock).unwrap();

    assert_eq!(first, Emission::Written);
    assert_eq!(second, Emission::Skipped, "F123 FALSIFIED: regenerated");
    assert_eq!(session.backend().len(), 1);
    assert_eq!(session.backend().get("app/greeter_mock").unwrap().source, before);
}

/// F124: Mock and spy of the same type are separate artifacts
#[test]
fn f124_kinds_are_independent() {
    let set = greeter_set();
    let greeter = set.get("app::Greeter").unwrap();
    let mut session = GenerationSession::new(MemoryBackend::new());
    session.generate(&greeter, DoubleKind::Mock).unwrap();
    session.generate(&greeter, DoubleKind::Spy).unwrap();
    assert!(session.backend().contains("app/greeter_mock"));
    assert!(session.backend().contains("app/greeter_spy"), "F124 FALSIFIED");
}

/// F125: Rejected members are reported but the double is still generated
#[test]
fn f125_rejections_do_not_block_generation() {
    let set = greeter_set();
    let mut session = GenerationSession::new(MemoryBackend::new());
    let emission = session
        .generate(&set.get("app::Greeter").unwrap(), DoubleKind::Mock)
        .unwrap();
    assert_eq!(emission, Emission::Written, "F125 FALSIFIED");
    assert_eq!(session.report().rejected.len(), 1);
    let source = &session.backend().get("app/greeter_mock").unwrap().source;
    assert!(source.contains("fn greet("));
    assert!(!source.contains("fn id("));
}

/// F126: Rendering is a pure function of the IR
#[test]
fn f126_rendering_deterministic() {
    let sigs = [FunctionSignature::new("greet", "String").param("name", "&str")];
    let ty = create_double(DoubleKind::Spy, "app::Greeter", &sigs);
    let renderer = RustRenderer::new();
    assert_eq!(renderer.render(&ty), renderer.render(&ty.clone()), "F126 FALSIFIED");
}

/// F127: Rendered mocks never fall back to a default value
#[test]
fn f127_mock_source_has_no_default_answer() {
    let sigs = [FunctionSignature::new("count", "u32")];
    let src = RustRenderer::new().render(&create_double(DoubleKind::Mock, "app::Counter", &sigs));
    assert!(!src.contains("Default::default()"), "F127 FALSIFIED");
    assert!(!src.contains("unwrap_or_default"), "F127 FALSIFIED");
    assert!(src.contains(".dispatch(0, vec![])"));
}
