//! Greeter Example
//!
//! Stubs, calls and verifies a mock, then spies on a real implementation.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example greeter
//! RUST_LOG=decoy_core=debug cargo run --example greeter
//! ```

use decoy::prelude::*;
use decoy::runtime::Outcome;

fn signatures() -> Vec<FunctionSignature> {
    vec![FunctionSignature::new("greet", "String").param("name", "String")]
}

fn main() -> Result<(), DispatchError> {
    // Initialize tracing for log output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("=== decoy Greeter Example ===\n");

    // Mock: every call must be stubbed
    let mock = DoubleCore::mock("GreeterMock", signatures());
    mock.every("greet", [eq("eve".to_string())])?.raises("eve is blocked")?;
    mock.every("greet", [any()])?.returns("hi".to_string())?;

    for name in ["bob", "eve", "amy"] {
        match mock.dispatch::<String>(0, vec![Value::new(name.to_string())]) {
            Ok(answer) => println!("  greet({name:?}) -> {answer:?}"),
            Err(e) => println!("  greet({name:?}) failed: {e}"),
        }
    }

    let names = CapturedList::<String>::new();
    mock.verify_with("greet", [capture_list(&names)], VerificationMode::Exactly(3))?;
    println!("  captured: {:?}\n", names.get()?);

    // Spy: unstubbed calls reach the real implementation
    let spy = DoubleCore::spy("GreeterSpy", signatures());
    spy.every("greet", [eq("root".to_string())])?.returns("access denied".to_string())?;
    for name in ["ann", "root"] {
        let answer = match spy.invoke(0, vec![Value::new(name.to_string())])? {
            Outcome::Answered(value) => spy.convert::<String>(0, &value)?,
            Outcome::CallThrough => format!("hello, {name}"),
        };
        println!("  spy greet({name:?}) -> {answer:?}");
    }

    let last = Slot::<String>::new();
    spy.verify_with("greet", [capture(&last)], VerificationMode::AtLeast(1))?;
    println!("  last spied name: {:?}", last.get()?);

    Ok(())
}
