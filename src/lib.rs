//! Decoy: test-double generation with a recording, stubbing and capture runtime
//!
//! Part of the PAIML Sovereign AI Stack.
//!
//! Generated doubles reach the runtime through [`runtime`]; tests stub and
//! verify them through the `decoy()` handle every generated type exposes.
//!
//! # Quick Start
//!
//! ```rust
//! use decoy::prelude::*;
//!
//! let core = DoubleCore::mock(
//!     "GreeterMock",
//!     [FunctionSignature::new("greet", "String").param("name", "String")],
//! );
//! core.every("greet", [any()]).unwrap().returns("hi".to_string()).unwrap();
//!
//! let hi: String = core.dispatch(0, vec![Value::new("bob".to_string())]).unwrap();
//! assert_eq!(hi, "hi");
//!
//! let name = Slot::<String>::new();
//! core.verify("greet", [capture(&name)]).unwrap();
//! assert_eq!(name.get().unwrap().as_deref(), Some("bob"));
//! ```

pub use decoy_capture as capture;
pub use decoy_core as runtime;
pub use decoy_gen as codegen;

/// Prelude module for common imports.
pub mod prelude {
    pub use decoy_capture::{
        CaptureError, CapturedList, Mode, Slot, Value, any, capture, capture_list, eq,
        set_mode,
    };
    pub use decoy_core::{
        DispatchError, DoubleCore, DoubleKind, FunctionSignature, Invocation, RuntimeConfig,
        VerificationMode,
    };
}
