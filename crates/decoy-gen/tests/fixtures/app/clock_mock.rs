// @generated by decoy-gen from `app::Clock`. Do not edit.

/// Mock of `app::Clock`.
pub struct ClockMock {
    core: decoy_core::DoubleCore,
}

impl ClockMock {
    /// Creates the mock using the process-wide mode.
    pub fn new() -> Self {
        Self {
            core: decoy_core::DoubleCore::mock("ClockMock", Self::signatures()),
        }
    }

    /// Signature table in dispatch order.
    pub fn signatures() -> Vec<decoy_core::FunctionSignature> {
        vec![
            decoy_core::FunctionSignature::new("now", "u64")
                .origin("app::Clock"),
        ]
    }

    /// Stubbing and verification handle.
    pub fn decoy(&self) -> &decoy_core::DoubleCore {
        &self.core
    }
}

impl Default for ClockMock {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::panic, clippy::clone_on_copy)]
impl app::Clock for ClockMock {
    fn now(&self) -> u64 {
        self.core
            .dispatch(0, vec![])
            .unwrap_or_else(|e| panic!("{e}"))
    }
}
