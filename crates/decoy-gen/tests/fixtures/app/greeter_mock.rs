// @generated by decoy-gen from `app::Greeter`. Do not edit.

/// Mock of `app::Greeter`.
pub struct GreeterMock {
    core: decoy_core::DoubleCore,
}

impl GreeterMock {
    /// Creates the mock using the process-wide mode.
    pub fn new() -> Self {
        Self {
            core: decoy_core::DoubleCore::mock("GreeterMock", Self::signatures()),
        }
    }

    /// Signature table in dispatch order.
    pub fn signatures() -> Vec<decoy_core::FunctionSignature> {
        vec![
            decoy_core::FunctionSignature::new("greet", "String")
                .param("name", "String")
                .origin("app::Greeter"),
            decoy_core::FunctionSignature::new("shout", "String")
                .param("text", "&str")
                .origin("app::Greeter"),
            decoy_core::FunctionSignature::new("fetch", "u32")
                .param("id", "u64")
                .asynchronous()
                .origin("app::Greeter"),
            decoy_core::FunctionSignature::new("name", "String")
                .accessor(decoy_core::Accessor::Getter)
                .origin("app::Named"),
            decoy_core::FunctionSignature::new("set_name", "")
                .param("value", "String")
                .accessor(decoy_core::Accessor::Setter)
                .mutable_receiver()
                .origin("app::Named"),
        ]
    }

    /// Stubbing and verification handle.
    pub fn decoy(&self) -> &decoy_core::DoubleCore {
        &self.core
    }
}

impl Default for GreeterMock {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::panic, clippy::clone_on_copy)]
impl app::Greeter for GreeterMock {
    fn greet(&self, name: String) -> String {
        self.core
            .dispatch(0, vec![decoy_core::Value::new(name)])
            .unwrap_or_else(|e| panic!("{e}"))
    }

    fn shout(&self, text: &str) -> String {
        self.core
            .dispatch(1, vec![decoy_core::Value::new(text.to_owned())])
            .unwrap_or_else(|e| panic!("{e}"))
    }

    async fn fetch(&self, id: u64) -> u32 {
        self.core
            .dispatch(2, vec![decoy_core::Value::new(id)])
            .unwrap_or_else(|e| panic!("{e}"))
    }
}

#[allow(clippy::panic, clippy::clone_on_copy)]
impl app::Named for GreeterMock {
    fn name(&self) -> String {
        self.core
            .dispatch(3, vec![])
            .unwrap_or_else(|e| panic!("{e}"))
    }

    fn set_name(&mut self, value: String) {
        self.core
            .dispatch(4, vec![decoy_core::Value::new(value)])
            .unwrap_or_else(|e| panic!("{e}"))
    }
}
