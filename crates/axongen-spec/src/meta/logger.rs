use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::base::Base;
use super::traits::{Lifecycle, ManualModule};

/// A structured logger the package declares (spec.md §3, "LoggerMetadata").
/// Loggers carry no `service_mode` — the `logger` annotation has no `Mode`
/// parameter, so a logger is always provisioned as a singleton.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoggerMetadata {
    pub base: Base,
    pub lifecycle: Lifecycle,
    pub manual: ManualModule,
    pub constructor: Option<String>,
}

impl LoggerMetadata {
    pub fn new(name: impl Into<String>, struct_name: impl Into<String>) -> Self {
        Self {
            base: Base::new(name, struct_name),
            lifecycle: Lifecycle::default(),
            manual: ManualModule::default(),
            constructor: None,
        }
    }

    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn manual(mut self, module_name: impl Into<String>) -> Self {
        self.manual = ManualModule::manual(module_name);
        self
    }

    pub fn with_constructor(mut self, constructor: impl Into<String>) -> Self {
        self.constructor = Some(constructor.into());
        self
    }

    /// A logger-typed `is_init` field paired with a config-like injected
    /// dependency selects the structured-log handler variant (spec.md §4.F
    /// rule 7). `config_like` classifies dependency type names.
    pub fn wants_structured_handler(&self, is_logger_like: impl Fn(&str) -> bool, is_config_like: impl Fn(&str) -> bool) -> bool {
        let has_logger_init_field = self
            .base
            .init_dependencies()
            .any(|d| is_logger_like(&d.type_name));
        let has_config_dependency = self
            .base
            .injected_dependencies()
            .any(|d| is_config_like(&d.type_name));
        has_logger_init_field && has_config_dependency
    }
}
