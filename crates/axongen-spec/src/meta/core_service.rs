use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::base::Base;
use super::traits::{Lifecycle, ManualModule, ServiceMode};

/// A plain injectable service (spec.md §3, "CoreServiceMetadata").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CoreServiceMetadata {
    pub base: Base,
    pub service_mode: ServiceMode,
    pub lifecycle: Lifecycle,
    pub manual: ManualModule,
    pub constructor: Option<String>,
}

impl CoreServiceMetadata {
    pub fn new(name: impl Into<String>, struct_name: impl Into<String>) -> Self {
        Self {
            base: Base::new(name, struct_name),
            service_mode: ServiceMode::default(),
            lifecycle: Lifecycle::default(),
            manual: ManualModule::default(),
            constructor: None,
        }
    }

    pub fn transient(mut self) -> Self {
        self.service_mode = ServiceMode::Transient;
        self
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

    pub fn has_user_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Lifecycle is forbidden on Transient services, overriding any lifecycle
    /// flags the oracle supplied (spec.md §3 invariant).
    pub fn effective_lifecycle(&self) -> Lifecycle {
        if self.service_mode.is_transient() {
            Lifecycle::default()
        } else {
            self.lifecycle
        }
    }
}
