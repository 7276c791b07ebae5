use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Start/Stop presence and mode, composed onto any component that the oracle
/// observed lifecycle methods for (spec.md §3, "Lifecycle trait").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Lifecycle {
    pub has_start: bool,
    pub has_stop: bool,
    pub start_mode: StartMode,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(mut self) -> Self {
        self.has_start = true;
        self
    }

    pub fn stop(mut self) -> Self {
        self.has_stop = true;
        self
    }

    pub fn start_mode(mut self, mode: StartMode) -> Self {
        self.start_mode = mode;
        self
    }

    /// Derived per spec.md §3: `has_lifecycle = has_start ∨ has_stop`.
    pub fn has_lifecycle(&self) -> bool {
        self.has_start || self.has_stop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum StartMode {
    Same,
    Background,
}

impl Default for StartMode {
    /// An unset `start_mode` reads as `Same` (spec.md §4.B).
    fn default() -> Self {
        StartMode::Same
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum ServiceMode {
    Singleton,
    Transient,
}

impl Default for ServiceMode {
    /// An unset `service_mode` reads as `Singleton` (spec.md §4.B).
    fn default() -> Self {
        ServiceMode::Singleton
    }
}

impl ServiceMode {
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceMode::Transient)
    }
}

/// "ManualModule trait": a component contributing no generated constructor,
/// referenced only by its declared module identifier (spec.md §3).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ManualModule {
    pub module_name: String,
}

impl ManualModule {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn manual(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    pub fn is_manual(&self) -> bool {
        !self.module_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lifecycle_defaults_to_same_and_no_hooks() {
        let lc = Lifecycle::default();
        assert_eq!(lc.start_mode, StartMode::Same);
        assert!(!lc.has_lifecycle());
    }

    #[test]
    fn has_lifecycle_true_when_either_hook_present() {
        assert!(Lifecycle::new().start().has_lifecycle());
        assert!(Lifecycle::new().stop().has_lifecycle());
    }

    #[test]
    fn manual_module_empty_name_is_not_manual() {
        assert!(!ManualModule::none().is_manual());
        assert!(ManualModule::manual("userpkg").is_manual());
    }
}
