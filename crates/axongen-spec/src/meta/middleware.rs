use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::base::Base;

/// A named middleware component (spec.md §3, "MiddlewareMetadata").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MiddlewareMetadata {
    pub base: Base,
    pub priority: i64,
    pub global: bool,
}

impl MiddlewareMetadata {
    pub fn new(name: impl Into<String>, struct_name: impl Into<String>) -> Self {
        Self {
            base: Base::new(name, struct_name),
            priority: 100,
            global: false,
        }
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }
}
