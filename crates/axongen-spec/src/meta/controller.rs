use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::base::Base;
use super::route::RouteMetadata;

/// An HTTP controller: a struct whose methods are annotated routes
/// (spec.md §3, "ControllerMetadata = Base + Priority + Middleware + prefix + routes[]").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ControllerMetadata {
    pub base: Base,
    pub priority: i64,
    pub middlewares: Vec<String>,
    pub prefix: String,
    pub routes: Vec<RouteMetadata>,
}

impl ControllerMetadata {
    pub fn new(name: impl Into<String>, struct_name: impl Into<String>) -> Self {
        Self {
            base: Base::new(name, struct_name),
            priority: 100,
            middlewares: Vec::new(),
            prefix: String::new(),
            routes: Vec::new(),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_middlewares(mut self, middlewares: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.middlewares.extend(middlewares.into_iter().map(Into::into));
        self
    }

    pub fn with_route(mut self, route: RouteMetadata) -> Self {
        self.routes.push(route);
        self
    }

    pub fn has_prefix(&self) -> bool {
        !self.prefix.is_empty()
    }

    /// Routes sorted by priority ascending, ties broken by stable input order
    /// (spec.md §3 invariant).
    pub fn routes_in_emission_order(&self) -> Vec<&RouteMetadata> {
        let mut indexed: Vec<(usize, &RouteMetadata)> = self.routes.iter().enumerate().collect();
        indexed.sort_by_key(|(idx, route)| (route.priority, *idx));
        indexed.into_iter().map(|(_, route)| route).collect()
    }
}
