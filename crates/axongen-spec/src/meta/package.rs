use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::parser_registry::RouteParserMetadata;

use super::controller::ControllerMetadata;
use super::core_service::CoreServiceMetadata;
use super::interface::InterfaceMetadata;
use super::logger::LoggerMetadata;
use super::middleware::MiddlewareMetadata;

/// Everything the generator needs to emit one package's autogen module
/// (spec.md §3, "PackageMetadata").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PackageMetadata {
    pub package_name: String,
    pub package_dir: String,
    pub module_path: String,
    pub controllers: Vec<ControllerMetadata>,
    pub middlewares: Vec<MiddlewareMetadata>,
    pub core_services: Vec<CoreServiceMetadata>,
    pub loggers: Vec<LoggerMetadata>,
    pub interfaces: Vec<InterfaceMetadata>,
    pub route_parsers: Vec<RouteParserMetadata>,
}

impl PackageMetadata {
    pub fn new(package_name: impl Into<String>, package_dir: impl Into<String>, module_path: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            package_dir: package_dir.into(),
            module_path: module_path.into(),
            controllers: Vec::new(),
            middlewares: Vec::new(),
            core_services: Vec::new(),
            loggers: Vec::new(),
            interfaces: Vec::new(),
            route_parsers: Vec::new(),
        }
    }

    pub fn with_controller(mut self, controller: ControllerMetadata) -> Self {
        self.controllers.push(controller);
        self
    }

    pub fn with_middleware(mut self, middleware: MiddlewareMetadata) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn with_core_service(mut self, service: CoreServiceMetadata) -> Self {
        self.core_services.push(service);
        self
    }

    pub fn with_logger(mut self, logger: LoggerMetadata) -> Self {
        self.loggers.push(logger);
        self
    }

    pub fn with_interface(mut self, interface: InterfaceMetadata) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_route_parser(mut self, parser: RouteParserMetadata) -> Self {
        self.route_parsers.push(parser);
        self
    }

    /// An empty package has no components of any kind (spec.md §8 boundary:
    /// "Empty package -> a file containing only header, package declaration,
    /// and an empty module variable").
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
            && self.middlewares.is_empty()
            && self.core_services.is_empty()
            && self.loggers.is_empty()
            && self.interfaces.is_empty()
    }

    /// Controllers sorted by priority ascending, ties broken by stable input order.
    pub fn controllers_in_emission_order(&self) -> Vec<&ControllerMetadata> {
        let mut indexed: Vec<(usize, &ControllerMetadata)> = self.controllers.iter().enumerate().collect();
        indexed.sort_by_key(|(idx, c)| (c.priority, *idx));
        indexed.into_iter().map(|(_, c)| c).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_package_is_empty() {
        assert!(PackageMetadata::new("user", "pkg/user", "example.com/app").is_empty());
    }

    #[test]
    fn controllers_sort_by_priority() {
        let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app")
            .with_controller(ControllerMetadata::new("B", "B").priority(50))
            .with_controller(ControllerMetadata::new("A", "A").priority(10));
        let order: Vec<&str> = pkg
            .controllers_in_emission_order()
            .into_iter()
            .map(|c| c.base.name.as_str())
            .collect();
        assert_eq!(order, vec!["A", "B"]);
    }
}
