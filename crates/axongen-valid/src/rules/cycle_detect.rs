//! Detect cycles in the DI dependency graph formed by core services and
//! loggers within a package: if `A` injects `B` and `B` injects `A`, no
//! constructor order exists and the generated `Provide` calls would
//! deadlock the container at resolve time. A depth-first search with an
//! explicit recursion stack over `Dependency::type_name` edges finds any
//! such cycle.

use std::collections::{HashMap, HashSet};

use axongen_spec::common::SourceLocation;
use axongen_spec::meta::PackageMetadata;

use crate::report::{Diagnostic, ValidationReport};

use super::E_DEPENDENCY_CYCLE;

pub fn check(package: &PackageMetadata, report: &mut ValidationReport) {
    let graph = build_graph(package);

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();
    let mut nodes: Vec<&String> = graph.keys().collect();
    nodes.sort();

    for node in nodes {
        if !visited.contains(node) {
            let mut path = Vec::new();
            if let Some(cycle) = dfs_find_cycle(node, &graph, &mut visited, &mut in_stack, &mut path) {
                report.push(Diagnostic::error(
                    E_DEPENDENCY_CYCLE,
                    format!("circular dependency detected: {}", cycle.join(" -> ")),
                    SourceLocation::unknown(),
                ).with_suggestion(
                    "break the cycle by marking one side `is_init` or introducing an interface seam",
                ));
            }
        }
    }
}

/// Node identity is the struct name; an edge `A -> B` means `A` has an
/// injected (non-`is_init`) dependency whose declared type resolves to a
/// struct this package also provisions.
fn build_graph(package: &PackageMetadata) -> HashMap<String, Vec<String>> {
    let known_structs: HashSet<&str> = package
        .core_services
        .iter()
        .map(|s| s.base.struct_name.as_str())
        .chain(package.loggers.iter().map(|l| l.base.struct_name.as_str()))
        .collect();

    let mut graph: HashMap<String, Vec<String>> = HashMap::new();

    for service in &package.core_services {
        let edges = graph.entry(service.base.struct_name.clone()).or_default();
        for dep in service.base.injected_dependencies() {
            let target = strip_pointer(&dep.type_name);
            if known_structs.contains(target) {
                edges.push(target.to_string());
            }
        }
    }
    for logger in &package.loggers {
        let edges = graph.entry(logger.base.struct_name.clone()).or_default();
        for dep in logger.base.injected_dependencies() {
            let target = strip_pointer(&dep.type_name);
            if known_structs.contains(target) {
                edges.push(target.to_string());
            }
        }
    }

    graph
}

fn strip_pointer(type_name: &str) -> &str {
    type_name.trim_start_matches('*')
}

fn dfs_find_cycle(
    node: &str,
    graph: &HashMap<String, Vec<String>>,
    visited: &mut HashSet<String>,
    in_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(node.to_string());
    in_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(edges) = graph.get(node) {
        for target in edges {
            if !visited.contains(target) {
                if let Some(cycle) = dfs_find_cycle(target, graph, visited, in_stack, path) {
                    return Some(cycle);
                }
            } else if in_stack.contains(target) {
                let start_idx = path.iter().position(|n| n == target).unwrap_or(0);
                let mut cycle: Vec<String> = path[start_idx..].to_vec();
                cycle.push(target.clone());
                return Some(cycle);
            }
        }
    }

    in_stack.remove(node);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use axongen_spec::meta::{Base, CoreServiceMetadata, Dependency};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn no_cycle_in_a_linear_chain() {
        let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app")
            .with_core_service(CoreServiceMetadata {
                base: Base::new("UserService", "UserService")
                    .with_dependency(Dependency::new("Repo", "*UserRepository")),
                ..CoreServiceMetadata::new("UserService", "UserService")
            })
            .with_core_service(CoreServiceMetadata::new("UserRepository", "UserRepository"));

        let mut report = ValidationReport::success();
        check(&pkg, &mut report);
        assert!(report.ok());
    }

    #[test]
    fn direct_cycle_is_detected() {
        let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app")
            .with_core_service(CoreServiceMetadata {
                base: Base::new("A", "A").with_dependency(Dependency::new("B", "*B")),
                ..CoreServiceMetadata::new("A", "A")
            })
            .with_core_service(CoreServiceMetadata {
                base: Base::new("B", "B").with_dependency(Dependency::new("A", "*A")),
                ..CoreServiceMetadata::new("B", "B")
            });

        let mut report = ValidationReport::success();
        check(&pkg, &mut report);
        assert!(!report.ok());
        assert_eq!(report.diagnostics[0].code, E_DEPENDENCY_CYCLE);
    }

    #[test]
    fn init_dependency_never_creates_an_edge() {
        let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app")
            .with_core_service(CoreServiceMetadata {
                base: Base::new("A", "A").with_dependency(Dependency::new("B", "*B").init()),
                ..CoreServiceMetadata::new("A", "A")
            })
            .with_core_service(CoreServiceMetadata {
                base: Base::new("B", "B").with_dependency(Dependency::new("A", "*A")),
                ..CoreServiceMetadata::new("B", "B")
            });

        let mut report = ValidationReport::success();
        check(&pkg, &mut report);
        assert!(report.ok());
    }
}
