//! Cross-reference checks within a package (spec.md §3 invariants): every
//! typed path segment has a registered parser, every named middleware is
//! declared somewhere in the package, and every interface's backing struct
//! exists among the package's services/loggers.

use axongen_spec::common::SourceLocation;
use axongen_spec::meta::PackageMetadata;
use axongen_spec::parser_registry::ParserRegistry;

use crate::report::{Diagnostic, ValidationReport};

use super::{E_INTERFACE_STRUCT_NOT_FOUND, E_MIDDLEWARE_NOT_FOUND, E_PARSER_NOT_FOUND};

pub fn check(package: &PackageMetadata, parsers: &ParserRegistry, report: &mut ValidationReport) {
    check_path_parsers(package, parsers, report);
    check_middleware_refs(package, report);
    check_interface_structs(package, report);
}

fn check_path_parsers(package: &PackageMetadata, parsers: &ParserRegistry, report: &mut ValidationReport) {
    for controller in &package.controllers {
        for route in &controller.routes {
            for param in route.path_parameters() {
                if param.parser_func.is_some() {
                    continue;
                }
                if !parsers.has(&param.type_name) {
                    report.push(
                        Diagnostic::error(
                            E_PARSER_NOT_FOUND,
                            format!(
                                "route {} {} parameter '{}' has no registered parser for type '{}'",
                                route.method, route.path, param.exposed_name(), param.type_name
                            ),
                            SourceLocation::unknown(),
                        )
                        .with_suggestion(format!(
                            "register a route_parser for '{}', or choose one of: {}",
                            param.type_name,
                            parsers.list().join(", ")
                        )),
                    );
                }
            }
        }
    }
}

fn declared_middleware_names(package: &PackageMetadata) -> Vec<&str> {
    package.middlewares.iter().map(|m| m.base.name.as_str()).collect()
}

fn check_middleware_refs(package: &PackageMetadata, report: &mut ValidationReport) {
    let declared = declared_middleware_names(package);
    for controller in &package.controllers {
        for name in &controller.middlewares {
            if !declared.contains(&name.as_str()) {
                report.push(Diagnostic::error(
                    E_MIDDLEWARE_NOT_FOUND,
                    format!(
                        "controller '{}' references undeclared middleware '{name}'",
                        controller.base.name
                    ),
                    SourceLocation::unknown(),
                ));
            }
        }
        for route in &controller.routes {
            for name in &route.middlewares {
                if !declared.contains(&name.as_str()) {
                    report.push(Diagnostic::error(
                        E_MIDDLEWARE_NOT_FOUND,
                        format!(
                            "route {} {} references undeclared middleware '{name}'",
                            route.method, route.path
                        ),
                        SourceLocation::unknown(),
                    ));
                }
            }
        }
    }
}

fn check_interface_structs(package: &PackageMetadata, report: &mut ValidationReport) {
    let struct_names: Vec<&str> = package
        .core_services
        .iter()
        .map(|s| s.base.struct_name.as_str())
        .chain(package.loggers.iter().map(|l| l.base.struct_name.as_str()))
        .collect();

    for interface in &package.interfaces {
        if !struct_names.contains(&interface.struct_name.as_str()) {
            report.push(
                Diagnostic::error(
                    E_INTERFACE_STRUCT_NOT_FOUND,
                    format!(
                        "interface '{}' derives from struct '{}', which has no matching core service or logger in this package",
                        interface.name, interface.struct_name
                    ),
                    SourceLocation::unknown(),
                )
                .with_suggestion(format!(
                    "declare a core or logger component backed by struct '{}'",
                    interface.struct_name
                )),
            );
        }
    }
}
