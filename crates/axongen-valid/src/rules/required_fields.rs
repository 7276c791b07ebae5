//! Structural completeness/conflict checks that apply once metadata has
//! been assembled into a whole package, beyond what a single annotation's
//! schema validation (spec.md §4.A) can see in isolation: duplicate names
//! within the same package (the oracle is expected to guarantee
//! uniqueness, but axongen defends against a malformed fixture anyway),
//! and a `Manual` + user `Constructor` combination that leaves the
//! generator no provider to emit.

use std::collections::HashSet;

use axongen_spec::common::SourceLocation;
use axongen_spec::meta::PackageMetadata;

use crate::report::{Diagnostic, ValidationReport};

use super::{E_AMBIGUOUS_PROVIDER, E_DUPLICATE_NAME, W_EMPTY_HANDLER_NAME, W_LIFECYCLE_ON_TRANSIENT};

pub fn check(package: &PackageMetadata, report: &mut ValidationReport) {
    check_duplicate_names(package, report);
    check_manual_constructor_conflicts(package, report);
    check_transient_lifecycle(package, report);
    check_empty_handler_names(package, report);
}

fn check_duplicate_names(package: &PackageMetadata, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    let all_names = package
        .core_services
        .iter()
        .map(|s| &s.base.name)
        .chain(package.loggers.iter().map(|l| &l.base.name))
        .chain(package.middlewares.iter().map(|m| &m.base.name))
        .chain(package.controllers.iter().map(|c| &c.base.name))
        .chain(package.interfaces.iter().map(|i| &i.name));

    for name in all_names {
        if !seen.insert(name.clone()) {
            report.push(Diagnostic::error(
                E_DUPLICATE_NAME,
                format!("component name '{name}' is declared more than once in package '{}'", package.package_name),
                SourceLocation::unknown(),
            ));
        }
    }
}

fn check_manual_constructor_conflicts(package: &PackageMetadata, report: &mut ValidationReport) {
    for service in &package.core_services {
        if service.manual.is_manual() && service.has_user_constructor() {
            report.push(
                Diagnostic::error(
                    E_AMBIGUOUS_PROVIDER,
                    format!(
                        "core service '{}' sets both Manual and Constructor; only one may select how it is provisioned",
                        service.base.name
                    ),
                    SourceLocation::unknown(),
                )
                .with_suggestion("remove either -Manual or -Constructor from the annotation"),
            );
        }
    }
}

fn check_transient_lifecycle(package: &PackageMetadata, report: &mut ValidationReport) {
    for service in &package.core_services {
        if service.service_mode.is_transient() && service.lifecycle.has_lifecycle() {
            report.push(Diagnostic::warning(
                W_LIFECYCLE_ON_TRANSIENT,
                format!(
                    "core service '{}' is Transient but declares Start/Stop hooks; lifecycle is forbidden on Transient services and will be ignored",
                    service.base.name
                ),
                SourceLocation::unknown(),
            ));
        }
    }
}

fn check_empty_handler_names(package: &PackageMetadata, report: &mut ValidationReport) {
    for controller in &package.controllers {
        for route in &controller.routes {
            if route.handler_name.trim().is_empty() {
                report.push(Diagnostic::warning(
                    W_EMPTY_HANDLER_NAME,
                    format!(
                        "route {} {} on controller '{}' has no handler name",
                        route.method, route.path, controller.base.name
                    ),
                    SourceLocation::unknown(),
                ));
            }
        }
    }
}
