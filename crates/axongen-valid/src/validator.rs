//! Entry point that runs every rule over one package, or every package in
//! a loaded project, consolidating into one `ValidationReport`.

use axongen_spec::meta::PackageMetadata;
use axongen_spec::parser_registry::ParserRegistry;
use axongen_spec::LoadedProject;

use crate::report::ValidationReport;
use crate::rules;

/// Validate one package against the project-wide parser registry.
pub fn validate_package(package: &PackageMetadata, parsers: &ParserRegistry) -> ValidationReport {
    let mut report = ValidationReport::success();
    rules::ref_integrity::check(package, parsers, &mut report);
    rules::required_fields::check(package, &mut report);
    rules::cycle_detect::check(package, &mut report);
    report
}

/// Validate every package in a loaded project, keyed by package directory
/// so a caller can report exactly which packages failed without the whole
/// run aborting (spec.md §7 "diagnostics are accumulated per-package").
pub fn validate_project(project: &LoadedProject, parsers: &ParserRegistry) -> Vec<(String, ValidationReport)> {
    project
        .packages
        .iter()
        .map(|pkg| (pkg.package_dir.clone(), validate_package(pkg, parsers)))
        .collect()
}

#[cfg(test)]
mod tests {
    use axongen_spec::meta::{ControllerMetadata, Parameter, ParameterSource, RouteMetadata};

    use super::*;

    #[test]
    fn clean_package_validates_with_no_diagnostics() {
        let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app").with_controller(
            ControllerMetadata::new("UserController", "UserController").with_route(
                RouteMetadata::new("GET", "/users/{id:int}", "GetUser")
                    .with_parameter(Parameter::new("id", "int", ParameterSource::Path)),
            ),
        );
        let parsers = ParserRegistry::with_builtins();
        let report = validate_package(&pkg, &parsers);
        assert!(report.ok());
        assert!(report.diagnostics.is_empty());
    }
}
