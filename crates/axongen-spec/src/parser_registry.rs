//! Component C — parser registry (spec.md §4.C).

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::SourceLocation;
use crate::error::{GenError, GenErrorKind};

/// A declared path-parameter parser: a function `(ctx, raw) -> (T, error)`
/// keyed in the registry by the unqualified type name `T` (spec.md §3, §4.C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteParserMetadata {
    pub type_name: String,
    pub function_name: String,
    /// `"builtin"` for provided parsers, empty for same-package, else an
    /// absolute import path.
    pub package_path: String,
    pub param_types: Vec<String>,
    pub return_types: Vec<String>,
    pub location: SourceLocation,
    /// True only for the reserved `QueryMap` pseudo-type, which the
    /// generator decodes via a framework helper rather than a function call.
    pub is_framework_helper: bool,
}

impl RouteParserMetadata {
    pub fn new(type_name: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            function_name: function_name.into(),
            package_path: String::new(),
            param_types: vec!["context.Context".to_string(), "string".to_string()],
            return_types: Vec::new(),
            location: SourceLocation::unknown(),
            is_framework_helper: false,
        }
    }

    pub fn builtin(type_name: impl Into<String>, function_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            return_types: vec![type_name.clone(), "error".to_string()],
            package_path: "builtin".to_string(),
            ..Self::new(type_name, function_name)
        }
    }

    pub fn in_package(mut self, package_path: impl Into<String>) -> Self {
        self.package_path = package_path.into();
        self
    }

    pub fn returning(mut self, return_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.return_types = return_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// `axon.ParseInt` for built-ins, the bare function name for same-package
    /// parsers, `pkgBase.FunctionName` for cross-package ones (spec.md §4.G step 1).
    pub fn call_expression(&self) -> String {
        if self.is_framework_helper {
            return format!("axon.{}", self.function_name);
        }
        match self.package_path.as_str() {
            "builtin" => format!("axon.{}", self.function_name),
            "" => self.function_name.clone(),
            path => {
                let base = path.rsplit('/').next().unwrap_or(path);
                format!("{base}.{}", self.function_name)
            }
        }
    }

    /// Validates the `(ctx, raw) -> (T, error)` signature contract
    /// (spec.md §4.C).
    fn matches_contract(&self) -> Result<(), GenError> {
        let expected = "func(ctx context.Context, raw string) (T, error)";
        if self.is_framework_helper {
            return Ok(());
        }
        if self.param_types.len() != 2 || self.return_types.len() != 2 {
            return Err(GenError::new(
                GenErrorKind::ParserValidation,
                format!(
                    "parser '{}' for type '{}' does not match the expected signature {expected}",
                    self.function_name, self.type_name
                ),
            )
            .at(self.location.clone()));
        }
        if self.return_types[1] != "error" {
            return Err(GenError::new(
                GenErrorKind::ParserValidation,
                format!(
                    "parser '{}' for type '{}' must return (T, error), got ({}, {})",
                    self.function_name, self.type_name, self.return_types[0], self.return_types[1]
                ),
            )
            .at(self.location.clone()));
        }
        Ok(())
    }
}

fn builtin_parsers() -> Vec<RouteParserMetadata> {
    vec![
        RouteParserMetadata::builtin("int", "ParseInt"),
        RouteParserMetadata::builtin("string", "ParseString"),
        RouteParserMetadata {
            is_framework_helper: true,
            function_name: "NewQueryMap".to_string(),
            package_path: "builtin".to_string(),
            param_types: vec!["context.Context".to_string()],
            return_types: vec!["QueryMap".to_string()],
            ..RouteParserMetadata::new("QueryMap", "NewQueryMap")
        },
    ]
}

/// Process-wide store of path-parameter parsers: populated once, read-only
/// thereafter (spec.md §5).
#[derive(Default)]
pub struct ParserRegistry {
    by_type: IndexMap<String, RouteParserMetadata>,
    conflicts: IndexMap<String, Vec<SourceLocation>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with `int`, `string`, and `QueryMap`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for parser in builtin_parsers() {
            registry.register(parser).expect("builtin parsers never conflict");
        }
        registry
    }

    pub fn register(&mut self, parser: RouteParserMetadata) -> Result<(), GenError> {
        parser.matches_contract()?;
        if let Some(existing) = self.by_type.get(&parser.type_name) {
            self.conflicts
                .entry(parser.type_name.clone())
                .or_insert_with(|| vec![existing.location.clone()])
                .push(parser.location.clone());
            return Err(GenError::new(
                GenErrorKind::ParserRegistration,
                format!(
                    "parser for type '{}' at {} conflicts with the registration at {}",
                    parser.type_name, parser.location, existing.location
                ),
            )
            .at(parser.location));
        }
        self.by_type.insert(parser.type_name.clone(), parser);
        Ok(())
    }

    /// Look up by the unqualified type name, stripping a `pkg.` qualifier if present.
    pub fn get(&self, type_name: &str) -> Option<&RouteParserMetadata> {
        let unqualified = type_name.rsplit('.').next().unwrap_or(type_name);
        self.by_type.get(unqualified)
    }

    pub fn has(&self, type_name: &str) -> bool {
        self.get(type_name).is_some()
    }

    /// All currently-registered type names, in registration order.
    pub fn list(&self) -> Vec<&str> {
        self.by_type.keys().map(String::as_str).collect()
    }

    pub fn get_all(&self) -> impl Iterator<Item = &RouteParserMetadata> {
        self.by_type.values()
    }

    pub fn clear(&mut self) {
        self.by_type.clear();
        self.conflicts.clear();
    }

    /// All conflicts discovered since the last `clear`, each with every
    /// offending registration site (spec.md §7, `ParserConflict`).
    pub fn conflict_report(&self) -> Option<GenError> {
        if self.conflicts.is_empty() {
            return None;
        }
        let mut err = GenError::new(GenErrorKind::ParserConflict, "duplicate parser registrations found");
        for (type_name, sites) in &self.conflicts {
            let sites_text = sites
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            err = err.with_context(type_name.clone(), sites_text);
        }
        Some(err)
    }

    /// Produce a `ParserNotFound` diagnostic listing every currently
    /// available type name (spec.md §7).
    pub fn not_found(&self, type_name: &str, location: SourceLocation) -> GenError {
        GenError::new(
            GenErrorKind::ParserNotFound,
            format!("no parser registered for path parameter type '{type_name}'"),
        )
        .at(location)
        .with_context("available", self.list().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtins_cover_int_string_querymap() {
        let registry = ParserRegistry::with_builtins();
        assert!(registry.has("int"));
        assert!(registry.has("string"));
        assert!(registry.has("QueryMap"));
    }

    #[test]
    fn qualified_lookup_strips_package_prefix() {
        let mut registry = ParserRegistry::new();
        registry
            .register(RouteParserMetadata::new("UUID", "ParseUUID").in_package("pkg/util").returning(["UUID", "error"]))
            .unwrap();
        assert!(registry.get("util.UUID").is_some());
    }

    #[test]
    fn duplicate_registration_is_a_conflict() {
        let mut registry = ParserRegistry::new();
        registry
            .register(RouteParserMetadata::new("UUID", "ParseUUID").returning(["UUID", "error"]).at(SourceLocation::new("a.go", 1, 1)))
            .unwrap();
        let err = registry
            .register(RouteParserMetadata::new("UUID", "ParseUUID2").returning(["UUID", "error"]).at(SourceLocation::new("b.go", 2, 1)))
            .unwrap_err();
        assert_eq!(err.kind, GenErrorKind::ParserConflict);
        assert!(registry.conflict_report().is_some());
    }

    #[test]
    fn bad_signature_is_rejected() {
        let mut registry = ParserRegistry::new();
        let err = registry
            .register(RouteParserMetadata::new("UUID", "ParseUUID").returning(["UUID"]))
            .unwrap_err();
        assert_eq!(err.kind, GenErrorKind::ParserValidation);
    }

    #[test]
    fn call_expression_forms() {
        let builtin = RouteParserMetadata::builtin("int", "ParseInt");
        assert_eq!(builtin.call_expression(), "axon.ParseInt");

        let same_package = RouteParserMetadata::new("UUID", "ParseUUID").returning(["UUID", "error"]);
        assert_eq!(same_package.call_expression(), "ParseUUID");

        let cross_package = RouteParserMetadata::new("UUID", "ParseUUID")
            .in_package("example.com/app/pkg/util")
            .returning(["UUID", "error"]);
        assert_eq!(cross_package.call_expression(), "util.ParseUUID");
    }

    #[test]
    fn not_found_lists_available_types() {
        let registry = ParserRegistry::with_builtins();
        let err = registry.not_found("UUID", SourceLocation::unknown());
        assert_eq!(err.kind, GenErrorKind::ParserNotFound);
        assert!(err.context.get("available").unwrap().contains("int"));
    }
}
