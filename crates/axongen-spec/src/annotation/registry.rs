use indexmap::IndexMap;

use crate::error::{GenError, GenErrorKind};

use super::schema::{AnnotationKind, AnnotationSchema, ParsedAnnotation};

/// Holds one schema per annotation kind. Registration is idempotent when the
/// same kind is registered with an identical parameter name set; registering
/// a second, different schema for a kind already present is a conflict
/// (spec.md §4.A).
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<AnnotationKind, AnnotationSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the nine built-in schemas (spec.md §3), then return the registry.
    pub fn with_standard_schemas() -> Self {
        let mut registry = Self::new();
        for schema in super::schema::standard_schemas() {
            registry
                .register(schema)
                .expect("standard schemas never conflict with each other");
        }
        registry
    }

    pub fn register(&mut self, schema: AnnotationSchema) -> Result<(), GenError> {
        if let Some(existing) = self.schemas.get(&schema.kind) {
            if !same_param_names(existing, &schema) {
                return Err(GenError::new(
                    GenErrorKind::ParserRegistration,
                    format!(
                        "schema for annotation kind '{}' was already registered with a different parameter set",
                        schema.kind
                    ),
                ));
            }
            return Ok(());
        }
        self.schemas.insert(schema.kind, schema);
        Ok(())
    }

    pub fn get(&self, kind: AnnotationKind) -> Option<&AnnotationSchema> {
        self.schemas.get(&kind)
    }

    /// Look up the schema for `annotation.kind` and run its validation
    /// pipeline. Fails with `ParserNotFound`-adjacent `Validation` error if no
    /// schema has been registered for the kind.
    pub fn validate(&self, annotation: &mut ParsedAnnotation) -> Result<(), GenError> {
        let schema = self.schemas.get(&annotation.kind).ok_or_else(|| {
            GenError::new(
                GenErrorKind::Validation,
                format!("no schema registered for annotation kind '{}'", annotation.kind),
            )
            .at(annotation.location.clone())
        })?;
        schema.validate(annotation)
    }
}

fn same_param_names(a: &AnnotationSchema, b: &AnnotationSchema) -> bool {
    a.params.len() == b.params.len() && a.params.keys().all(|k| b.params.contains_key(k))
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use crate::common::SourceLocation;

    use super::super::schema::{ParamSchema, ParamType};
    use super::*;

    #[test]
    fn reregistering_identical_schema_is_a_noop() {
        let mut registry = SchemaRegistry::new();
        let schema = AnnotationSchema::new(
            AnnotationKind::Logger,
            vec![ParamSchema::new("Name", ParamType::String)],
        );
        registry.register(schema.clone()).unwrap();
        registry.register(schema).unwrap();
        assert!(registry.get(AnnotationKind::Logger).is_some());
    }

    #[test]
    fn reregistering_with_different_params_conflicts() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(AnnotationSchema::new(
                AnnotationKind::Logger,
                vec![ParamSchema::new("Name", ParamType::String)],
            ))
            .unwrap();
        let err = registry
            .register(AnnotationSchema::new(
                AnnotationKind::Logger,
                vec![ParamSchema::new("Level", ParamType::String)],
            ))
            .unwrap_err();
        assert_eq!(err.kind, GenErrorKind::ParserRegistration);
    }

    #[test]
    fn validate_with_no_schema_registered_fails() {
        let registry = SchemaRegistry::new();
        let mut ann = ParsedAnnotation::new(
            AnnotationKind::Core,
            IndexMap::new(),
            SourceLocation::unknown(),
        );
        let err = registry.validate(&mut ann).unwrap_err();
        assert_eq!(err.kind, GenErrorKind::Validation);
    }

    #[test]
    fn standard_schemas_cover_all_kinds() {
        let registry = SchemaRegistry::with_standard_schemas();
        for kind in AnnotationKind::ALL {
            assert!(registry.get(kind).is_some(), "missing schema for {kind}");
        }
    }
}
