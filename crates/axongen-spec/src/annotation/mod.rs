//! Component A — annotation schema registry & validator (spec.md §4.A).

mod registry;
mod schema;
pub mod wire;

pub use registry::SchemaRegistry;
pub use schema::{
    standard_schemas, standard_validators, AnnotationKind, AnnotationSchema, ParamSchema,
    ParamType, ParamValue, ParsedAnnotation,
};
pub use wire::parse_line;
