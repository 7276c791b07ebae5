use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::common::SourceLocation;
use crate::error::{GenError, GenErrorKind};

/// The closed set of recognized annotation kinds (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Controller,
    Route,
    Middleware,
    Core,
    Interface,
    Inject,
    Init,
    Logger,
    RouteParser,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 9] = [
        AnnotationKind::Controller,
        AnnotationKind::Route,
        AnnotationKind::Middleware,
        AnnotationKind::Core,
        AnnotationKind::Interface,
        AnnotationKind::Inject,
        AnnotationKind::Init,
        AnnotationKind::Logger,
        AnnotationKind::RouteParser,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            AnnotationKind::Controller => "controller",
            AnnotationKind::Route => "route",
            AnnotationKind::Middleware => "middleware",
            AnnotationKind::Core => "core",
            AnnotationKind::Interface => "interface",
            AnnotationKind::Inject => "inject",
            AnnotationKind::Init => "init",
            AnnotationKind::Logger => "logger",
            AnnotationKind::RouteParser => "route_parser",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.wire_name() == name)
    }
}

impl std::fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// One of the four parameter types a schema can declare (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ParamType {
    String,
    Int,
    Bool,
    StringList,
}

impl ParamType {
    /// The zero value typed accessors fall back to when a parameter is absent.
    pub fn zero_value(&self) -> ParamValue {
        match self {
            ParamType::String => ParamValue::Str(String::new()),
            ParamType::Int => ParamValue::Int(0),
            ParamType::Bool => ParamValue::Bool(false),
            ParamType::StringList => ParamValue::List(Vec::new()),
        }
    }
}

/// A coerced parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::List(l) => Some(l),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Str(_) => "string",
            ParamValue::Int(_) => "int",
            ParamValue::Bool(_) => "bool",
            ParamValue::List(_) => "string-list",
        }
    }
}

/// A pure validator function: receives the coerced value, returns a failure reason.
pub type Validator = fn(&ParamValue) -> Result<(), String>;

/// Declares one recognized parameter for an annotation kind.
#[derive(Clone)]
pub struct ParamSchema {
    pub name: String,
    pub ty: ParamType,
    pub required: bool,
    pub default: Option<ParamValue>,
    pub description: String,
    pub validator: Option<Validator>,
}

impl ParamSchema {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            default: None,
            description: String::new(),
            validator: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: ParamValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate_with(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// A schema for one annotation kind: the recognized parameter name set plus,
/// per parameter, its type/required/default/description/validator.
#[derive(Clone)]
pub struct AnnotationSchema {
    pub kind: AnnotationKind,
    pub params: IndexMap<String, ParamSchema>,
}

impl AnnotationSchema {
    pub fn new(kind: AnnotationKind, params: Vec<ParamSchema>) -> Self {
        let params = params.into_iter().map(|p| (p.name.clone(), p)).collect();
        Self { kind, params }
    }

    /// Run the three-step validation pipeline against `annotation`, storing
    /// the coerced, defaulted values back onto it. Returns the first
    /// structured error encountered (spec.md §4.A).
    pub fn validate(&self, annotation: &mut ParsedAnnotation) -> Result<(), GenError> {
        if annotation.kind != self.kind {
            return Err(GenError::new(
                GenErrorKind::Validation,
                format!(
                    "annotation kind mismatch: schema is for '{}', annotation is '{}'",
                    self.kind, annotation.kind
                ),
            )
            .at(annotation.location.clone()));
        }

        let mut values = IndexMap::new();

        for (name, param_schema) in &self.params {
            let raw = annotation.raw.get(name);

            // Step 1: apply defaults for missing optional parameters.
            let coerced = match raw {
                Some(raw_value) => {
                    // Step 2: coerce.
                    coerce(raw_value, param_schema.ty).map_err(|reason| {
                        GenError::new(GenErrorKind::Validation, reason)
                            .at(annotation.location.clone())
                            .with_context("parameter", name.clone())
                    })?
                }
                None => match &param_schema.default {
                    Some(default) => default.clone(),
                    None => {
                        if param_schema.required {
                            return Err(GenError::new(
                                GenErrorKind::Validation,
                                format!("required parameter '{name}' is missing"),
                            )
                            .at(annotation.location.clone())
                            .with_context("parameter", name.clone())
                            .suggest(format!(
                                "add -{name}=<value> to the {} annotation",
                                self.kind
                            )));
                        }
                        continue;
                    }
                },
            };

            // Step 3: invoke the validator.
            if let Some(validator) = param_schema.validator {
                if let Err(reason) = validator(&coerced) {
                    return Err(GenError::new(GenErrorKind::Validation, reason)
                        .at(annotation.location.clone())
                        .with_context("parameter", name.clone()));
                }
            }

            values.insert(name.clone(), coerced);
        }

        annotation.values = values;
        Ok(())
    }
}

/// Coerce a raw wire-format string into the declared type.
fn coerce(raw: &str, ty: ParamType) -> Result<ParamValue, String> {
    match ty {
        ParamType::String => Ok(ParamValue::Str(raw.to_string())),
        ParamType::Int => raw
            .parse::<i64>()
            .map(ParamValue::Int)
            .map_err(|_| format!("expected an integer, got '{raw}'")),
        ParamType::Bool => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(ParamValue::Bool(true)),
            "false" | "0" | "no" => Ok(ParamValue::Bool(false)),
            other => Err(format!("expected a boolean, got '{other}'")),
        },
        ParamType::StringList => Ok(ParamValue::List(
            raw.split(',').map(|s| s.trim().to_string()).collect(),
        )),
    }
}

/// An annotation after wire-format parsing: kind, raw string params, and
/// (once `AnnotationSchema::validate` has run) the coerced typed values.
#[derive(Debug, Clone)]
pub struct ParsedAnnotation {
    pub kind: AnnotationKind,
    pub raw: IndexMap<String, String>,
    pub location: SourceLocation,
    values: IndexMap<String, ParamValue>,
}

impl ParsedAnnotation {
    pub fn new(
        kind: AnnotationKind,
        raw: IndexMap<String, String>,
        location: SourceLocation,
    ) -> Self {
        Self {
            kind,
            raw,
            location,
            values: IndexMap::new(),
        }
    }

    pub fn get_string(&self, name: &str) -> String {
        self.values
            .get(name)
            .and_then(ParamValue::as_str)
            .map(str::to_string)
            .unwrap_or_default()
    }

    pub fn get_int(&self, name: &str) -> i64 {
        self.values.get(name).and_then(ParamValue::as_int).unwrap_or(0)
    }

    pub fn get_bool(&self, name: &str) -> bool {
        self.values
            .get(name)
            .and_then(ParamValue::as_bool)
            .unwrap_or(false)
    }

    pub fn get_string_list(&self, name: &str) -> Vec<String> {
        self.values
            .get(name)
            .and_then(ParamValue::as_list)
            .map(|l| l.to_vec())
            .unwrap_or_default()
    }

    /// Whether this parameter has any value (explicit or defaulted) after validation.
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

fn type_mismatch(expected: &str, value: &ParamValue) -> String {
    format!("expected {expected}, got {}", value.type_name())
}

/// The nine built-in schemas, one per recognized annotation kind. The four
/// kinds spec.md doesn't spell out a parameter table for (interface, inject,
/// init, route_parser) get minimal schemas here; see DESIGN.md for the call.
pub fn standard_schemas() -> Vec<AnnotationSchema> {
    vec![
        AnnotationSchema::new(
            AnnotationKind::Core,
            vec![
                ParamSchema::new("Mode", ParamType::String)
                    .default_value(ParamValue::Str("Singleton".to_string()))
                    .describe("Singleton or Transient construction")
                    .validate_with(standard_validators::service_mode),
                ParamSchema::new("Init", ParamType::String)
                    .default_value(ParamValue::Str("Same".to_string()))
                    .describe("Same or Background start mode")
                    .validate_with(standard_validators::start_mode),
                ParamSchema::new("Manual", ParamType::String)
                    .describe("module identifier to reference instead of a generated provider"),
                ParamSchema::new("Constructor", ParamType::String)
                    .describe("explicit constructor function name")
                    .validate_with(standard_validators::identifier),
            ],
        ),
        AnnotationSchema::new(
            AnnotationKind::Controller,
            vec![
                ParamSchema::new("Prefix", ParamType::String)
                    .default_value(ParamValue::Str(String::new()))
                    .describe("base path prepended to every route on this controller"),
                ParamSchema::new("Middleware", ParamType::StringList)
                    .describe("middleware applied to every route on this controller"),
                ParamSchema::new("Priority", ParamType::Int)
                    .default_value(ParamValue::Int(100))
                    .describe("registration ordering among controllers"),
            ],
        ),
        AnnotationSchema::new(
            AnnotationKind::Route,
            vec![
                ParamSchema::new("method", ParamType::String)
                    .required()
                    .describe("HTTP method")
                    .validate_with(standard_validators::http_method),
                ParamSchema::new("path", ParamType::String)
                    .required()
                    .describe("route path, may contain {name:type} segments")
                    .validate_with(standard_validators::url_path_prefix),
                ParamSchema::new("Middleware", ParamType::StringList)
                    .describe("middleware applied to this route only"),
                ParamSchema::new("PassContext", ParamType::Bool)
                    .default_value(ParamValue::Bool(false))
                    .describe("force a prepended context argument on the handler call"),
                ParamSchema::new("Priority", ParamType::Int)
                    .default_value(ParamValue::Int(100))
                    .describe("registration ordering among routes on the same controller"),
            ],
        ),
        AnnotationSchema::new(
            AnnotationKind::Middleware,
            vec![
                ParamSchema::new("Priority", ParamType::Int)
                    .default_value(ParamValue::Int(100))
                    .describe("ordering among global middleware"),
                ParamSchema::new("Global", ParamType::Bool)
                    .default_value(ParamValue::Bool(false))
                    .describe("applied to every route in the module when true"),
            ],
        ),
        AnnotationSchema::new(
            AnnotationKind::Logger,
            vec![ParamSchema::new("Manual", ParamType::String)
                .describe("module identifier to reference instead of a generated provider")],
        ),
        AnnotationSchema::new(
            AnnotationKind::Interface,
            vec![ParamSchema::new("Name", ParamType::String)
                .describe("override for the generated interface provider name")
                .validate_with(standard_validators::identifier)],
        ),
        AnnotationSchema::new(
            AnnotationKind::Inject,
            vec![ParamSchema::new("Name", ParamType::String)
                .describe("qualifier selecting among multiple providers of the same type")],
        ),
        AnnotationSchema::new(AnnotationKind::Init, vec![]),
        AnnotationSchema::new(
            AnnotationKind::RouteParser,
            vec![ParamSchema::new("Type", ParamType::String)
                .required()
                .describe("path parameter type this parser decodes")
                .validate_with(standard_validators::identifier)],
        ),
    ]
}

/// Standard validators shared across built-in schemas (spec.md §4.A).
pub mod standard_validators {
    use super::*;

    pub fn http_method(value: &ParamValue) -> Result<(), String> {
        let s = value.as_str().ok_or_else(|| type_mismatch("a string", value))?;
        const METHODS: &[&str] = &[
            "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS",
        ];
        if METHODS.contains(&s) {
            Ok(())
        } else {
            Err(format!(
                "'{s}' is not a recognized HTTP method (expected one of {})",
                METHODS.join(", ")
            ))
        }
    }

    pub fn url_path_prefix(value: &ParamValue) -> Result<(), String> {
        let s = value.as_str().ok_or_else(|| type_mismatch("a string", value))?;
        if s.starts_with('/') {
            Ok(())
        } else {
            Err(format!("path '{s}' must start with '/'"))
        }
    }

    pub fn service_mode(value: &ParamValue) -> Result<(), String> {
        let s = value.as_str().ok_or_else(|| type_mismatch("a string", value))?;
        if s == "Singleton" || s == "Transient" {
            Ok(())
        } else {
            Err(format!("'{s}' must be one of Singleton, Transient"))
        }
    }

    pub fn start_mode(value: &ParamValue) -> Result<(), String> {
        let s = value.as_str().ok_or_else(|| type_mismatch("a string", value))?;
        if s == "Same" || s == "Background" {
            Ok(())
        } else {
            Err(format!("'{s}' must be one of Same, Background"))
        }
    }

    pub fn identifier(value: &ParamValue) -> Result<(), String> {
        let s = value.as_str().ok_or_else(|| type_mismatch("a string", value))?;
        let re = regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
        if re.is_match(s) {
            Ok(())
        } else {
            Err(format!("'{s}' is not a valid identifier"))
        }
    }
}
