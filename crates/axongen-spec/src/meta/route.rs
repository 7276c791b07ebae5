use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where a handler parameter's value comes from (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum ParameterSource {
    Path,
    Body,
    Context,
}

/// One argument of the annotated handler method (spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub source: ParameterSource,
    pub required: bool,
    /// Original position in the handler signature; `None` when the oracle
    /// could not determine one (e.g. a synthesized context parameter).
    pub position: Option<u32>,
    pub is_custom_type: bool,
    pub parser_func: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, source: ParameterSource) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            source,
            required: true,
            position: None,
            is_custom_type: false,
            parser_func: None,
        }
    }

    pub fn at_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn custom_type(mut self) -> Self {
        self.is_custom_type = true;
        self
    }

    pub fn with_parser(mut self, func: impl Into<String>) -> Self {
        self.parser_func = Some(func.into());
        self
    }

    /// A path parameter whose metadata name ends with `:*` is the wildcard
    /// segment; it is decoded from the router's wildcard slot and exposed to
    /// the handler under the stripped name (spec.md §4.F "Path conversion").
    pub fn is_wildcard(&self) -> bool {
        self.name.ends_with(":*")
    }

    /// The name exposed to the handler, with any `:*` wildcard suffix stripped.
    pub fn exposed_name(&self) -> &str {
        self.name.strip_suffix(":*").unwrap_or(&self.name)
    }
}

/// How a route's return values map onto an HTTP response (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum ReturnTypeKind {
    DataError,
    ResponseError,
    ErrorOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReturnTypeInfo {
    pub kind: ReturnTypeKind,
    pub data_type: String,
    pub has_error: bool,
    pub uses_response: bool,
}

impl ReturnTypeInfo {
    pub fn data_error(data_type: impl Into<String>) -> Self {
        Self {
            kind: ReturnTypeKind::DataError,
            data_type: data_type.into(),
            has_error: true,
            uses_response: false,
        }
    }

    pub fn response_error() -> Self {
        Self {
            kind: ReturnTypeKind::ResponseError,
            data_type: String::new(),
            has_error: true,
            uses_response: true,
        }
    }

    pub fn error_only() -> Self {
        Self {
            kind: ReturnTypeKind::ErrorOnly,
            data_type: String::new(),
            has_error: true,
            uses_response: false,
        }
    }
}

/// One HTTP route on a controller (spec.md §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RouteMetadata {
    pub method: String,
    pub path: String,
    pub handler_name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: ReturnTypeInfo,
    pub middlewares: Vec<String>,
    pub flags: Vec<String>,
    pub priority: i64,
}

impl RouteMetadata {
    pub fn new(method: impl Into<String>, path: impl Into<String>, handler_name: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            handler_name: handler_name.into(),
            parameters: Vec::new(),
            return_type: ReturnTypeInfo::error_only(),
            middlewares: Vec::new(),
            flags: Vec::new(),
            priority: 100,
        }
    }

    pub fn with_parameter(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn returning(mut self, return_type: ReturnTypeInfo) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_middlewares(mut self, middlewares: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.middlewares.extend(middlewares.into_iter().map(Into::into));
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn path_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.source == ParameterSource::Path)
    }

    pub fn body_parameter(&self) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.source == ParameterSource::Body)
    }

    /// Non-`GET` methods with a declared body parameter get a body-decode site
    /// (spec.md §4.G step 2).
    pub fn decodes_body(&self) -> bool {
        self.method.to_ascii_uppercase() != "GET" && self.body_parameter().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wildcard_path_parameter_exposes_stripped_name() {
        let p = Parameter::new("rest:*", "string", ParameterSource::Path);
        assert!(p.is_wildcard());
        assert_eq!(p.exposed_name(), "rest");
    }

    #[test]
    fn get_with_body_param_does_not_decode_body() {
        let route = RouteMetadata::new("GET", "/users", "ListUsers")
            .with_parameter(Parameter::new("user", "User", ParameterSource::Body));
        assert!(!route.decodes_body());
    }

    #[test]
    fn post_with_body_param_decodes_body() {
        let route = RouteMetadata::new("POST", "/users", "CreateUser")
            .with_parameter(Parameter::new("user", "User", ParameterSource::Body));
        assert!(route.decodes_body());
    }
}
