//! Component G — route wrapper synthesizer (spec.md §4.G).
//!
//! For one route, emits the generated handler closure and the pieces the
//! per-package generator (component F) needs to register it: the echo-style
//! path, the sorted `parameter_instances`/`middleware_instances` literals,
//! and the wrapper function name.

use indexmap::IndexMap;
use regex::Regex;

use axongen_spec::error::GenError;
use axongen_spec::meta::{ControllerMetadata, Parameter, ParameterSource, ReturnTypeKind, RouteMetadata};
use axongen_spec::parser_registry::ParserRegistry;

use crate::templates::lower_first;

/// Raw Axon path syntax `{name:type}` -> router syntax `:name`; bare
/// wildcard `{*}` -> `*` (spec.md §4.F "Path conversion"). Idempotent: a
/// path with no `{...}` segments is returned unchanged.
pub fn convert_path(raw: &str) -> String {
    let typed_segment = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*):[A-Za-z_][A-Za-z0-9_]*\}").expect("valid regex");
    let converted = typed_segment.replace_all(raw, ":$1");
    converted.replace("{*}", "*")
}

/// Maps each raw typed-segment name to its declared type text, e.g.
/// `/users/{id:int}` -> `{"id": "int"}` (spec.md §8 round-trip property).
pub fn extract_parameter_types(raw: &str) -> IndexMap<String, String> {
    let typed_segment = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*):([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex");
    typed_segment
        .captures_iter(raw)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

pub fn wrapper_function_name(controller: &ControllerMetadata, route: &RouteMetadata) -> String {
    format!("new{}{}Handler", controller.base.struct_name, route.handler_name)
}

/// Go identifier used for a middleware instance parameter/variable.
fn middleware_var(name: &str) -> String {
    lower_first(name)
}

/// The method name portion of `handler_name`, stripping any `pkg.` qualifier.
fn handler_method(handler_name: &str) -> &str {
    handler_name.rsplit('.').next().unwrap_or(handler_name)
}

struct PathDecode {
    text: String,
    declares_err: bool,
}

fn decode_path_parameters(route: &RouteMetadata, parsers: &ParserRegistry) -> Result<PathDecode, GenError> {
    let mut lines = Vec::new();
    let mut declares_err = false;
    for param in route.path_parameters() {
        let slot = if param.is_wildcard() { "\"*\"".to_string() } else { format!("\"{}\"", param.exposed_name()) };

        let call = match &param.parser_func {
            Some(explicit) => explicit.clone(),
            None => {
                let entry = parsers
                    .get(&param.type_name)
                    .ok_or_else(|| parsers.not_found(&param.type_name, axongen_spec::common::SourceLocation::unknown()))?;
                if entry.is_framework_helper {
                    lines.push(format!("\t{} := {}(ctx)", param.exposed_name(), entry.call_expression()));
                    continue;
                }
                entry.call_expression()
            }
        };
        let assign = if declares_err { "=" } else { ":=" };
        declares_err = true;
        lines.push(format!(
            "\t{name}, err {assign} {call}(ctx, ctx.Param({slot}))\n\tif err != nil {{\n\t\treturn ctx.JSON(400, fmt.Sprintf(\"invalid parameter '{name}': %v\", err))\n\t}}",
            name = param.exposed_name(),
        ));
    }
    Ok(PathDecode { text: lines.join("\n"), declares_err })
}

fn decode_body(route: &RouteMetadata, declares_err: bool) -> Option<(String, bool)> {
    if !route.decodes_body() {
        return None;
    }
    let body_type = route.body_parameter().map(|p| p.type_name.as_str()).unwrap_or("interface{}");
    let assign = if declares_err { "=" } else { ":=" };
    let text = format!(
        "\tvar body {body_type}\n\terr {assign} ctx.Bind(&body)\n\tif err != nil {{\n\t\treturn ctx.JSON(400, fmt.Sprintf(\"invalid request body: %v\", err))\n\t}}",
    );
    Some((text, true))
}

/// Orders the handler call's argument identifiers per spec.md §4.G step 3:
/// context-sourced parameters (or the `PassContext` flag) always precede
/// parameters with an unset position; remaining parameters sort by position.
fn call_arguments(route: &RouteMetadata) -> Vec<String> {
    let force_context = route.has_flag("PassContext") && !route.parameters.iter().any(|p| p.source == ParameterSource::Context);

    let mut context_params: Vec<&Parameter> = route.parameters.iter().filter(|p| p.source == ParameterSource::Context).collect();
    context_params.sort_by_key(|p| p.position.unwrap_or(0));

    let mut positioned: Vec<&Parameter> = route
        .parameters
        .iter()
        .filter(|p| p.source != ParameterSource::Context && p.position.is_some())
        .collect();
    positioned.sort_by_key(|p| p.position.unwrap());

    let unpositioned: Vec<&Parameter> = route
        .parameters
        .iter()
        .filter(|p| p.source != ParameterSource::Context && p.position.is_none())
        .collect();

    let mut args = Vec::new();
    if force_context {
        args.push("ctx".to_string());
    }
    for _ in &context_params {
        args.push("ctx".to_string());
    }
    for p in positioned.into_iter().chain(unpositioned) {
        args.push(match p.source {
            ParameterSource::Context => "ctx".to_string(),
            ParameterSource::Body => "body".to_string(),
            ParameterSource::Path => p.exposed_name().to_string(),
        });
    }
    args
}

fn response_shape(route: &RouteMetadata, declares_err: bool, call_expr: &str) -> String {
    // `data, err := ...` and `response, err := ...` always introduce a new
    // variable (`data`/`response`) alongside `err`, so Go's short variable
    // declaration applies regardless of whether `err` was already declared
    // by path/body decoding. Only the single-variable `err := ...` form of
    // `ErrorOnly` needs to fall back to plain assignment when `err` already
    // exists (spec.md §4.G step 4, "the two sites share one variable").
    match route.return_type.kind {
        ReturnTypeKind::DataError => format!(
            "\tdata, err := {call_expr}\n\tif err != nil {{\n\t\treturn handleError(ctx, err)\n\t}}\n\treturn ctx.JSON(200, data)",
        ),
        ReturnTypeKind::ResponseError => format!(
            "\tresponse, err := {call_expr}\n\tif err != nil {{\n\t\treturn handleError(ctx, err)\n\t}}\n\tif response == nil {{\n\t\treturn ctx.JSON(500, \"handler returned nil response\")\n\t}}\n\treturn handleAxonResponse(ctx, response)",
        ),
        ReturnTypeKind::ErrorOnly => {
            let assign = if declares_err { "=" } else { ":=" };
            format!("\terr {assign} {call_expr}\n\tif err != nil {{\n\t\treturn err\n\t}}\n\treturn nil")
        }
    }
}

/// Wraps the base handler closure with the route's middlewares, first-listed
/// outermost (spec.md §4.G step 5, §9 "composition order is not set order").
fn apply_middlewares(base: &str, middlewares: &[String]) -> String {
    let mut current = base.to_string();
    for name in middlewares.iter().rev() {
        current = format!("{}.Handle({current})", middleware_var(name));
    }
    current
}

/// Emits the full wrapper function body and returns it for appending to the
/// per-package output.
pub fn emit_route_wrapper(
    controller: &ControllerMetadata,
    route: &RouteMetadata,
    parsers: &ParserRegistry,
) -> Result<String, GenError> {
    let fn_name = wrapper_function_name(controller, route);
    let controller_var = lower_first(&controller.base.struct_name);

    let mut params = vec![format!("{controller_var} *{}", controller.base.struct_name)];
    for mw in &route.middlewares {
        params.push(format!("{} *{mw}", middleware_var(mw)));
    }

    let path_decode = decode_path_parameters(route, parsers)?;
    let mut declares_err = path_decode.declares_err;
    let mut body_sections = Vec::new();
    if !path_decode.text.is_empty() {
        body_sections.push(path_decode.text);
    }

    if let Some((body_text, now_declares_err)) = decode_body(route, declares_err) {
        body_sections.push(body_text);
        declares_err = declares_err || now_declares_err;
    }

    let args = call_arguments(route).join(", ");
    let call_expr = format!("{controller_var}.{}({args})", handler_method(&route.handler_name));
    body_sections.push(response_shape(route, declares_err, &call_expr));

    let base_closure = format!(
        "func(ctx axon.Context) error {{\n{}\n}}",
        body_sections.join("\n").replace('\n', "\n\t"),
    );
    let final_closure = apply_middlewares(&base_closure, &route.middlewares);

    Ok(format!(
        "func {fn_name}({params}) axon.HandlerFunc {{\n\treturn {final_closure}\n}}\n",
        params = params.join(", "),
    ))
}

/// `parameter_instances[]` literal for the `RouteInfo` record: every
/// declared parameter, name + declared type text, sorted by name ascending
/// (spec.md §4.F step 8, §9 determinism).
pub fn parameter_instances_literal(route: &RouteMetadata) -> String {
    let mut sorted: Vec<&Parameter> = route.parameters.iter().collect();
    sorted.sort_by(|a, b| a.exposed_name().cmp(b.exposed_name()));
    let entries: Vec<String> = sorted
        .iter()
        .map(|p| format!("{{Name: \"{}\", Type: \"{}\"}}", p.exposed_name(), p.type_name))
        .collect();
    format!("[]axon.ParameterInstance{{{}}}", entries.join(", "))
}

/// `middleware_instances[]` literal: name + handler reference + instance
/// reference, sorted by name ascending (spec.md §4.F step 8, §9).
pub fn middleware_instances_literal(middlewares: &[String]) -> String {
    let mut sorted = middlewares.to_vec();
    sorted.sort_unstable();
    let entries: Vec<String> = sorted
        .iter()
        .map(|name| {
            let var = middleware_var(name);
            format!("{{Name: \"{name}\", Handler: {var}.Handle, Instance: {var}}}")
        })
        .collect();
    format!("[]axon.MiddlewareInstance{{{}}}", entries.join(", "))
}

/// `middlewares[]` literal of plain names, in declaration order (the names
/// list itself is not independently re-sorted; only the instance/parameter
/// literals are, per spec.md §9).
pub fn middleware_names_literal(middlewares: &[String]) -> String {
    let quoted: Vec<String> = middlewares.iter().map(|m| format!("\"{m}\"")).collect();
    format!("[]string{{{}}}", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use axongen_spec::meta::{ParameterSource, ReturnTypeInfo};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn convert_path_rewrites_typed_segments_and_wildcard() {
        assert_eq!(convert_path("/users/{id:int}"), "/users/:id");
        assert_eq!(convert_path("/assets/{*}"), "/assets/*");
        assert_eq!(convert_path("/health"), "/health");
    }

    #[test]
    fn convert_path_is_idempotent() {
        let once = convert_path("/users/{id:int}");
        assert_eq!(convert_path(&once), once);
    }

    #[test]
    fn extract_parameter_types_maps_name_to_type() {
        let types = extract_parameter_types("/orgs/{org:string}/users/{id:int}");
        assert_eq!(types.get("org").map(String::as_str), Some("string"));
        assert_eq!(types.get("id").map(String::as_str), Some("int"));
    }

    #[test]
    fn typed_path_param_decode_site_and_handler_call() {
        let controller = ControllerMetadata::new("UserController", "UserController");
        let route = RouteMetadata::new("GET", "/users/{id:int}", "GetUser")
            .with_parameter(Parameter::new("id", "int", ParameterSource::Path).at_position(0))
            .with_middlewares(["Auth", "Logging"])
            .returning(ReturnTypeInfo::data_error("User"));
        let parsers = ParserRegistry::with_builtins();
        let text = emit_route_wrapper(&controller, &route, &parsers).unwrap();
        assert!(text.contains("axon.ParseInt(ctx, ctx.Param(\"id\"))"));
        assert!(text.contains("userController.GetUser(id)"));
        assert!(text.contains("data, err := userController.GetUser(id)"));
        assert!(text.contains("auth.Handle(logging.Handle("));
    }

    #[test]
    fn missing_parser_reports_parameter_name_and_available_list() {
        let controller = ControllerMetadata::new("UserController", "UserController");
        let route = RouteMetadata::new("GET", "/users/{id:uuid}", "GetUser")
            .with_parameter(Parameter::new("id", "uuid", ParameterSource::Path));
        let parsers = ParserRegistry::with_builtins();
        let err = emit_route_wrapper(&controller, &route, &parsers).unwrap_err();
        assert!(err.context.get("available").unwrap().contains("int"));
        assert!(err.message.contains("uuid"));
    }

    #[test]
    fn pass_context_without_context_parameter_still_prepends_context() {
        let route = RouteMetadata::new("GET", "/ping", "Ping").with_flag("PassContext");
        let args = call_arguments(&route);
        assert_eq!(args.first().map(String::as_str), Some("ctx"));
    }

    #[test]
    fn response_error_route_null_guard_uses_literal_message() {
        let controller = ControllerMetadata::new("UserController", "UserController");
        let route = RouteMetadata::new("POST", "/users", "CreateUser")
            .with_parameter(Parameter::new("user", "User", ParameterSource::Body))
            .returning(ReturnTypeInfo::response_error());
        let parsers = ParserRegistry::with_builtins();
        let text = emit_route_wrapper(&controller, &route, &parsers).unwrap();
        assert!(text.contains("var body User"));
        assert!(text.contains("handler returned nil response"));
        assert!(text.contains("handleAxonResponse(ctx, response)"));
    }

    #[test]
    fn parameter_and_middleware_instance_literals_sort_by_name() {
        let route = RouteMetadata::new("GET", "/orgs/{org:string}/users/{id:int}", "GetUser")
            .with_parameter(Parameter::new("id", "int", ParameterSource::Path))
            .with_parameter(Parameter::new("org", "string", ParameterSource::Path))
            .with_middlewares(["Logging", "Auth"]);
        let params_literal = parameter_instances_literal(&route);
        assert!(params_literal.find("\"id\"").unwrap() < params_literal.find("\"org\"").unwrap());

        let mw_literal = middleware_instances_literal(&route.middlewares);
        assert!(mw_literal.find("\"Auth\"").unwrap() < mw_literal.find("\"Logging\"").unwrap());
    }
}
