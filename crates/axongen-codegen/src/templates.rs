//! Component E — template registry & utilities (spec.md §4.E).
//!
//! Every template here is a plain pure function returning Go source text:
//! no templating engine, just `format!` composition over small helpers.
//! The canonical template names from spec.md §4.E are kept as the function
//! names below so the mapping to code is direct.

use axongen_spec::meta::{Base, Dependency, InterfaceMetadata, Lifecycle, StartMode};

/// Deterministic zero/empty initializer for a declared Go type string
/// (spec.md §4.E). The sole rule for initializing `is_init` fields.
pub fn init_expression(type_name: &str) -> String {
    let t = type_name.trim();
    if t == "nil" {
        return "nil".to_string();
    }
    if t.starts_with("map[") {
        return format!("make({t})");
    }
    if t.starts_with("[]") {
        return format!("{t}{{}}");
    }
    if t.starts_with("chan ") || t.starts_with("chan<-") || t.starts_with("<-chan") {
        return format!("make({t})");
    }
    if let Some(stripped) = t.strip_prefix('*') {
        let _ = stripped;
        return "nil".to_string();
    }
    match t {
        "string" => "\"\"".to_string(),
        "bool" => "false".to_string(),
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32" | "uint64" | "byte"
        | "rune" | "uintptr" | "float32" | "float64" => "0".to_string(),
        _ => format!("{t}{{}}"),
    }
}

/// Lowercase first rune for parameter/variable names; other characters untouched.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

const CONFIG_LIKE_SUBSTRINGS: &[&str] = &["config", "configuration", "settings", "options"];
const LOGGER_LIKE_SUBSTRINGS: &[&str] = &["logger", "log", "zap", "logrus", "slog"];

pub fn is_config_like(type_name: &str) -> bool {
    let lower = type_name.to_ascii_lowercase();
    CONFIG_LIKE_SUBSTRINGS.iter().any(|s| lower.contains(s))
}

pub fn is_logger_like(type_name: &str) -> bool {
    let lower = type_name.to_ascii_lowercase();
    LOGGER_LIKE_SUBSTRINGS.iter().any(|s| lower.contains(s))
}

fn field_initializer(dep: &Dependency) -> String {
    if dep.is_init {
        format!("{}: {}", dep.field_name, init_expression(&dep.type_name))
    } else {
        format!("{}: {}", dep.field_name, dep.field_name)
    }
}

fn struct_literal_body(deps: &[Dependency], indent: &str) -> String {
    deps.iter()
        .map(|d| format!("{indent}\t{},", field_initializer(d)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn param_list(deps: &[Dependency]) -> String {
    deps.iter()
        .filter(|d| !d.is_init)
        .map(|d| format!("{} {}", d.field_name, d.type_name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `provider` — constructor taking injected dependencies, returning the
/// struct literal; `is_init` fields use init-expression.
pub fn provider(struct_name: &str, ctor_name: &str, deps: &[Dependency]) -> String {
    format!(
        "func {ctor}({params}) *{struct_name} {{\n\treturn &{struct_name}{{\n{body}\n\t}}\n}}\n",
        ctor = ctor_name,
        params = param_list(deps),
        body = struct_literal_body(deps, ""),
    )
}

/// `simple-provider` — zero-dependency constructor (the `is_init`-only case
/// of `provider`, kept distinct because spec.md §4.F rule 6 dispatches to it
/// by name).
pub fn simple_provider(struct_name: &str, ctor_name: &str, init_deps: &[Dependency]) -> String {
    provider(struct_name, ctor_name, init_deps)
}

/// `lifecycle-provider` — constructor that also registers Start/Stop hooks
/// with the DI container's lifecycle collaborator.
pub fn lifecycle_provider(struct_name: &str, ctor_name: &str, deps: &[Dependency], lifecycle: Lifecycle) -> String {
    let var = lower_first(struct_name);
    let mut hooks = Vec::new();
    if lifecycle.has_start {
        hooks.push(format!("\t\tOnStart: func(ctx context.Context) error {{ return {var}.Start(ctx) }},"));
    }
    if lifecycle.has_stop {
        hooks.push(format!("\t\tOnStop: func(ctx context.Context) error {{ return {var}.Stop(ctx) }},"));
    }
    format!(
        "func {ctor}(lc axon.Lifecycle{maybe_comma}{params}) *{struct_name} {{\n\
         \t{var} := &{struct_name}{{\n{body}\n\t}}\n\
         \tlc.Append(axon.Hook{{\n{hooks}\n\t}})\n\
         \treturn {var}\n}}\n",
        ctor = ctor_name,
        maybe_comma = if deps.iter().any(|d| !d.is_init) { ", " } else { "" },
        params = param_list(deps),
        body = struct_literal_body(deps, ""),
        hooks = hooks.join("\n"),
    )
}

/// `init-provider` — the plain constructor half of the `start_mode`-split
/// pair; identical shape to `provider`/`simple-provider`.
pub fn init_provider(struct_name: &str, ctor_name: &str, deps: &[Dependency]) -> String {
    provider(struct_name, ctor_name, deps)
}

/// `init-invoke` — the companion invoke function that attaches the
/// lifecycle hook separately. Background mode launches `Start` async, logs
/// the error, and returns success immediately; Same mode calls inline.
pub fn init_invoke(struct_name: &str, lifecycle: Lifecycle) -> String {
    let var = lower_first(struct_name);
    let on_start = match lifecycle.start_mode {
        StartMode::Background => format!(
            "func(ctx context.Context) error {{\n\
             \t\t\tgo func() {{\n\
             \t\t\t\tif err := {var}.Start(ctx); err != nil {{\n\
             \t\t\t\t\tlog.Printf(\"%s: start failed: %v\", \"{struct_name}\", err)\n\
             \t\t\t\t}}\n\
             \t\t\t}}()\n\
             \t\t\treturn nil\n\
             \t\t}}"
        ),
        StartMode::Same => format!("func(ctx context.Context) error {{ return {var}.Start(ctx) }}"),
    };
    let mut hooks = vec![format!("\t\tOnStart: {on_start},")];
    if lifecycle.has_stop {
        hooks.push(format!("\t\tOnStop: func(ctx context.Context) error {{ return {var}.Stop(ctx) }},"));
    }
    format!(
        "func init{struct_name}Lifecycle(lc axon.Lifecycle, {var} *{struct_name}) {{\n\
         \tlc.Append(axon.Hook{{\n{hooks}\n\t}})\n}}\n",
        hooks = hooks.join("\n"),
    )
}

/// `transient-provider` — factory returning a fresh instance each call.
pub fn transient_provider(struct_name: &str, ctor_name: &str, deps: &[Dependency]) -> String {
    format!(
        "func {ctor}Factory({params}) func() *{struct_name} {{\n\
         \treturn func() *{struct_name} {{\n\
         \t\treturn &{struct_name}{{\n{body}\n\t\t}}\n\t}}\n}}\n",
        ctor = ctor_name,
        params = param_list(deps),
        body = struct_literal_body(deps, "\t"),
    )
}

/// `logger-provider` — like `provider`/`lifecycle-provider` but also builds
/// a structured-log handler keyed on the discovered config dependency's
/// `LogLevel` field (spec.md §4.F rule 7).
pub fn logger_provider(struct_name: &str, ctor_name: &str, deps: &[Dependency], config_field: &str, handler_field: &str) -> String {
    format!(
        "func {ctor}({params}) *{struct_name} {{\n\
         \thandler := axon.NewLogHandler({config_field}.LogLevel)\n\
         \treturn &{struct_name}{{\n{body}\n\t\t{handler_field}: handler,\n\t}}\n}}\n",
        ctor = ctor_name,
        params = param_list(deps),
        body = struct_literal_body(deps, ""),
    )
}

/// `simple-logger-provider` — the fallback used when rule 7's structured
/// handler condition is not met: a logger falls back to whichever of
/// rule 6's provider variants its own lifecycle/dependency shape selects.
/// Kept as a named entry point per spec.md §4.E even though it delegates.
pub fn simple_logger_provider(struct_name: &str, ctor_name: &str, deps: &[Dependency], lifecycle: Lifecycle) -> String {
    if lifecycle.has_lifecycle() {
        lifecycle_provider(struct_name, ctor_name, deps, lifecycle)
    } else {
        provider(struct_name, ctor_name, deps)
    }
}

/// `interface` + `interface-provider` — derive an interface from a struct's
/// public method signatures, plus a provider casting concrete to interface.
pub fn interface_and_provider(iface: &InterfaceMetadata) -> String {
    let methods = iface
        .methods
        .iter()
        .map(|m| format!("\t{}", m.signature()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "type {name} interface {{\n{methods}\n}}\n\n\
         func New{name}(impl *{struct_name}) {name} {{\n\treturn impl\n}}\n",
        name = iface.name,
        struct_name = iface.struct_name,
    )
}

/// `middleware-provider` — a plain constructor for a middleware struct; a
/// middleware never carries a lifecycle (spec.md §3 trait composition).
pub fn middleware_provider(base: &Base) -> String {
    provider(&base.struct_name, &format!("New{}", base.name), &base.dependencies)
}

/// `middleware-registry` — `RegisterMiddlewares` invoke: records each
/// middleware by name into the framework's middleware registry. Middleware
/// instances are sorted by name ascending (spec.md §9 determinism).
pub fn middleware_registry(middleware_names: &[&str]) -> String {
    let mut sorted = middleware_names.to_vec();
    sorted.sort_unstable();
    let params = sorted
        .iter()
        .map(|name| format!("{} *{}", lower_first(name), name))
        .collect::<Vec<_>>()
        .join(", ");
    let calls = sorted
        .iter()
        .map(|name| format!("\tregistry.RegisterMiddlewareHandler(\"{name}\", {})", lower_first(name)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("func RegisterMiddlewares(registry axon.MiddlewareRegistry, {params}) {{\n{calls}\n}}\n")
}

/// `global-middleware-registration` — applies global middlewares in
/// ascending-priority order via the router's top-level middleware hook.
/// `ordered_names` is the caller-resolved priority (then stable-index) order.
pub fn global_middleware_registration(ordered_names: &[&str]) -> String {
    let params = ordered_names
        .iter()
        .map(|name| format!("{} *{}", lower_first(name), name))
        .collect::<Vec<_>>()
        .join(", ");
    let calls = ordered_names
        .iter()
        .map(|name| format!("\te.Use({}.Handle)", lower_first(name)))
        .collect::<Vec<_>>()
        .join("\n");
    format!("func RegisterGlobalMiddleware(e axon.Router, {params}) {{\n{calls}\n}}\n")
}
