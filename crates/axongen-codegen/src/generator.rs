//! Component F — per-package generator (spec.md §4.F).

use axongen_spec::common::SourceLocation;
use axongen_spec::error::{GenError, GenErrorKind};
use axongen_spec::meta::{CoreServiceMetadata, LoggerMetadata, MiddlewareMetadata, PackageMetadata, StartMode};
use axongen_spec::parser_registry::ParserRegistry;

use crate::route_wrapper::{self, middleware_instances_literal, middleware_names_literal, parameter_instances_literal};
use crate::templates::{self, is_config_like, is_logger_like, lower_first};

/// The DI library's fixed import path (spec.md §6 "Generated target API
/// (fixed)"); the alias used throughout generated code is `axon`.
pub const AXON_IMPORT_PATH: &str = "github.com/axonkit/axon";
pub const CONTEXT_IMPORT_PATH: &str = "context";

enum CoreServiceVariant {
    Manual,
    UserConstructor,
    Transient,
    InitProvider,
    LifecycleProvider,
    Provider,
    SimpleProvider,
}

/// Dispatch per spec.md §4.F rule 6: "Singleton with `start_mode` set"
/// (init-provider + init-invoke) is distinguished from "Singleton with
/// lifecycle but no `start_mode`" (lifecycle-provider); the metadata model
/// only records the resolved `StartMode` value, not whether it was present
/// in the source annotation, so `Background` is treated as "set" (it is the
/// only value a user annotation can meaningfully choose away from the
/// default) and `Same` keeps the embedded-hook form.
fn core_service_variant(service: &CoreServiceMetadata) -> CoreServiceVariant {
    if service.manual.is_manual() {
        return CoreServiceVariant::Manual;
    }
    if service.has_user_constructor() {
        return CoreServiceVariant::UserConstructor;
    }
    if service.service_mode.is_transient() {
        return CoreServiceVariant::Transient;
    }
    let lifecycle = service.effective_lifecycle();
    if lifecycle.has_lifecycle() {
        return match lifecycle.start_mode {
            StartMode::Background => CoreServiceVariant::InitProvider,
            StartMode::Same => CoreServiceVariant::LifecycleProvider,
        };
    }
    if service.base.injected_dependencies().next().is_some() {
        CoreServiceVariant::Provider
    } else {
        CoreServiceVariant::SimpleProvider
    }
}

/// Priority-then-stable-input-order sort, shared by controller/route
/// ordering (already on `ControllerMetadata`/`PackageMetadata`) and the
/// global-middleware ordering this generator needs locally.
fn by_priority_then_index<'a, T>(items: &'a [T], priority: impl Fn(&T) -> i64) -> Vec<&'a T> {
    let mut indexed: Vec<(usize, &T)> = items.iter().enumerate().collect();
    indexed.sort_by_key(|(idx, item)| (priority(item), *idx));
    indexed.into_iter().map(|(_, item)| item).collect()
}

pub struct PackageGenerator<'a> {
    parsers: &'a ParserRegistry,
}

impl<'a> PackageGenerator<'a> {
    pub fn new(parsers: &'a ParserRegistry) -> Self {
        Self { parsers }
    }

    /// Emits the complete `<package_dir>/autogen_module.go` source text for
    /// one package, or a `Generation`/`ParserNotFound` error if any route
    /// wrapper could not be synthesized.
    pub fn generate(&self, package: &PackageMetadata) -> Result<String, GenError> {
        let mut out = String::new();
        self.emit_header(&mut out, package);

        if package.is_empty() {
            out.push_str(&format!("\nvar Module = axon.Module(\"{}\")\n", package.package_name));
            return Ok(out);
        }

        // Module-entry groups, concatenated in the fixed order spec.md §4.F
        // step 10 lists: logger hook, core services, loggers, controllers,
        // middlewares, interfaces last.
        let mut logger_hook_entries = Vec::new();
        let mut core_service_entries = Vec::new();
        let mut logger_entries = Vec::new();
        let mut controller_entries = Vec::new();
        let mut middleware_entries = Vec::new();
        let mut interface_entries = Vec::new();

        if let Some(first_logger) = package.loggers.first() {
            self.emit_logger_adapter(&mut out, first_logger);
            logger_hook_entries.push(format!(
                "axon.WithLogger(func() axon.Logger {{ return newLoggerAdapter({}) }})",
                lower_first(&first_logger.base.struct_name)
            ));
        }

        // Interfaces are textually emitted early (spec.md §4.F step 5) but
        // their module entries join the list last (step 10).
        for iface in &package.interfaces {
            out.push_str(&templates::interface_and_provider(iface));
            out.push('\n');
            interface_entries.push(format!("axon.Provide(New{})", iface.name));
        }

        for service in &package.core_services {
            core_service_entries.extend(self.emit_core_service(&mut out, service));
        }

        for logger in &package.loggers {
            logger_entries.extend(self.emit_logger(&mut out, logger));
        }

        if !package.controllers.is_empty() {
            self.emit_response_helpers(&mut out);
            for controller in package.controllers_in_emission_order() {
                controller_entries.push(format!("axon.Provide(New{})", controller.base.struct_name));
                out.push_str(&templates::provider(
                    &controller.base.struct_name,
                    &format!("New{}", controller.base.struct_name),
                    &controller.base.dependencies,
                ));
                out.push('\n');
                for route in controller.routes_in_emission_order() {
                    let wrapper = route_wrapper::emit_route_wrapper(controller, route, self.parsers)?;
                    out.push_str(&wrapper);
                    out.push('\n');
                }
            }
            out.push_str(&self.emit_register_routes(package));
            out.push('\n');
            controller_entries.push("axon.Invoke(RegisterRoutes)".to_string());
        }

        if !package.middlewares.is_empty() {
            for mw in &package.middlewares {
                out.push_str(&templates::middleware_provider(&mw.base));
                out.push('\n');
                middleware_entries.push(format!("axon.Provide(New{})", mw.base.name));
            }

            let all_names: Vec<&str> = package.middlewares.iter().map(|m| m.base.name.as_str()).collect();
            out.push_str(&templates::middleware_registry(&all_names));
            out.push('\n');
            middleware_entries.push("axon.Invoke(RegisterMiddlewares)".to_string());

            let globals: Vec<&MiddlewareMetadata> = package.middlewares.iter().filter(|m| m.global).collect();
            if !globals.is_empty() {
                let ordered = by_priority_then_index(&globals, |m| m.priority);
                let names: Vec<&str> = ordered.iter().map(|m| m.base.name.as_str()).collect();
                out.push_str(&templates::global_middleware_registration(&names));
                out.push('\n');
                middleware_entries.push("axon.Invoke(RegisterGlobalMiddleware)".to_string());
            }
        }

        let module_entries: Vec<String> = logger_hook_entries
            .into_iter()
            .chain(core_service_entries)
            .chain(logger_entries)
            .chain(controller_entries)
            .chain(middleware_entries)
            .chain(interface_entries)
            .collect();

        self.emit_module_variable(&mut out, package, &module_entries);
        Ok(out)
    }

    fn emit_header(&self, out: &mut String, package: &PackageMetadata) {
        out.push_str("// Code generated by axongen. DO NOT EDIT.\n\n");
        out.push_str(&format!("package {}\n\n", package.package_name));
        out.push_str(&format!("import (\n\t\"{CONTEXT_IMPORT_PATH}\"\n\n\t\"{AXON_IMPORT_PATH}\"\n)\n"));
    }

    /// Forwards DI-container lifecycle events to the first declared
    /// logger's `Info`/`Debug`/`Error` methods (spec.md §4.F step 4).
    fn emit_logger_adapter(&self, out: &mut String, logger: &LoggerMetadata) {
        let struct_name = &logger.base.struct_name;
        let var = lower_first(struct_name);
        out.push_str(&format!(
            "type loggerAdapter struct {{\n\t{var} *{struct_name}\n}}\n\n\
             func newLoggerAdapter({var} *{struct_name}) *loggerAdapter {{\n\treturn &loggerAdapter{{{var}: {var}}}\n}}\n\n\
             func (a *loggerAdapter) LogEvent(event axon.Event) {{\n\
             \tswitch event.Kind {{\n\
             \tcase \"StartExecuting\", \"StartExecuted\", \"StopExecuting\", \"StopExecuted\", \"Started\", \"LoggerInitialized\", \"Stopping\", \"Stopped\", \"RollingBack\", \"RolledBack\":\n\
             \t\ta.{var}.Info(event.String())\n\
             \tcase \"Invoked\":\n\
             \t\tif event.Err != nil {{\n\
             \t\t\ta.{var}.Error(event.String(), event.Err, event.Stack)\n\
             \t\t\treturn\n\
             \t\t}}\n\
             \t\ta.{var}.Debug(event.String())\n\
             \tdefault:\n\
             \t\ta.{var}.Debug(event.String())\n\
             \t}}\n}}\n\n",
        ));
    }

    fn emit_core_service(&self, out: &mut String, service: &CoreServiceMetadata) -> Vec<String> {
        let struct_name = &service.base.struct_name;
        let ctor = format!("New{}", service.base.name);
        let deps = &service.base.dependencies;

        match core_service_variant(service) {
            CoreServiceVariant::Manual => {
                vec![service.manual.module_name.clone()]
            }
            CoreServiceVariant::UserConstructor => {
                vec![format!("axon.Provide({})", service.constructor.clone().unwrap_or_default())]
            }
            CoreServiceVariant::Transient => {
                out.push_str(&templates::transient_provider(struct_name, &ctor, deps));
                out.push('\n');
                vec![format!("axon.Provide({ctor}Factory)")]
            }
            CoreServiceVariant::InitProvider => {
                out.push_str(&templates::init_provider(struct_name, &ctor, deps));
                out.push('\n');
                out.push_str(&templates::init_invoke(struct_name, service.effective_lifecycle()));
                out.push('\n');
                vec![format!("axon.Provide({ctor})"), format!("axon.Invoke(init{struct_name}Lifecycle)")]
            }
            CoreServiceVariant::LifecycleProvider => {
                out.push_str(&templates::lifecycle_provider(struct_name, &ctor, deps, service.effective_lifecycle()));
                out.push('\n');
                vec![format!("axon.Provide({ctor})")]
            }
            CoreServiceVariant::Provider | CoreServiceVariant::SimpleProvider => {
                out.push_str(&templates::provider(struct_name, &ctor, deps));
                out.push('\n');
                vec![format!("axon.Provide({ctor})")]
            }
        }
    }

    /// Rule 7: a logger-typed `is_init` field paired with a config-like
    /// injected dependency selects the structured-log handler variant;
    /// otherwise it falls back to the nearest rule-6 pattern.
    fn emit_logger(&self, out: &mut String, logger: &LoggerMetadata) -> Vec<String> {
        let struct_name = &logger.base.struct_name;
        let ctor = format!("New{}", logger.base.name);
        let deps = &logger.base.dependencies;

        if logger.manual.is_manual() {
            return vec![logger.manual.module_name.clone()];
        }
        if let Some(user_ctor) = &logger.constructor {
            return vec![format!("axon.Provide({user_ctor})")];
        }

        if logger.wants_structured_handler(is_logger_like, is_config_like) {
            let config_dep = logger
                .base
                .injected_dependencies()
                .find(|d| is_config_like(&d.type_name))
                .expect("wants_structured_handler guarantees a config dependency");
            let handler_field = logger
                .base
                .init_dependencies()
                .find(|d| is_logger_like(&d.type_name))
                .map(|d| d.field_name.clone())
                .expect("wants_structured_handler guarantees a logger-typed init field");
            out.push_str(&templates::logger_provider(struct_name, &ctor, deps, &config_dep.field_name, &handler_field));
            out.push('\n');
            return vec![format!("axon.Provide({ctor})")];
        }

        out.push_str(&templates::simple_logger_provider(struct_name, &ctor, deps, logger.lifecycle));
        out.push('\n');
        vec![format!("axon.Provide({ctor})")]
    }

    /// Shared response helpers, emitted at most once per file (spec.md §4.F
    /// step 8).
    fn emit_response_helpers(&self, out: &mut String) {
        out.push_str(
            "func handleError(ctx axon.Context, err error) error {\n\
             \tvar httpErr *axon.HttpError\n\
             \tif errors.As(err, &httpErr) {\n\
             \t\treturn ctx.JSON(httpErr.StatusCode, httpErr)\n\
             \t}\n\
             \treturn ctx.JSON(500, fmt.Sprintf(\"internal error: %v\", err))\n\
             }\n\n\
             func handleAxonResponse(ctx axon.Context, response *axon.Response) error {\n\
             \tfor name, value := range response.Headers {\n\
             \t\tctx.Response().Header().Set(name, value)\n\
             \t}\n\
             \tfor _, cookie := range response.Cookies {\n\
             \t\tctx.SetCookie(cookie)\n\
             \t}\n\
             \tif response.ContentType != \"\" {\n\
             \t\treturn ctx.Blob(response.StatusCode, response.ContentType, response.Body)\n\
             \t}\n\
             \treturn ctx.JSON(response.StatusCode, response.Body)\n\
             }\n\n",
        );
    }

    fn emit_register_routes(&self, package: &PackageMetadata) -> String {
        let controllers = package.controllers_in_emission_order();

        let mut controller_params: Vec<String> = Vec::new();
        let mut middleware_names: Vec<&str> = Vec::new();
        for controller in &controllers {
            let var = lower_first(&controller.base.struct_name);
            controller_params.push(format!("{var} *{}", controller.base.struct_name));
            for route in &controller.routes {
                for mw in &route.middlewares {
                    if !middleware_names.contains(&mw.as_str()) {
                        middleware_names.push(mw.as_str());
                    }
                }
            }
        }
        middleware_names.sort_unstable();
        let mut params = vec!["router axon.Router".to_string()];
        params.extend(controller_params);
        params.extend(middleware_names.iter().map(|name| format!("{} *{}", lower_first(name), name)));

        let mut body = String::new();
        for controller in &controllers {
            let var = lower_first(&controller.base.struct_name);
            let target = if controller.has_prefix() {
                let group_var = format!("{var}Group");
                body.push_str(&format!(
                    "\t{group_var} := router.Group(\"{}\")\n",
                    route_wrapper::convert_path(&controller.prefix)
                ));
                group_var
            } else {
                "router".to_string()
            };

            for route in controller.routes_in_emission_order() {
                let wrapper_args: Vec<String> = std::iter::once(var.clone())
                    .chain(route.middlewares.iter().map(|m| lower_first(m)))
                    .collect();
                let handler_var = format!("{}Handler", lower_first(&route.handler_name));
                body.push_str(&format!(
                    "\t{handler_var} := {}({})\n",
                    route_wrapper::wrapper_function_name(controller, route),
                    wrapper_args.join(", "),
                ));
                body.push_str(&format!(
                    "\t{target}.{method}(\"{echo_path}\", {handler_var})\n",
                    method = http_method_call(&route.method),
                    echo_path = route_wrapper::convert_path(&route.path),
                ));
                body.push_str(&format!(
                    "\taxon.RegisterRoute(axon.RouteInfo{{\n\
                     \t\tMethod: \"{method}\",\n\
                     \t\tPath: \"{path}\",\n\
                     \t\tEchoPath: \"{echo_path}\",\n\
                     \t\tHandlerName: \"{handler_name}\",\n\
                     \t\tControllerName: \"{controller_name}\",\n\
                     \t\tPackageName: \"{package_name}\",\n\
                     \t\tMiddlewares: {middlewares},\n\
                     \t\tMiddlewareInstances: {middleware_instances},\n\
                     \t\tParameterInstances: {parameter_instances},\n\
                     \t\tHandler: {handler_var},\n\
                     \t}})\n",
                    method = route.method,
                    path = route.path,
                    echo_path = route_wrapper::convert_path(&route.path),
                    handler_name = route.handler_name,
                    controller_name = controller.base.name,
                    package_name = package.package_name,
                    middlewares = middleware_names_literal(&route.middlewares),
                    middleware_instances = middleware_instances_literal(&route.middlewares),
                    parameter_instances = parameter_instances_literal(route),
                ));
            }
        }

        format!("func RegisterRoutes({}) {{\n{body}}}\n", params.join(", "))
    }

    fn emit_module_variable(&self, out: &mut String, package: &PackageMetadata, entries: &[String]) {
        out.push_str(&format!("var Module = axon.Module(\n\t\"{}\",\n", package.package_name));
        for entry in entries {
            out.push_str(&format!("\t{entry},\n"));
        }
        out.push_str(")\n");
    }
}

fn http_method_call(method: &str) -> String {
    match method.to_ascii_uppercase().as_str() {
        "GET" => "GET".to_string(),
        "POST" => "POST".to_string(),
        "PUT" => "PUT".to_string(),
        "DELETE" => "DELETE".to_string(),
        "PATCH" => "PATCH".to_string(),
        "HEAD" => "HEAD".to_string(),
        "OPTIONS" => "OPTIONS".to_string(),
        other => other.to_string(),
    }
}

/// Shared helper used by the generation entry point (`lib::generate_package`)
/// to resolve where a package's output should land (spec.md §6 "Outputs").
pub fn output_path(project_root: &std::path::Path, package: &PackageMetadata) -> std::path::PathBuf {
    project_root.join(&package.package_dir).join("autogen_module.go")
}

/// Convenience used when an entire project needs generation and a caller
/// wants a single `FileSystem` error surfaced with the offending path.
pub fn require_writable_parent(path: &std::path::Path) -> Result<(), GenError> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() || parent.is_dir() => Ok(()),
        _ => Err(GenError::new(GenErrorKind::FileSystem, format!("parent directory for '{}' does not exist", path.display()))
            .at(SourceLocation::unknown())),
    }
}

#[cfg(test)]
mod tests {
    use axongen_spec::meta::{
        Base, ControllerMetadata, Dependency, Lifecycle, Parameter, ParameterSource, ReturnTypeInfo, RouteMetadata, StartMode,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_package_emits_header_and_empty_module() {
        let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app");
        let parsers = ParserRegistry::with_builtins();
        let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();
        assert!(text.contains("package user"));
        assert!(text.contains("var Module = axon.Module(\"user\")"));
        assert!(!text.contains("func New"));
    }

    #[test]
    fn simple_service_emits_provider_and_module_entry() {
        let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app").with_core_service(CoreServiceMetadata {
            base: Base::new("UserService", "UserService").with_dependency(Dependency::new("UserRepository", "UserRepository")),
            ..CoreServiceMetadata::new("UserService", "UserService")
        });
        let parsers = ParserRegistry::with_builtins();
        let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();
        assert!(text.contains("func NewUserService(UserRepository UserRepository) *UserService {"));
        assert!(text.contains("return &UserService{"));
        assert!(text.contains("UserRepository: UserRepository,"));
        assert!(text.contains("axon.Provide(NewUserService)"));
    }

    #[test]
    fn background_lifecycle_service_emits_init_provider_and_invoke() {
        let pkg = PackageMetadata::new("crawl", "pkg/crawl", "example.com/app").with_core_service(
            CoreServiceMetadata::new("Crawler", "Crawler").with_lifecycle(Lifecycle::new().start().start_mode(StartMode::Background)),
        );
        let parsers = ParserRegistry::with_builtins();
        let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();
        assert!(text.contains("func NewCrawler() *Crawler {"));
        assert!(text.contains("func initCrawlerLifecycle(lc axon.Lifecycle, crawler *Crawler) {"));
        assert!(text.contains("go func() {"));
        assert!(text.contains("axon.Invoke(initCrawlerLifecycle)"));
    }

    #[test]
    fn transient_service_emits_factory_and_no_lifecycle() {
        let pkg = PackageMetadata::new("session", "pkg/session", "example.com/app").with_core_service(
            CoreServiceMetadata {
                base: Base::new("SessionService", "SessionService").with_dependency(Dependency::new("DatabaseService", "*DatabaseService")),
                ..CoreServiceMetadata::new("SessionService", "SessionService").transient()
            },
        );
        let parsers = ParserRegistry::with_builtins();
        let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();
        assert!(text.contains("func NewSessionServiceFactory(DatabaseService *DatabaseService) func() *SessionService {"));
        assert!(!text.contains("lc.Append"));
        assert!(text.contains("axon.Provide(NewSessionServiceFactory)"));
    }

    #[test]
    fn manual_service_has_no_new_symbol() {
        let pkg = PackageMetadata::new("cache", "pkg/cache", "example.com/app")
            .with_core_service(CoreServiceMetadata::new("Cache", "Cache").manual("cachepkg.Module"));
        let parsers = ParserRegistry::with_builtins();
        let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();
        assert!(!text.contains("func NewCache("));
        assert_eq!(text.matches("cachepkg.Module").count(), 1);
    }

    #[test]
    fn controller_with_prefix_registers_on_the_group_not_the_router() {
        let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app").with_controller(
            ControllerMetadata::new("UserController", "UserController").prefix("/users").with_route(
                RouteMetadata::new("GET", "/users/{id:int}", "GetUser")
                    .with_parameter(Parameter::new("id", "int", ParameterSource::Path))
                    .returning(ReturnTypeInfo::data_error("User")),
            ),
        );
        let parsers = ParserRegistry::with_builtins();
        let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();
        assert!(text.contains("userControllerGroup := router.Group(\"/users\")"));
        assert!(text.contains("userControllerGroup.GET(\""));
    }

    #[test]
    fn interface_module_entry_is_last_in_module_list() {
        use axongen_spec::meta::{InterfaceMetadata, InterfaceMethod};
        let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app")
            .with_core_service(CoreServiceMetadata::new("UserService", "UserService"))
            .with_interface(
                InterfaceMetadata::new("UserServiceInterface", "UserService")
                    .with_method(InterfaceMethod::new("GetUser", "id int", "(*User, error)")),
            );
        let parsers = ParserRegistry::with_builtins();
        let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();
        let module_block = &text[text.find("var Module").unwrap()..];
        let core_pos = module_block.find("axon.Provide(NewUserService),").unwrap();
        let iface_entry_pos = module_block.find("axon.Provide(NewUserServiceInterface)").unwrap();
        assert!(iface_entry_pos > core_pos);
    }
}
