use axongen_codegen::{aggregator, PackageGenerator};
use pretty_assertions::assert_eq;

use axongen_spec::meta::{
    Base, ControllerMetadata, CoreServiceMetadata, Dependency, InterfaceMetadata, InterfaceMethod, Lifecycle, Parameter,
    ParameterSource, PackageMetadata, ReturnTypeInfo, RouteMetadata, StartMode,
};
use axongen_spec::parser_registry::{ParserRegistry, RouteParserMetadata};

fn parsers() -> ParserRegistry {
    ParserRegistry::with_builtins()
}

/// Scenario 1: simple service (spec.md §8).
#[test]
fn simple_service_scenario() {
    let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app").with_core_service(CoreServiceMetadata {
        base: Base::new("UserService", "UserService").with_dependency(Dependency::new("UserRepository", "UserRepository")),
        ..CoreServiceMetadata::new("UserService", "UserService")
    });

    let parsers = parsers();
    let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();

    assert!(text.contains("func NewUserService(UserRepository UserRepository) *UserService {"));
    assert!(text.contains("return &UserService{"));
    assert!(text.contains("UserRepository: UserRepository,"));
    assert!(text.contains("axon.Provide(NewUserService)"));
}

/// Scenario 2: lifecycle with background init (spec.md §8).
#[test]
fn background_lifecycle_scenario() {
    let pkg = PackageMetadata::new("crawl", "pkg/crawl", "example.com/app").with_core_service(
        CoreServiceMetadata::new("Crawler", "Crawler").with_lifecycle(Lifecycle::new().start().start_mode(StartMode::Background)),
    );

    let parsers = parsers();
    let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();

    assert!(text.contains("func NewCrawler() *Crawler {"));
    assert!(text.contains("func initCrawlerLifecycle(lc axon.Lifecycle, crawler *Crawler) {"));
    assert!(text.contains("go func() {"));
    assert!(text.contains("if err := crawler.Start(ctx); err != nil {"));
    assert!(text.contains("axon.Provide(NewCrawler)"));
    assert!(text.contains("axon.Invoke(initCrawlerLifecycle)"));
}

/// Scenario 3: transient with dependency (spec.md §8).
#[test]
fn transient_with_dependency_scenario() {
    let pkg = PackageMetadata::new("session", "pkg/session", "example.com/app").with_core_service(CoreServiceMetadata {
        base: Base::new("SessionService", "SessionService").with_dependency(Dependency::new("DatabaseService", "*DatabaseService")),
        ..CoreServiceMetadata::new("SessionService", "SessionService").transient()
    });

    let parsers = parsers();
    let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();

    assert!(text.contains("func NewSessionServiceFactory(DatabaseService *DatabaseService) func() *SessionService {"));
    assert!(text.contains("return func() *SessionService {"));
    assert!(text.contains("DatabaseService: DatabaseService,"));
    assert!(text.contains("axon.Provide(NewSessionServiceFactory)"));
    assert!(!text.contains("lc.Append"), "Transient services never get a lifecycle hook");
}

/// Scenario 4: route with typed path param and two middlewares (spec.md §8).
#[test]
fn typed_path_param_and_middlewares_scenario() {
    let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app").with_controller(
        ControllerMetadata::new("UserController", "UserController").with_route(
            RouteMetadata::new("GET", "/users/{id:int}", "GetUser")
                .with_parameter(Parameter::new("id", "int", ParameterSource::Path).at_position(0))
                .with_middlewares(["Auth", "Logging"])
                .returning(ReturnTypeInfo::data_error("User")),
        ),
    );

    let parsers = parsers();
    let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();

    assert!(text.contains("axon.ParseInt(ctx, ctx.Param(\"id\"))"));
    assert!(text.contains("if err != nil {"));
    assert!(text.contains("data, err := userController.GetUser(id)"));
    assert!(text.contains("auth.Handle(logging.Handle("), "Auth must end up outermost");
    assert!(text.contains("EchoPath: \"/users/:id\""));
    assert!(text.contains("Type: \"int\""));
    assert!(text.contains("Name: \"id\""));
    assert!(text.contains("Middlewares: []string{\"Auth\", \"Logging\"}"));
}

/// Scenario 5: ResponseError body route (spec.md §8).
#[test]
fn response_error_body_route_scenario() {
    let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app").with_controller(
        ControllerMetadata::new("UserController", "UserController").with_route(
            RouteMetadata::new("POST", "/users", "CreateUser")
                .with_parameter(Parameter::new("user", "User", ParameterSource::Body))
                .returning(ReturnTypeInfo::response_error()),
        ),
    );

    let parsers = parsers();
    let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();

    assert!(text.contains("var body User"));
    assert!(text.contains("ctx.Bind(&body)"));
    assert!(text.contains("response, err := userController.CreateUser(body)"));
    assert!(text.contains("handler returned nil response"));
    assert!(text.contains("handleAxonResponse(ctx, response)"));
}

/// Scenario 6: interface derivation (spec.md §8).
#[test]
fn interface_derivation_scenario() {
    let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app").with_interface(
        InterfaceMetadata::new("UserServiceInterface", "UserService")
            .with_method(InterfaceMethod::new("GetUser", "id int", "(*User, error)")),
    );

    let parsers = parsers();
    let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();

    assert!(text.contains("type UserServiceInterface interface {"));
    assert!(text.contains("GetUser(id int) (*User, error)"));
    assert!(text.contains("func NewUserServiceInterface(impl *UserService) UserServiceInterface {"));
    assert!(text.contains("return impl"));
    assert!(text.contains("axon.Provide(NewUserServiceInterface)"));
}

/// Boundary: empty package emits header, package decl, and an empty module
/// variable only.
#[test]
fn empty_package_boundary() {
    let pkg = PackageMetadata::new("empty", "pkg/empty", "example.com/app");
    let parsers = parsers();
    let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();

    assert!(text.contains("package empty"));
    assert!(text.contains("var Module = axon.Module(\"empty\")"));
    assert!(!text.contains("func New"));
    assert!(!text.contains("Invoke"));
}

/// Boundary: root aggregator with an empty sub-module list is an error.
#[test]
fn root_aggregator_empty_list_errors() {
    assert!(aggregator::generate_root_module("app", &[]).is_err());
}

/// Boundary: PassContext without a Context-sourced parameter still prepends
/// the context argument to the handler call.
#[test]
fn pass_context_flag_without_context_parameter() {
    let pkg = PackageMetadata::new("ping", "pkg/ping", "example.com/app").with_controller(
        ControllerMetadata::new("PingController", "PingController").with_route(
            RouteMetadata::new("GET", "/ping", "Ping")
                .with_flag("PassContext")
                .returning(ReturnTypeInfo::error_only()),
        ),
    );
    let parsers = parsers();
    let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();
    assert!(text.contains("pingController.Ping(ctx)"));
}

/// Boundary: a typed path parameter whose parser was never registered
/// raises `ParserNotFound` naming the parameter's type and the available set.
#[test]
fn missing_parser_raises_parser_not_found() {
    let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app").with_controller(
        ControllerMetadata::new("UserController", "UserController").with_route(
            RouteMetadata::new("GET", "/users/{id:uuid}", "GetUser")
                .with_parameter(Parameter::new("id", "uuid", ParameterSource::Path))
                .returning(ReturnTypeInfo::data_error("User")),
        ),
    );
    let parsers = parsers();
    let err = PackageGenerator::new(&parsers).generate(&pkg).unwrap_err();
    assert_eq!(err.kind, axongen_spec::error::GenErrorKind::ParserNotFound);
    assert!(err.message.contains("uuid"));
    assert!(err.context.get("available").unwrap().contains("int"));
}

/// A user-declared, cross-package parser resolves to the `pkgBase.Func` call
/// form once registered.
#[test]
fn custom_cross_package_parser_resolves() {
    let mut parsers = parsers();
    parsers
        .register(
            RouteParserMetadata::new("UUID", "ParseUUID")
                .in_package("example.com/app/pkg/util")
                .returning(["UUID", "error"]),
        )
        .unwrap();

    let pkg = PackageMetadata::new("user", "pkg/user", "example.com/app").with_controller(
        ControllerMetadata::new("UserController", "UserController").with_route(
            RouteMetadata::new("GET", "/users/{id:UUID}", "GetUser")
                .with_parameter(Parameter::new("id", "UUID", ParameterSource::Path))
                .returning(ReturnTypeInfo::data_error("User")),
        ),
    );
    let text = PackageGenerator::new(&parsers).generate(&pkg).unwrap();
    assert!(text.contains("util.ParseUUID(ctx, ctx.Param(\"id\"))"));
}

/// Root aggregator composes every sub-module's module variable, sorted for
/// determinism.
#[test]
fn root_aggregator_composes_sub_modules() {
    let subs = vec![
        aggregator::SubModule::new("user", "example.com/app/pkg/user", "Module"),
        aggregator::SubModule::new("billing", "example.com/app/pkg/billing", "Module"),
    ];
    let text = aggregator::generate_root_module("app", &subs).unwrap();
    assert!(text.contains("package app"));
    assert!(text.contains("billing.Module,"));
    assert!(text.contains("user.Module,"));
}
