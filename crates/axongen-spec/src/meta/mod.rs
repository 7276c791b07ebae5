//! Component B — metadata model (spec.md §4.B).
//!
//! Purely data; behavior is limited to the accessors and builders below.
//! The orthogonal traits spec.md §3 describes (Lifecycle, Priority,
//! ManualModule, ...) are composed as plain fields rather than Rust trait
//! objects — nothing here needs dynamic dispatch.

mod base;
mod controller;
mod core_service;
mod interface;
mod logger;
mod middleware;
mod package;
mod route;
mod traits;

pub use base::{Base, Dependency};
pub use controller::ControllerMetadata;
pub use core_service::CoreServiceMetadata;
pub use interface::{InterfaceMethod, InterfaceMetadata};
pub use logger::LoggerMetadata;
pub use middleware::MiddlewareMetadata;
pub use package::PackageMetadata;
pub use route::{Parameter, ParameterSource, ReturnTypeInfo, ReturnTypeKind, RouteMetadata};
pub use traits::{Lifecycle, ManualModule, ServiceMode, StartMode};
