//! Error code constants, `E_`-prefixed so findings stay machine-filterable
//! across rules.

pub mod cycle_detect;
pub mod ref_integrity;
pub mod required_fields;

pub const E_PARSER_NOT_FOUND: &str = "E_PARSER_NOT_FOUND";
pub const E_MIDDLEWARE_NOT_FOUND: &str = "E_MIDDLEWARE_NOT_FOUND";
pub const E_INTERFACE_STRUCT_NOT_FOUND: &str = "E_INTERFACE_STRUCT_NOT_FOUND";
pub const E_DEPENDENCY_CYCLE: &str = "E_DEPENDENCY_CYCLE";
pub const E_DUPLICATE_NAME: &str = "E_DUPLICATE_NAME";
pub const E_AMBIGUOUS_PROVIDER: &str = "E_AMBIGUOUS_PROVIDER";
pub const W_LIFECYCLE_ON_TRANSIENT: &str = "W_LIFECYCLE_ON_TRANSIENT";
pub const W_EMPTY_HANDLER_NAME: &str = "W_EMPTY_HANDLER_NAME";
