// Gantry - a plugin-extensible MVC request pipeline for Rust
//
// This library wraps each inbound HTTP request with cross-cutting concerns
// (parameter binding, validation-state restoration, transactional resource
// setup/teardown, error recovery) around a user-supplied controller action.

// Re-export core functionality
pub use gantry_core::*;

// Re-export optional crates
#[cfg(feature = "validation")]
pub use gantry_validation;

#[cfg(feature = "database")]
pub use gantry_seaorm;

/// Prelude module for commonly used types.
pub mod prelude {
    pub use gantry_core::{
        ActionFn, App, AppConfig, Cookie, Error, FromParams, HttpRequest, HttpResponse,
        MethodInterceptor, Parameters, Plugin, RequestContext, RequestPipeline, When,
    };

    #[cfg(feature = "validation")]
    pub use gantry_validation::{
        Field, Validation, ValidationAccess, ValidationError, ValidationPlugin,
    };

    #[cfg(feature = "database")]
    pub use gantry_seaorm::{DbConfig, TransactionAccess, TransactionPlugin};
}
