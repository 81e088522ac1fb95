//! Validation for the Gantry request lifecycle.
//!
//! A per-request [`Validation`] context accumulates errors from built-in
//! checks, survives a redirect through a signed error cookie, and feeds
//! the [`Field`] helper used while rendering forms.
//!
//! # Examples
//!
//! ```
//! use gantry_validation::Validation;
//!
//! let mut validation = Validation::new();
//! let name = "Jo";
//! let email = "not-an-email";
//!
//! validation.required(name).key("name").message("Your name is required");
//! validation.min_size(name, 3).key("name").message("Your name is not long enough");
//! validation.email(email).key("email");
//!
//! assert!(validation.has_errors());
//! let errors = validation.error_map();
//! assert_eq!(errors["name"].message, "Your name is not long enough");
//! ```
//!
//! In a running application the [`ValidationPlugin`] owns the context's
//! lifecycle: it seeds it from the error cookie before each request and
//! publishes the error map plus the outgoing cookie after.

mod cookie;
mod errors;
mod field;
mod keys;
mod plugin;
mod validation;
mod validators;

pub use cookie::*;
pub use errors::*;
pub use field::*;
pub use keys::*;
pub use plugin::*;
pub use validation::*;
pub use validators::*;
