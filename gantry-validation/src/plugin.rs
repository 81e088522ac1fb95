//! The validation plugin.
//!
//! Wires the validation context into the request lifecycle: before the
//! action runs, a fresh [`Validation`] is seeded from the error cookie of
//! the incoming request; after the action, the error map is published to
//! the render arguments under `"errors"` and the cookie is written back
//! (kept errors re-encoded, otherwise cleared). This cookie round-trip is
//! what lets validation errors survive a redirect-after-post.

use crate::cookie::{decode_errors, encode_errors, errors_cookie_name};
use crate::keys::DefaultValidationKeys;
use crate::validation::Validation;
use async_trait::async_trait;
use gantry_core::{Cookie, Error, Plugin, RequestContext};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Plugin seeding and flushing the per-request [`Validation`] context.
pub struct ValidationPlugin {
    default_keys: Arc<DefaultValidationKeys>,
}

impl ValidationPlugin {
    pub fn new() -> Self {
        Self::with_default_keys(Arc::new(DefaultValidationKeys::new()))
    }

    /// Use a call-site key registry supplied by a code-generation step.
    pub fn with_default_keys(default_keys: Arc<DefaultValidationKeys>) -> Self {
        Self { default_keys }
    }
}

impl Default for ValidationPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for ValidationPlugin {
    fn name(&self) -> &str {
        "validation"
    }

    async fn before_request(&self, ctx: &mut RequestContext) -> Result<(), Error> {
        let cookie_name = errors_cookie_name(&ctx.config.cookie_prefix);
        let restored = ctx
            .request
            .cookie(&cookie_name)
            .map(|value| decode_errors(&value))
            .unwrap_or_default();
        if !restored.is_empty() {
            debug!(count = restored.len(), "Restored validation errors from cookie");
        }

        let mut validation = Validation::with_default_keys(self.default_keys.clone());
        validation.errors = restored;
        ctx.extensions.insert(Mutex::new(validation));
        Ok(())
    }

    async fn after_request(&self, ctx: &mut RequestContext) -> Result<(), Error> {
        let Some(slot) = ctx.extensions.get_arc::<Mutex<Validation>>() else {
            return Ok(());
        };
        let validation = slot.lock().unwrap();

        ctx.render_args.insert(
            "errors".to_string(),
            serde_json::to_value(validation.error_map())?,
        );

        let cookie_name = errors_cookie_name(&ctx.config.cookie_prefix);
        let value = if validation.kept() {
            encode_errors(&validation.errors)
        } else {
            // An empty value clears any previously persisted errors.
            String::new()
        };
        ctx.response_cookies.push(Cookie::new(cookie_name, value));
        Ok(())
    }
}

/// Access to the per-request validation context from hooks and actions.
pub trait ValidationAccess {
    fn validation(&self) -> Option<Arc<Mutex<Validation>>>;
}

impl ValidationAccess for RequestContext {
    fn validation(&self) -> Option<Arc<Mutex<Validation>>> {
        self.extensions.get_arc::<Mutex<Validation>>()
    }
}
