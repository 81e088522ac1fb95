//! Plugin contract and registry.
//!
//! A plugin observes the lifecycle of the application and of every request.
//! All hooks default to no-ops, so implementers override only what they
//! need. Hooks run in registration order for every kind; after-request and
//! on-exception hooks are NOT reversed relative to registration.

use crate::context::RequestContext;
use crate::error::Error;
use async_trait::async_trait;
use std::sync::Arc;

/// Lifecycle observer with a fixed capability set.
///
/// `before_request` and `after_request` failures are fatal to the current
/// request and route into the exception edge. An `on_exception` failure is
/// logged and never masks the original error.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str {
        "plugin"
    }

    /// Called once at application startup, in registration order.
    /// A failure here stops the application from starting.
    async fn on_app_start(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Called before the action runs.
    async fn before_request(&self, _ctx: &mut RequestContext) -> Result<(), Error> {
        Ok(())
    }

    /// Called after the action completed successfully.
    async fn after_request(&self, _ctx: &mut RequestContext) -> Result<(), Error> {
        Ok(())
    }

    /// Called when a before-hook, the action, or an after-hook failed,
    /// with the causing error.
    async fn on_exception(&self, _ctx: &mut RequestContext, _error: &Error) -> Result<(), Error> {
        Ok(())
    }
}

/// Ordered set of registered plugins. Registration order is hook
/// invocation order for every hook kind.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) {
        self.plugins.push(Arc::new(plugin));
    }

    pub fn register_arc(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins.iter()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
