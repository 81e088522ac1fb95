//! Process-wide application context.
//!
//! One [`App`] owns the configuration, the plugin registry, the
//! interceptor registry and any deferred startup callbacks. It is created
//! explicitly, started explicitly, and passed by reference into request
//! handling. There are no ambient globals, which keeps the pipeline
//! testable in isolation.

use crate::config::AppConfig;
use crate::context::RequestContext;
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse};
use crate::interceptor::{InterceptorRegistry, MethodInterceptor, When};
use crate::logging::info;
use crate::pipeline::{ActionFn, RequestPipeline};
use crate::plugin::{Plugin, PluginRegistry};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type StartupFn = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send>> + Send>;

/// The application: configuration, plugins, interceptors and startup hooks.
pub struct App {
    config: Arc<AppConfig>,
    plugins: PluginRegistry,
    interceptors: InterceptorRegistry,
    startup: Vec<StartupFn>,
    started: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            plugins: PluginRegistry::new(),
            interceptors: InterceptorRegistry::new(),
            startup: Vec::new(),
            started: false,
        }
    }

    /// Create an application configured from the environment.
    /// A missing secret stops the process here, not at request time.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(AppConfig::from_env()?))
    }

    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    /// Register a plugin. Registration order is hook invocation order.
    pub fn register_plugin<P: Plugin + 'static>(&mut self, plugin: P) {
        self.plugins.register(plugin);
    }

    pub fn register_plugin_arc(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.register_arc(plugin);
    }

    /// Attach a method interceptor to an action or controller family.
    pub fn intercept<I: MethodInterceptor + 'static>(
        &mut self,
        target: impl Into<String>,
        when: When,
        interceptor: I,
    ) {
        self.interceptors.intercept(target, when, interceptor);
    }

    /// Defer a callback to run once at startup, after every plugin's
    /// on-app-start hook.
    pub fn on_start<F, Fut>(&mut self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.startup.push(Box::new(move || Box::pin(f())));
    }

    /// Start the application: run plugin on-app-start hooks in
    /// registration order, then the deferred startup callbacks.
    /// Any failure aborts startup.
    pub async fn start(&mut self) -> Result<(), Error> {
        for plugin in self.plugins.iter() {
            plugin.on_app_start().await?;
            info!(plugin = plugin.name(), "Plugin started");
        }
        for callback in self.startup.drain(..) {
            callback().await?;
        }
        self.started = true;
        info!("Application started");
        Ok(())
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Explicit teardown counterpart to [`App::start`].
    pub fn shutdown(&mut self) {
        self.started = false;
        info!("Application stopped");
    }

    /// Handle one request with the given resolved action.
    pub async fn handle(
        &self,
        request: HttpRequest,
        action_name: &str,
        action: ActionFn,
    ) -> HttpResponse {
        let mut ctx = RequestContext::new(request, action_name, self.config.clone());
        self.handle_in(&mut ctx, action).await
    }

    /// Handle a request through an externally-built context, for callers
    /// that need to inspect the context afterwards.
    pub async fn handle_in(&self, ctx: &mut RequestContext, action: ActionFn) -> HttpResponse {
        let pipeline = RequestPipeline::new(&self.plugins, &self.interceptors);
        pipeline.run(ctx, action).await
    }
}
