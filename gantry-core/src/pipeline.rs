//! Request pipeline.
//!
//! Drives one request through plugin before-hooks, the intercepted action,
//! and plugin after-hooks, with an explicit error edge into the
//! on-exception hooks:
//!
//! ```text
//! Created -> BeforeHooks -> Action -> AfterHooks -> Completed
//!                 \            \          \
//!                  +------------+----------+--> ExceptionHooks -> Completed
//! ```
//!
//! Failures are ordinary `Result` values routed by the pipeline, not
//! unwinding. Resource cleanup is ownership-based (`Parameters` deletes its
//! temp files on Drop), so it runs exactly once on every exit path.

use crate::context::RequestContext;
use crate::error::Error;
use crate::http::HttpResponse;
use crate::interceptor::{InterceptorRegistry, When};
use crate::logging::{trace, warn};
use crate::plugin::PluginRegistry;
use std::future::Future;
use std::pin::Pin;

/// Pipeline stage, per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    BeforeHooks,
    Action,
    AfterHooks,
    ExceptionHooks,
    Completed,
}

/// A controller action: consumes the request context, produces a response
pub type ActionFn = Box<
    dyn for<'a> FnOnce(
            &'a mut RequestContext,
        )
            -> Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send + 'a>>
        + Send,
>;

/// Drives one request through the hook and interceptor stages.
pub struct RequestPipeline<'a> {
    plugins: &'a PluginRegistry,
    interceptors: &'a InterceptorRegistry,
}

impl<'a> RequestPipeline<'a> {
    pub fn new(plugins: &'a PluginRegistry, interceptors: &'a InterceptorRegistry) -> Self {
        Self {
            plugins,
            interceptors,
        }
    }

    /// Run one request to completion.
    ///
    /// Always yields a response: an unrecovered failure takes the exception
    /// edge and renders as a generic error response after every
    /// on-exception hook has run.
    pub async fn run(&self, ctx: &mut RequestContext, action: ActionFn) -> HttpResponse {
        self.enter(ctx, Stage::Created);
        let outcome = self.execute(ctx, action).await;

        let mut response = match outcome {
            Ok(response) => response,
            Err(error) => {
                self.enter(ctx, Stage::ExceptionHooks);
                for plugin in self.plugins.iter() {
                    if let Err(secondary) = plugin.on_exception(ctx, &error).await {
                        // Never mask the original error.
                        warn!(
                            plugin = plugin.name(),
                            error = %secondary,
                            "Exception hook failed"
                        );
                    }
                }
                warn!(action = %ctx.action, error = %error, "Request failed");
                HttpResponse::from_error(&error)
            }
        };

        self.enter(ctx, Stage::Completed);
        response.cookies.append(&mut ctx.response_cookies);
        response
    }

    async fn execute(
        &self,
        ctx: &mut RequestContext,
        action: ActionFn,
    ) -> Result<HttpResponse, Error> {
        self.enter(ctx, Stage::BeforeHooks);
        for plugin in self.plugins.iter() {
            plugin.before_request(ctx).await?;
        }

        self.enter(ctx, Stage::Action);
        let response = self.run_action(ctx, action).await?;

        self.enter(ctx, Stage::AfterHooks);
        for plugin in self.plugins.iter() {
            plugin.after_request(ctx).await?;
        }

        Ok(response)
    }

    /// The action stage: BEFORE interceptors, the action itself, AFTER
    /// interceptors on success, FINALLY interceptors unconditionally.
    async fn run_action(
        &self,
        ctx: &mut RequestContext,
        action: ActionFn,
    ) -> Result<HttpResponse, Error> {
        let mut failed = None;
        for interceptor in self.interceptors.for_action(&ctx.action, When::Before) {
            if let Err(err) = interceptor.call(ctx).await {
                failed = Some(err);
                break;
            }
        }

        let mut result = match failed {
            Some(err) => Err(err),
            None => action(ctx).await,
        };

        if result.is_ok() {
            for interceptor in self.interceptors.for_action(&ctx.action, When::After) {
                if let Err(err) = interceptor.call(ctx).await {
                    result = Err(err);
                    break;
                }
            }
        }

        for interceptor in self.interceptors.for_action(&ctx.action, When::Finally) {
            if let Err(err) = interceptor.call(ctx).await {
                match &result {
                    Ok(_) => result = Err(err),
                    Err(original) => warn!(
                        error = %err,
                        original = %original,
                        "Finally interceptor failed after request error"
                    ),
                }
            }
        }

        result
    }

    fn enter(&self, ctx: &RequestContext, stage: Stage) {
        trace!(action = %ctx.action, stage = ?stage, "Pipeline stage");
    }
}
