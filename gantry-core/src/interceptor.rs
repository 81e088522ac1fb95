//! Method interceptors.
//!
//! An interceptor is a method-scoped hook attached to one controller
//! action (`"Hotels.show"`) or a controller family (`"Hotels.*"`),
//! distinct from the global plugin hooks. BEFORE interceptors run ahead of
//! the action, AFTER interceptors run on success only, FINALLY
//! interceptors run whether or not the action failed.

use crate::context::RequestContext;
use crate::error::Error;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// When an interceptor runs relative to the intercepted method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Before,
    After,
    Finally,
}

/// A method-scoped hook
#[async_trait]
pub trait MethodInterceptor: Send + Sync {
    async fn call(&self, ctx: &mut RequestContext) -> Result<(), Error>;
}

/// Adapter for using a plain async function as an interceptor
pub struct InterceptorFn<F>(pub F);

#[async_trait]
impl<F> MethodInterceptor for InterceptorFn<F>
where
    F: for<'a> Fn(
            &'a mut RequestContext,
        ) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send + 'a>>
        + Send
        + Sync,
{
    async fn call(&self, ctx: &mut RequestContext) -> Result<(), Error> {
        (self.0)(ctx).await
    }
}

struct Registration {
    target: String,
    when: When,
    interceptor: Arc<dyn MethodInterceptor>,
}

impl Registration {
    fn matches(&self, action: &str) -> bool {
        if let Some(prefix) = self.target.strip_suffix(".*") {
            action
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('.'))
        } else {
            self.target == action
        }
    }
}

/// Ordered interceptor registrations. For a given action and stage,
/// interceptors run in registration order.
#[derive(Default)]
pub struct InterceptorRegistry {
    registrations: Vec<Registration>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an interceptor to an action name (`"Hotels.show"`) or a
    /// controller-wide pattern (`"Hotels.*"`).
    pub fn intercept<I: MethodInterceptor + 'static>(
        &mut self,
        target: impl Into<String>,
        when: When,
        interceptor: I,
    ) {
        self.registrations.push(Registration {
            target: target.into(),
            when,
            interceptor: Arc::new(interceptor),
        });
    }

    /// Interceptors matching an action at a given stage, in registration order
    pub fn for_action(&self, action: &str, when: When) -> Vec<Arc<dyn MethodInterceptor>> {
        self.registrations
            .iter()
            .filter(|r| r.when == when && r.matches(action))
            .map(|r| r.interceptor.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl MethodInterceptor for Noop {
        async fn call(&self, _ctx: &mut RequestContext) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn test_exact_target_matching() {
        let mut registry = InterceptorRegistry::new();
        registry.intercept("Hotels.show", When::Before, Noop);

        assert_eq!(registry.for_action("Hotels.show", When::Before).len(), 1);
        assert_eq!(registry.for_action("Hotels.index", When::Before).len(), 0);
        assert_eq!(registry.for_action("Hotels.show", When::After).len(), 0);
    }

    #[test]
    fn test_controller_wide_pattern() {
        let mut registry = InterceptorRegistry::new();
        registry.intercept("Hotels.*", When::Finally, Noop);

        assert_eq!(registry.for_action("Hotels.show", When::Finally).len(), 1);
        assert_eq!(registry.for_action("Hotels.book", When::Finally).len(), 1);
        assert_eq!(registry.for_action("Bookings.show", When::Finally).len(), 0);
        // The pattern must match a whole controller name
        assert_eq!(registry.for_action("HotelsAdmin.show", When::Finally).len(), 0);
    }

    #[test]
    fn test_for_action_preserves_registration_order() {
        let mut registry = InterceptorRegistry::new();
        registry.intercept("Hotels.*", When::Before, Noop);
        registry.intercept("Hotels.show", When::Before, Noop);
        registry.intercept("Hotels.show", When::After, Noop);

        assert_eq!(registry.for_action("Hotels.show", When::Before).len(), 2);
        assert_eq!(registry.for_action("Hotels.show", When::After).len(), 1);
    }
}
