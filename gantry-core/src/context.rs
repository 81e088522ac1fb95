// Per-request context handed to hooks, interceptors and the action

use crate::config::AppConfig;
use crate::extensions::Extensions;
use crate::http::{Cookie, HttpRequest};
use crate::params::Parameters;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything one request carries through the pipeline: the request itself,
/// its parsed parameters, the render-arguments mapping consumed by the
/// rendering layer, outgoing cookies and typed per-request extensions.
pub struct RequestContext {
    pub request: HttpRequest,
    pub params: Parameters,
    /// Resolved action name, e.g. `"Hotels.show"`
    pub action: String,
    /// Arguments handed to the rendering collaborator
    pub render_args: HashMap<String, Value>,
    /// Cookies to set on the outgoing response
    pub response_cookies: Vec<Cookie>,
    /// Typed per-request state owned by plugins
    pub extensions: Extensions,
    pub config: Arc<AppConfig>,
}

impl RequestContext {
    pub fn new(request: HttpRequest, action: impl Into<String>, config: Arc<AppConfig>) -> Self {
        let params = Parameters::parse(&request);
        Self {
            request,
            params,
            action: action.into(),
            render_args: HashMap::new(),
            response_cookies: Vec::new(),
            extensions: Extensions::new(),
            config,
        }
    }

    /// Insert a render argument.
    pub fn render_arg(&mut self, key: impl Into<String>, value: Value) {
        self.render_args.insert(key.into(), value);
    }

    /// Flash a value for the next request, and make it visible to the
    /// current render pass under the `"flash"` mapping.
    pub fn flash(&mut self, key: &str, value: &str) {
        let entry = self
            .render_args
            .entry("flash".to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Value::Object(map) = entry {
            map.insert(key.to_string(), Value::String(value.to_string()));
        }
    }

    /// Flash every current parameter value, typically right before a
    /// redirect so the form can be repopulated.
    pub fn flash_params(&mut self) {
        let pairs: Vec<(String, String)> = self
            .params
            .values()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (key, value) in pairs {
            self.flash(&key, &value);
        }
    }
}
