//! Render-time field helper.
//!
//! [`Field`] is a read-only view over one form field during rendering: it
//! joins the field name, the current validation error, the flashed value
//! and an HTML-identifier-safe id. Constructed on demand by the template
//! layer:
//!
//! ```ignore
//! let field = Field::new("booking.check_in", &ctx.render_args);
//! // <p class="{field.error_class()}">
//! //   <input id="{field.id()}" name="{field.name}" value="{field.flash()}">
//! //   <span class="error">{field.error_message()}</span>
//! // </p>
//! ```

use crate::errors::ValidationError;
use serde_json::Value;
use std::collections::HashMap;

/// CSS class marker for a field with a validation error.
pub const ERROR_CLASS: &str = "hasError";

/// Read-only view of one form field while rendering.
pub struct Field<'a> {
    pub name: String,
    pub error: Option<ValidationError>,
    render_args: &'a HashMap<String, Value>,
}

impl<'a> Field<'a> {
    /// Build the view for a field name, picking its error (if any) out of
    /// the `"errors"` mapping published by the validation plugin.
    pub fn new(name: impl Into<String>, render_args: &'a HashMap<String, Value>) -> Self {
        let name = name.into();
        let error = render_args
            .get("errors")
            .and_then(|errors| errors.get(&name))
            .and_then(|value| serde_json::from_value(value.clone()).ok());
        Self {
            name,
            error,
            render_args,
        }
    }

    /// The field name as an HTML-identifier-safe token.
    pub fn id(&self) -> String {
        self.name.replace('.', "_")
    }

    /// The current value of the field, resolved by walking the dotted path
    /// through the render arguments. Missing segments resolve to an empty
    /// string so rendering never fails on an unset value.
    pub fn value(&self) -> Value {
        let mut segments = self.name.split('.');
        let first = segments.next().unwrap_or("");
        let Some(mut current) = self.render_args.get(first) else {
            return Value::String(String::new());
        };
        for segment in segments {
            match current.get(segment) {
                Some(next) => current = next,
                None => return Value::String(String::new()),
            }
        }
        current.clone()
    }

    /// The flashed value of the field, carried over from the previous
    /// request.
    pub fn flash(&self) -> String {
        self.render_args
            .get("flash")
            .and_then(|flash| flash.get(&self.name))
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    }

    /// The flashed value split on `,`; empty flash yields an empty list.
    pub fn flash_array(&self) -> Vec<String> {
        let value = self.flash();
        if value.is_empty() {
            return Vec::new();
        }
        value.split(',').map(str::to_string).collect()
    }

    /// [`ERROR_CLASS`] if this field has a validation error, else `""`.
    pub fn error_class(&self) -> &'static str {
        if self.error.is_some() { ERROR_CLASS } else { "" }
    }

    /// The error message, or an empty string when there is none.
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(|error| error.message.clone())
            .unwrap_or_default()
    }
}
