//! The per-request validation context.
//!
//! [`Validation`] accumulates validation errors while an action runs:
//!
//! ```
//! use gantry_validation::Validation;
//!
//! let mut validation = Validation::new();
//! let name = "";
//! validation.required(name).key("name").message("Your name is required");
//! validation.min_size(name, 3).key("name");
//! assert!(validation.has_errors());
//! ```
//!
//! Every check returns a [`ValidationResult`] borrowing the error it just
//! appended, so the caller can override the key or the message in place.
//! When no key is set explicitly, the call site is looked up in a
//! [`DefaultValidationKeys`] registry via `#[track_caller]`.

use crate::errors::ValidationError;
use crate::keys::DefaultValidationKeys;
use crate::validators::{
    Email, HasSize, Length, Matches, Max, MaxSize, Min, MinSize, Range, Required, Validator,
};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Result of a single validation check.
///
/// On failure it holds a mutable borrow of the error just stored in the
/// owning [`Validation`], so `key` and `message` rewrite the stored error.
pub struct ValidationResult<'v> {
    ok: bool,
    error: Option<&'v mut ValidationError>,
}

impl<'v> ValidationResult<'v> {
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Set the key the error is filed under.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        if let Some(error) = self.error.as_deref_mut() {
            error.key = key.into();
        }
        self
    }

    /// Replace the default message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(error) = self.error.as_deref_mut() {
            error.message = message.into();
        }
        self
    }

    /// The stored error, if the check failed.
    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_deref()
    }
}

/// Per-request accumulator of validation errors.
pub struct Validation {
    pub errors: Vec<ValidationError>,
    keep: bool,
    default_keys: Arc<DefaultValidationKeys>,
}

impl Validation {
    pub fn new() -> Self {
        Self::with_default_keys(Arc::new(DefaultValidationKeys::new()))
    }

    /// A context with a call-site key registry, normally supplied by a
    /// code-generation step.
    pub fn with_default_keys(default_keys: Arc<DefaultValidationKeys>) -> Self {
        Self {
            errors: Vec::new(),
            keep: false,
            default_keys,
        }
    }

    /// Mark the errors for persistence across the next redirect.
    pub fn keep(&mut self) {
        self.keep = true;
    }

    /// Whether [`keep`](Validation::keep) was called this request.
    pub fn kept(&self) -> bool {
        self.keep
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The errors mapped by key, first-wins: when several errors share a
    /// key, the earliest one is kept, since the first validation is
    /// typically the more basic.
    pub fn error_map(&self) -> HashMap<&str, &ValidationError> {
        let mut map = HashMap::new();
        for error in &self.errors {
            map.entry(error.key.as_str()).or_insert(error);
        }
        map
    }

    /// Append a free-form error with no key.
    pub fn error(&mut self, message: impl Into<String>) -> ValidationResult<'_> {
        self.errors.push(ValidationError::new("", message));
        ValidationResult {
            ok: false,
            error: self.errors.last_mut(),
        }
    }

    /// Non-empty string or sequence, present `Option`.
    #[track_caller]
    pub fn required<T: ?Sized>(&mut self, value: &T) -> ValidationResult<'_>
    where
        Required: Validator<T>,
    {
        self.apply(&Required, value)
    }

    #[track_caller]
    pub fn min<T: PartialOrd + fmt::Display>(&mut self, value: T, min: T) -> ValidationResult<'_> {
        self.apply(&Min { min }, &value)
    }

    #[track_caller]
    pub fn max<T: PartialOrd + fmt::Display>(&mut self, value: T, max: T) -> ValidationResult<'_> {
        self.apply(&Max { max }, &value)
    }

    #[track_caller]
    pub fn range<T: PartialOrd + fmt::Display>(
        &mut self,
        value: T,
        min: T,
        max: T,
    ) -> ValidationResult<'_> {
        self.apply(&Range { min, max }, &value)
    }

    #[track_caller]
    pub fn min_size<T: HasSize + ?Sized>(&mut self, value: &T, min: usize) -> ValidationResult<'_> {
        self.apply(&MinSize { min }, value)
    }

    #[track_caller]
    pub fn max_size<T: HasSize + ?Sized>(&mut self, value: &T, max: usize) -> ValidationResult<'_> {
        self.apply(&MaxSize { max }, value)
    }

    #[track_caller]
    pub fn length<T: HasSize + ?Sized>(&mut self, value: &T, n: usize) -> ValidationResult<'_> {
        self.apply(&Length { n }, value)
    }

    #[track_caller]
    pub fn matches(&mut self, value: &str, regex: &Regex) -> ValidationResult<'_> {
        self.apply(&Matches(regex.clone()), value)
    }

    #[track_caller]
    pub fn email(&mut self, value: &str) -> ValidationResult<'_> {
        self.apply(&Email, value)
    }

    /// Apply validators in order: the result of the first failing check, or
    /// the last result if all succeed. Zero checks produce no result.
    #[track_caller]
    pub fn check<T: ?Sized>(
        &mut self,
        value: &T,
        checks: &[&dyn Validator<T>],
    ) -> Option<ValidationResult<'_>> {
        if checks.is_empty() {
            return None;
        }
        match checks.iter().position(|chk| !chk.is_satisfied(value)) {
            Some(i) => Some(self.apply(checks[i], value)),
            None => Some(ValidationResult {
                ok: true,
                error: None,
            }),
        }
    }

    /// Apply one validator. On failure the error is appended with the
    /// check's default message, keyed by the call-site registry entry if
    /// one exists.
    #[track_caller]
    fn apply<T: ?Sized>(&mut self, chk: &dyn Validator<T>, value: &T) -> ValidationResult<'_> {
        if chk.is_satisfied(value) {
            return ValidationResult {
                ok: true,
                error: None,
            };
        }

        let caller = Location::caller();
        let key = self
            .default_keys
            .lookup(caller.file(), caller.line())
            .unwrap_or_default();

        self.errors
            .push(ValidationError::new(key, chk.default_message()));
        ValidationResult {
            ok: false,
            error: self.errors.last_mut(),
        }
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{MinSize, Required};

    #[test]
    fn test_successful_check_stores_nothing() {
        let mut v = Validation::new();
        let result = v.required("present");
        assert!(result.is_ok());
        assert!(result.error().is_none());
        assert!(!v.has_errors());
    }

    #[test]
    fn test_failure_is_stored_with_default_message() {
        let mut v = Validation::new();
        let result = v.required("");
        assert!(!result.is_ok());
        assert_eq!(result.error().unwrap().message, "Required");
        assert!(v.has_errors());
        assert_eq!(v.errors.len(), 1);
    }

    #[test]
    fn test_key_and_message_rewrite_the_stored_error() {
        let mut v = Validation::new();
        v.required("").key("name").message("Your name is required");
        assert_eq!(v.errors[0].key, "name");
        assert_eq!(v.errors[0].message, "Your name is required");
    }

    #[test]
    fn test_error_map_is_first_wins() {
        let mut v = Validation::new();
        v.required("").key("name").message("first");
        v.min_size("", 3).key("name").message("second");
        v.min(2, 18).key("age");

        let map = v.error_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["name"].message, "first");
        assert_eq!(map["age"].message, "Minimum is 18");
    }

    #[test]
    fn test_numeric_checks() {
        let mut v = Validation::new();
        assert!(v.min(18, 18).is_ok());
        assert!(!v.max(19, 18).is_ok());
        assert!(v.range(5, 1, 10).is_ok());
        assert!(!v.range(11, 1, 10).is_ok());
    }

    #[test]
    fn test_check_returns_first_failing() {
        let mut v = Validation::new();
        let result = v
            .check("ab", &[&Required, &MinSize { min: 3 }, &MinSize { min: 5 }])
            .unwrap();
        assert!(!result.is_ok());
        assert_eq!(result.error().unwrap().message, "Minimum size is 3");
        // Only the first failure was recorded.
        assert_eq!(v.errors.len(), 1);
    }

    #[test]
    fn test_check_all_passing_returns_last_ok() {
        let mut v = Validation::new();
        let result = v.check("abcdef", &[&Required, &MinSize { min: 3 }]).unwrap();
        assert!(result.is_ok());
        assert!(!v.has_errors());
    }

    #[test]
    fn test_check_with_no_validators_is_no_result() {
        let mut v = Validation::new();
        assert!(v.check("x", &[] as &[&dyn Validator<str>]).is_none());
    }

    #[test]
    fn test_keep_and_clear() {
        let mut v = Validation::new();
        assert!(!v.kept());
        v.keep();
        assert!(v.kept());

        v.required("");
        v.clear();
        assert!(!v.has_errors());
    }

    #[test]
    fn test_default_key_from_call_site_registry() {
        let mut keys = DefaultValidationKeys::new();
        // Registers the line of the `v.required` call two lines down.
        keys.register(file!(), line!() + 2, "checkInDate");
        let mut v = Validation::with_default_keys(Arc::new(keys));
        let result = v.required("");
        assert_eq!(result.error().unwrap().key, "checkInDate");
    }

    #[test]
    fn test_unregistered_call_site_keeps_empty_key() {
        let mut v = Validation::new();
        let result = v.required("");
        assert_eq!(result.error().unwrap().key, "");
    }
}
