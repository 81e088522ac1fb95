//! Default validation keys.
//!
//! Application code usually writes bare validation calls without repeating
//! the field name as a string:
//!
//! ```ignore
//! validation.required(&name).message("Your name is required");
//! ```
//!
//! The key the error is filed under comes from this registry: a mapping
//! from call site (source file and line) to the name of the first argument
//! expression, generated ahead of time by a code-generation step and
//! read-only at runtime. Check methods are `#[track_caller]`, so the
//! recorded location is the application's call site, not the validation
//! engine's. The explicit [`key`](crate::ValidationResult::key) call is the
//! primary contract; a call site with no registry entry keeps an empty key.

use std::collections::HashMap;

/// Mapping from call site to default validation key.
///
/// Keyed by source file, then by line number, to the name of the first
/// argument of the validation call on that line.
#[derive(Debug, Clone, Default)]
pub struct DefaultValidationKeys {
    keys: HashMap<String, HashMap<u32, String>>,
}

impl DefaultValidationKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the argument name for one validation call site.
    pub fn register(&mut self, file: impl Into<String>, line: u32, name: impl Into<String>) {
        self.keys
            .entry(file.into())
            .or_default()
            .insert(line, name.into());
    }

    /// The argument name registered for a call site, if any.
    pub fn lookup(&self, file: &str, line: u32) -> Option<&str> {
        self.keys.get(file)?.get(&line).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut keys = DefaultValidationKeys::new();
        keys.register("app/controllers/hotels.rs", 42, "checkInDate");
        keys.register("app/controllers/hotels.rs", 43, "checkOutDate");

        assert_eq!(keys.lookup("app/controllers/hotels.rs", 42), Some("checkInDate"));
        assert_eq!(keys.lookup("app/controllers/hotels.rs", 43), Some("checkOutDate"));
        assert_eq!(keys.lookup("app/controllers/hotels.rs", 44), None);
        assert_eq!(keys.lookup("other.rs", 42), None);
        assert_eq!(keys.len(), 2);
    }
}
