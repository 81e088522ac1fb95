// Built-in validators

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

/// A single named check.
///
/// A validator is satisfied or not based purely on the value and its own
/// parameters; appending the failure to the validation context is the
/// context's job.
pub trait Validator<T: ?Sized> {
    fn is_satisfied(&self, value: &T) -> bool;

    /// Message used when the caller does not override it.
    fn default_message(&self) -> String;
}

/// Anything with a length, for the size validators.
pub trait HasSize {
    fn size(&self) -> usize;
}

impl HasSize for str {
    fn size(&self) -> usize {
        self.len()
    }
}

impl HasSize for String {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> HasSize for [T] {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T> HasSize for Vec<T> {
    fn size(&self) -> usize {
        self.len()
    }
}

/// Satisfied by a non-empty string, a non-empty sequence or a present
/// `Option`.
pub struct Required;

impl Validator<str> for Required {
    fn is_satisfied(&self, value: &str) -> bool {
        !value.is_empty()
    }

    fn default_message(&self) -> String {
        "Required".to_string()
    }
}

impl Validator<String> for Required {
    fn is_satisfied(&self, value: &String) -> bool {
        !value.is_empty()
    }

    fn default_message(&self) -> String {
        "Required".to_string()
    }
}

impl<T> Validator<Option<T>> for Required {
    fn is_satisfied(&self, value: &Option<T>) -> bool {
        value.is_some()
    }

    fn default_message(&self) -> String {
        "Required".to_string()
    }
}

impl<T> Validator<[T]> for Required {
    fn is_satisfied(&self, value: &[T]) -> bool {
        !value.is_empty()
    }

    fn default_message(&self) -> String {
        "Required".to_string()
    }
}

impl<T> Validator<Vec<T>> for Required {
    fn is_satisfied(&self, value: &Vec<T>) -> bool {
        !value.is_empty()
    }

    fn default_message(&self) -> String {
        "Required".to_string()
    }
}

/// Lower bound check
pub struct Min<T> {
    pub min: T,
}

impl<T: PartialOrd + fmt::Display> Validator<T> for Min<T> {
    fn is_satisfied(&self, value: &T) -> bool {
        *value >= self.min
    }

    fn default_message(&self) -> String {
        format!("Minimum is {}", self.min)
    }
}

/// Upper bound check
pub struct Max<T> {
    pub max: T,
}

impl<T: PartialOrd + fmt::Display> Validator<T> for Max<T> {
    fn is_satisfied(&self, value: &T) -> bool {
        *value <= self.max
    }

    fn default_message(&self) -> String {
        format!("Maximum is {}", self.max)
    }
}

/// Inclusive range check
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + fmt::Display> Validator<T> for Range<T> {
    fn is_satisfied(&self, value: &T) -> bool {
        *value >= self.min && *value <= self.max
    }

    fn default_message(&self) -> String {
        format!("Range is {} to {}", self.min, self.max)
    }
}

/// Minimum length of a string or sequence
pub struct MinSize {
    pub min: usize,
}

impl<T: HasSize + ?Sized> Validator<T> for MinSize {
    fn is_satisfied(&self, value: &T) -> bool {
        value.size() >= self.min
    }

    fn default_message(&self) -> String {
        format!("Minimum size is {}", self.min)
    }
}

/// Maximum length of a string or sequence
pub struct MaxSize {
    pub max: usize,
}

impl<T: HasSize + ?Sized> Validator<T> for MaxSize {
    fn is_satisfied(&self, value: &T) -> bool {
        value.size() <= self.max
    }

    fn default_message(&self) -> String {
        format!("Maximum size is {}", self.max)
    }
}

/// Exact length of a string or sequence
pub struct Length {
    pub n: usize,
}

impl<T: HasSize + ?Sized> Validator<T> for Length {
    fn is_satisfied(&self, value: &T) -> bool {
        value.size() == self.n
    }

    fn default_message(&self) -> String {
        format!("Required size is {}", self.n)
    }
}

/// Regular-expression match
pub struct Matches(pub Regex);

impl Matches {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(pattern)?))
    }
}

impl Validator<str> for Matches {
    fn is_satisfied(&self, value: &str) -> bool {
        self.0.is_match(value)
    }

    fn default_message(&self) -> String {
        format!("Must match {}", self.0)
    }
}

/// Email-shaped string check
pub struct Email;

impl Validator<str> for Email {
    fn is_satisfied(&self, value: &str) -> bool {
        EMAIL_REGEX.is_match(value)
    }

    fn default_message(&self) -> String {
        "Must be a valid email address".to_string()
    }
}
