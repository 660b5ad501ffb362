use std::fmt::{self, Formatter};

use super::ArgMatcher;
use crate::value::Value;

/// Equality matcher
///
/// Matches when the argument has the same concrete type as the
/// expected value and compares equal to it. An `i32` never matches an
/// expected `i64`, and a `String` never matches an expected `&str`.
pub struct Eq(Box<dyn Value>);

impl ArgMatcher for Eq {
    fn matches(&self, actual: &dyn Value) -> bool {
        self.0.eq_value(actual)
    }
}

impl fmt::Display for Eq {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Creates an [`Eq`] matcher.
///
/// ```
/// use decoy::matcher::{self, ArgMatcher};
///
/// let bar = matcher::eq("bar");
/// assert!(bar.matches(&"bar"));
/// assert!(!bar.matches(&"baz"));
/// assert!(!bar.matches(&String::from("bar")));
/// ```
pub fn eq(expected: impl Value) -> Eq {
    Eq(Box::new(expected))
}
