use super::ArgMatcher;
use crate::value::Value;
use std::fmt::{self, Formatter};

/// Matches any argument.
pub struct Any;

impl ArgMatcher for Any {
    fn matches(&self, _: &dyn Value) -> bool {
        true
    }
}

impl fmt::Display for Any {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "_")
    }
}

/// Creates an [`Any`] matcher.
pub fn any() -> Any {
    Any
}
