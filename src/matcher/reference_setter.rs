use std::fmt::{self, Formatter};

use super::ArgMatcher;
use crate::value::Value;

/// Argument matcher that overwrites its argument once the call has
/// matched.
///
/// This is how a stub writes into an output (by-reference)
/// parameter. On its own it matches any argument; chain
/// [`when`](ReferenceSetter::when) to only match, and therefore only
/// write, when the current value passes another matcher.
///
/// The write happens in [`Matcher::apply_mutations`], never while
/// matching, so a stub that loses to a more recent one leaves the
/// argument untouched.
///
/// [`Matcher::apply_mutations`]: crate::Matcher::apply_mutations
pub struct ReferenceSetter {
    value: Box<dyn Value>,
    condition: Option<Box<dyn ArgMatcher>>,
}

impl ReferenceSetter {
    /// Only match when the current value of the argument also
    /// matches `condition`.
    pub fn when(mut self, condition: impl ArgMatcher + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }
}

impl ArgMatcher for ReferenceSetter {
    fn matches(&self, argument: &dyn Value) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition.matches(argument))
    }

    fn replacement(&self) -> Option<&dyn Value> {
        Some(&*self.value)
    }
}

impl fmt::Display for ReferenceSetter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.condition {
            Some(condition) => write!(f, "{} <- {:?}", condition, self.value),
            None => write!(f, "_ <- {:?}", self.value),
        }
    }
}

/// Creates a [`ReferenceSetter`] that writes `value`.
pub fn set_reference(value: impl Value) -> ReferenceSetter {
    ReferenceSetter {
        value: Box::new(value),
        condition: None,
    }
}
