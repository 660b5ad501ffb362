//! Matchers decide whether a registered stub applies to a call.
//!
//! A [`Matcher`] looks at the whole call: the method name and every
//! argument. Most stubs use a [`MethodMatcher`], which pairs a method
//! name with one [`ArgMatcher`] per argument position.

mod any;
mod eq;
mod from_fn;
mod into_arg_matchers;
mod method;
mod reference_setter;

use std::{fmt, sync::Arc};

pub use any::{any, Any};
pub use eq::{eq, Eq};
pub use from_fn::from_fn;
pub use into_arg_matchers::IntoArgMatchers;
pub use method::MethodMatcher;
pub use reference_setter::{set_reference, ReferenceSetter};

use crate::value::{Arguments, Value};

/// Matcher for a whole call.
///
/// The [`StubMapper`](crate::StubMapper) only evaluates
/// [`matches`](Matcher::matches) for calls whose method name equals
/// [`method`](Matcher::method), and calls
/// [`apply_mutations`](Matcher::apply_mutations) exactly once after a
/// successful match.
///
/// Implementations must not panic on well-formed input. An argument
/// list of the wrong length is a non-match.
pub trait Matcher: Send + Sync {
    /// The name of the method this matcher is bound to.
    fn method(&self) -> &str;

    /// Returns true if the call matches.
    ///
    /// Must not change any argument.
    fn matches(&self, method: &str, arguments: &Arguments) -> bool;

    /// Writes into the arguments of a call that matched.
    fn apply_mutations(&self, _arguments: &mut Arguments) {}

    /// Describes the calls this matcher accepts.
    fn expectation(&self) -> String {
        format!("{}(..)", self.method())
    }
}

impl<M: Matcher + ?Sized> Matcher for Arc<M> {
    fn method(&self) -> &str {
        (**self).method()
    }

    fn matches(&self, method: &str, arguments: &Arguments) -> bool {
        (**self).matches(method, arguments)
    }

    fn apply_mutations(&self, arguments: &mut Arguments) {
        (**self).apply_mutations(arguments)
    }

    fn expectation(&self) -> String {
        (**self).expectation()
    }
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn method(&self) -> &str {
        (**self).method()
    }

    fn matches(&self, method: &str, arguments: &Arguments) -> bool {
        (**self).matches(method, arguments)
    }

    fn apply_mutations(&self, arguments: &mut Arguments) {
        (**self).apply_mutations(arguments)
    }

    fn expectation(&self) -> String {
        (**self).expectation()
    }
}

/// Matcher for a single argument.
///
/// The [`fmt::Display`] implementation is used as the expectation in
/// error messages.
pub trait ArgMatcher: fmt::Display + Send + Sync {
    /// Returns true if the argument matches.
    fn matches(&self, argument: &dyn Value) -> bool;

    /// The value to write into this argument's slot once the call
    /// has matched, if any.
    fn replacement(&self) -> Option<&dyn Value> {
        None
    }
}
