use std::fmt::{self, Formatter};

use super::{ArgMatcher, IntoArgMatchers, Matcher};
use crate::value::Arguments;

/// Matcher for calls to a single method.
///
/// Pairs a method name with the expectations on the call's
/// arguments. By default every argument position has to match its
/// [`ArgMatcher`] and the call must have exactly as many arguments as
/// there are matchers.
///
/// # Examples
///
/// ```
/// use decoy::{args, matcher::{self, MethodMatcher}, Matcher};
///
/// let matcher = MethodMatcher::new("foo", (matcher::eq("bar"), matcher::any()));
/// assert!(matcher.matches("foo", &args!["bar", "test"]));
/// assert!(!matcher.matches("foo", &args!["baz", "test"]));
///
/// // wrong arity is not a match
/// assert!(!matcher.matches("foo", &args!["bar"]));
/// ```
pub struct MethodMatcher {
    method: String,
    parameters: Parameters,
}

enum Parameters {
    Any,
    Positional {
        matchers: Vec<Box<dyn ArgMatcher>>,
        ignore_remaining: bool,
    },
}

impl MethodMatcher {
    pub fn new(method: impl Into<String>, matchers: impl IntoArgMatchers) -> Self {
        MethodMatcher {
            method: method.into(),
            parameters: Parameters::Positional {
                matchers: matchers.into_arg_matchers(),
                ignore_remaining: false,
            },
        }
    }

    /// Matches every call to `method` regardless of its arguments.
    pub fn any_parameters(method: impl Into<String>) -> Self {
        MethodMatcher {
            method: method.into(),
            parameters: Parameters::Any,
        }
    }

    /// Accepts any arguments past the ones with a matcher.
    ///
    /// Has no effect on a matcher built with
    /// [`any_parameters`](MethodMatcher::any_parameters).
    pub fn ignore_remaining(mut self) -> Self {
        if let Parameters::Positional {
            ignore_remaining, ..
        } = &mut self.parameters
        {
            *ignore_remaining = true;
        }
        self
    }
}

impl Matcher for MethodMatcher {
    fn method(&self) -> &str {
        &self.method
    }

    fn matches(&self, method: &str, arguments: &Arguments) -> bool {
        if method != self.method {
            return false;
        }

        let (matchers, ignore_remaining) = match &self.parameters {
            Parameters::Any => return true,
            Parameters::Positional {
                matchers,
                ignore_remaining,
            } => (matchers, *ignore_remaining),
        };

        let arity_matches = if ignore_remaining {
            arguments.len() >= matchers.len()
        } else {
            arguments.len() == matchers.len()
        };

        arity_matches
            && matchers
                .iter()
                .zip(arguments)
                // copy out of reference cells; a matcher may read or pass
                // on the same reference
                .all(|(matcher, slot)| matcher.matches(&*slot.to_value()))
    }

    fn apply_mutations(&self, arguments: &mut Arguments) {
        let matchers = match &self.parameters {
            Parameters::Any => return,
            Parameters::Positional { matchers, .. } => matchers,
        };

        for (matcher, slot) in matchers.iter().zip(arguments.iter_mut()) {
            if let Some(replacement) = matcher.replacement() {
                slot.set_value(replacement.clone_value());
            }
        }
    }

    fn expectation(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MethodMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.method)?;

        match &self.parameters {
            Parameters::Any => f.write_str("<any parameters>")?,
            Parameters::Positional {
                matchers,
                ignore_remaining,
            } => {
                let mut matchers = matchers.iter();
                if let Some(first) = matchers.next() {
                    write!(f, "{}", first)?;
                }
                matchers.try_for_each(|matcher| write!(f, ", {}", matcher))?;

                if *ignore_remaining {
                    let separator = if self.has_positional() { ", " } else { "" };
                    write!(f, "{}..", separator)?;
                }
            }
        }

        f.write_str(")")
    }
}

impl MethodMatcher {
    fn has_positional(&self) -> bool {
        matches!(&self.parameters, Parameters::Positional { matchers, .. } if !matchers.is_empty())
    }
}
