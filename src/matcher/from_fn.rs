use super::ArgMatcher;
use crate::value::Value;
use std::{fmt, marker::PhantomData};

struct FromFn<Arg, F> {
    message: String,
    matcher: F,
    _marker: PhantomData<fn(&Arg)>,
}

impl<Arg, F> ArgMatcher for FromFn<Arg, F>
where
    Arg: Value,
    F: Fn(&Arg) -> bool + Send + Sync,
{
    fn matches(&self, argument: &dyn Value) -> bool {
        let matcher = &self.matcher;
        argument.downcast_ref::<Arg>().map_or(false, matcher)
    }
}

impl<Arg, F> fmt::Display for FromFn<Arg, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Returns an [`ArgMatcher`] that succeeds based on the provided
/// closure.
///
/// Arguments of any type other than `Arg` do not match.
///
/// Prefer the [`from_fn!`](crate::from_fn!) macro, which uses the
/// source of the closure as the message.
pub fn from_fn<Arg, F>(matcher: F, message: impl fmt::Display) -> impl ArgMatcher
where
    Arg: Value,
    F: Fn(&Arg) -> bool + Send + Sync,
{
    FromFn {
        matcher,
        message: message.to_string(),
        _marker: PhantomData,
    }
}

/// Returns an [`ArgMatcher`] that succeeds based on the provided
/// closure.
///
/// The returned `ArgMatcher` implements [`fmt::Display`] using the
/// string representation of the closure. The closure parameter must
/// be typed, as the argument type cannot be inferred from the call.
///
/// ```
/// use decoy::{from_fn, matcher::ArgMatcher};
///
/// let contains_hello = from_fn!(|message: &&str| message.contains("hello"));
/// assert!(contains_hello.matches(&"hello world"));
/// assert!(!contains_hello.matches(&"bye world"));
/// assert!(!contains_hello.matches(&5));
/// println!("{}", contains_hello); // '|message: &&str| message.contains("hello")'
/// ```
#[macro_export]
macro_rules! from_fn {
    ($matcher:expr) => {
        $crate::matcher::from_fn($matcher, stringify!($matcher))
    };
}

/// Returns an [`ArgMatcher`] that succeeds if the pattern matches.
///
/// The returned `ArgMatcher` implements [`fmt::Display`] using the
/// string representation of the pattern. The type being matched
/// against must be given: `pattern!(type => pattern)`.
///
/// ```
/// use decoy::{pattern, matcher::ArgMatcher};
///
/// let is_alphabet = pattern!(char => 'A'..='Z' | 'a'..='z');
/// assert!(is_alphabet.matches(&'f'));
/// assert!(!is_alphabet.matches(&' '));
///
/// let exists_more_than_two = pattern!(Option<i32> => Some(x) if *x > 2);
/// assert!(exists_more_than_two.matches(&Some(4)));
/// assert!(!exists_more_than_two.matches(&Some(1)));
///
/// println!("{}", exists_more_than_two); // 'Some(x) if *x > 2'
/// ```
#[macro_export]
macro_rules! pattern {
    ($ty:ty => $( $pattern:pat_param )|+ $( if $guard: expr )? $(,)?) => (
        $crate::matcher::from_fn(
            move |arg: &$ty| matches!(arg, $($pattern)|+ $(if $guard)?),
            stringify!($($pattern)|+ $(if $guard)?),
        )
    );
}
