use paste::paste;

use super::ArgMatcher;

/// Conversion into a positional list of argument matchers.
///
/// Implemented for tuples of [`ArgMatcher`] of up to ten elements and
/// for an already built `Vec<Box<dyn ArgMatcher>>`. Element `i` of the
/// tuple matches argument `i` of the call.
///
/// ```
/// use decoy::matcher::{self, IntoArgMatchers};
///
/// let matchers = (matcher::eq("bar"), matcher::any()).into_arg_matchers();
/// assert_eq!(matchers.len(), 2);
///
/// // note that single arg matchers are wrapped in a tuple
/// // don't forget the trailing comma to denote it is a tuple
/// let matchers = (matcher::eq(20),).into_arg_matchers();
/// assert_eq!(matchers.len(), 1);
/// ```
pub trait IntoArgMatchers {
    fn into_arg_matchers(self) -> Vec<Box<dyn ArgMatcher>>;
}

impl IntoArgMatchers for Vec<Box<dyn ArgMatcher>> {
    fn into_arg_matchers(self) -> Vec<Box<dyn ArgMatcher>> {
        self
    }
}

impl IntoArgMatchers for () {
    /// No arguments are expected.
    fn into_arg_matchers(self) -> Vec<Box<dyn ArgMatcher>> {
        vec![]
    }
}

impl<AM: ArgMatcher + 'static> IntoArgMatchers for (AM,) {
    fn into_arg_matchers(self) -> Vec<Box<dyn ArgMatcher>> {
        vec![Box::new(self.0)]
    }
}

// (a,b,c) => tuple!(b,c)
macro_rules! peel {
    ($idx:tt, $($other:tt),+) => (tuple! { $($other),+ })
}

// implement IntoArgMatchers for tuples of ArgMatchers
macro_rules! tuple {
    ($idx:tt) => ();
    ($($idx:tt),+) => (
        paste! {
            impl<$([<AM $idx>]: ArgMatcher + 'static),+> IntoArgMatchers for ($([<AM $idx>],)+) {
                fn into_arg_matchers(self) -> Vec<Box<dyn ArgMatcher>> {
                    let ($([<am $idx>],)+) = self;

                    vec![
                        $(Box::new([<am $idx>]) as Box<dyn ArgMatcher>),+
                    ]
                }
            }
        }
        peel! { $($idx),+ }
    )
}

tuple! { 9, 8, 7, 6, 5, 4, 3, 2, 1, 0 }
