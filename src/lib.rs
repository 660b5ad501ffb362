//! Call matching and stub resolution for test doubles.
//!
//! A test double forwards every intercepted call, as a method name
//! and a list of argument [`Slot`]s, to a [`StubCaller`]. The caller
//! asks its [`StubMapper`] for the stub whose [`Matcher`] accepts the
//! call and produces that stub's next [`Answer`].
//!
//! Stubs registered later take precedence over earlier ones, so a
//! broad stub can be refined without removing it. Matchers may write
//! into by-reference arguments ([`Reference`]) once their call has
//! been resolved, which is how a stub fills in output parameters.
//!
//! ```
//! use std::sync::Arc;
//! use decoy::{args, matcher, when, StubCaller, StubMapper};
//!
//! trait Greeter {
//!     fn greet(&self, name: &str) -> String;
//! }
//!
//! struct GreeterDouble(StubCaller);
//!
//! impl Greeter for GreeterDouble {
//!     fn greet(&self, name: &str) -> String {
//!         let mut arguments = args![name.to_string()];
//!         self.0
//!             .call("greet", &mut arguments)
//!             .ok()
//!             .flatten()
//!             .and_then(|greeting| greeting.downcast_ref::<String>().cloned())
//!             .unwrap_or_default()
//!     }
//! }
//!
//! let mapper = Arc::new(StubMapper::new());
//! when(&mapper, "greet").then_return(String::from("hello"));
//! when(&mapper, "greet")
//!     .with_args((matcher::eq(String::from("bob")),))
//!     .then_return(String::from("hi bob"));
//!
//! let greeter = GreeterDouble(StubCaller::new(mapper));
//! assert_eq!(greeter.greet("alice"), "hello");
//! assert_eq!(greeter.greet("bob"), "hi bob");
//! ```
//!
//! Each test should build its own [`StubMapper`]. The types are
//! thread safe, but no ordering is promised between threads sharing
//! one.

mod answer;
mod caller;
mod error;
pub mod matcher;
mod stub_mapper;
mod value;
mod when;

pub use crate::{
    answer::{Answer, AnswerCollection, Fault, Outcome},
    caller::{StubCaller, Unstubbed},
    error::{Error, Result},
    matcher::Matcher,
    stub_mapper::StubMapper,
    value::{Arguments, Reference, Slot, Value},
    when::{when, Stubbed, When},
};
