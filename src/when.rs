use std::sync::Arc;

use crate::{
    answer::{Answer, AnswerCollection, Outcome},
    matcher::{ArgMatcher, IntoArgMatchers, MethodMatcher},
    stub_mapper::StubMapper,
    value::{Arguments, Value},
};

/// Starts stubbing `method` on `mapper`.
///
/// See [`When`].
pub fn when(mapper: &StubMapper, method: impl Into<String>) -> When<'_> {
    When::new(mapper, method)
}

/// Builds a stub for a method and registers it.
///
/// Created using [`when`]. By default the stub matches every call to
/// the method; narrow it down with [`with_args`](When::with_args).
/// Finish with one of the `then*` methods, which register the stub and
/// return a [`Stubbed`] handle to queue further answers.
///
/// # Usage
///
/// ```
/// use decoy::{args, matcher, when, Reference, Slot, StubCaller, StubMapper};
/// use std::sync::Arc;
///
/// let mapper = Arc::new(StubMapper::new());
///
/// // consecutive calls return 1, then 2 from then on
/// when(&mapper, "next").then_return(1).then_return(2);
///
/// // writes 42 into the first argument when it is "key"
/// when(&mapper, "lookup")
///     .with_args((matcher::set_reference(42).when(matcher::eq("key")),))
///     .then_return(true);
///
/// let caller = StubCaller::new(mapper);
/// let out = Reference::new("key");
/// let found = caller.call("lookup", &mut [Slot::reference(&out)]).unwrap();
/// assert_eq!(found.and_then(|f| f.downcast_ref::<bool>().copied()), Some(true));
/// assert_eq!(out.get::<i32>(), Some(42));
/// ```
pub struct When<'m> {
    mapper: &'m StubMapper,
    method: String,
    matchers: Option<Vec<Box<dyn ArgMatcher>>>,
    ignore_remaining: bool,
}

impl<'m> When<'m> {
    #[doc(hidden)]
    pub fn new(mapper: &'m StubMapper, method: impl Into<String>) -> Self {
        When {
            mapper,
            method: method.into(),
            matchers: None,
            ignore_remaining: false,
        }
    }

    /// Only match calls whose arguments match, position by position.
    ///
    /// Takes a tuple of [`ArgMatcher`]s, see [`IntoArgMatchers`].
    pub fn with_args(mut self, matchers: impl IntoArgMatchers) -> Self {
        self.matchers = Some(matchers.into_arg_matchers());
        self
    }

    /// Match every call to the method. This is the default.
    pub fn any_parameters(mut self) -> Self {
        self.matchers = None;
        self
    }

    /// Accept arguments past the ones given to
    /// [`with_args`](When::with_args).
    pub fn ignore_remaining(mut self) -> Self {
        self.ignore_remaining = true;
        self
    }

    /// Returns a clone of `value` on every matching call.
    pub fn then_return(self, value: impl Value) -> Stubbed {
        self.then_answer(Answer::returning(value))
    }

    /// Returns nothing on every matching call.
    pub fn then_nothing(self) -> Stubbed {
        self.then_answer(Answer::Nothing)
    }

    /// Raises `fault` on every matching call.
    pub fn then_raise(self, fault: impl std::error::Error + Send + Sync + 'static) -> Stubbed {
        self.then_answer(Answer::raising(fault))
    }

    /// Calls `stub` with the arguments of every matching call.
    pub fn then(
        self,
        stub: impl Fn(&mut Arguments) -> Outcome + Send + Sync + 'static,
    ) -> Stubbed {
        self.then_answer(Answer::callback(stub))
    }

    /// Registers the stub with `answer` as its first answer.
    pub fn then_answer(self, answer: Answer) -> Stubbed {
        let answers = Arc::new(AnswerCollection::new(answer));
        let mapper = self.mapper;
        mapper.register(Arc::clone(&answers), self.into_matcher());
        Stubbed { answers }
    }

    fn into_matcher(self) -> MethodMatcher {
        match self.matchers {
            None => MethodMatcher::any_parameters(self.method),
            Some(matchers) if self.ignore_remaining => {
                MethodMatcher::new(self.method, matchers).ignore_remaining()
            }
            Some(matchers) => MethodMatcher::new(self.method, matchers),
        }
    }
}

/// A registered stub.
///
/// Answers queued here are handed out after the ones before them,
/// and the last one keeps being handed out.
#[derive(Debug, Clone)]
pub struct Stubbed {
    answers: Arc<AnswerCollection>,
}

impl Stubbed {
    pub fn then_return(self, value: impl Value) -> Self {
        self.then_answer(Answer::returning(value))
    }

    pub fn then_nothing(self) -> Self {
        self.then_answer(Answer::Nothing)
    }

    pub fn then_raise(self, fault: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.then_answer(Answer::raising(fault))
    }

    pub fn then(self, stub: impl Fn(&mut Arguments) -> Outcome + Send + Sync + 'static) -> Self {
        self.then_answer(Answer::callback(stub))
    }

    pub fn then_answer(self, answer: Answer) -> Self {
        self.answers.push(answer);
        self
    }

    /// The answers of this stub, as returned by
    /// [`StubMapper::resolve`].
    pub fn answers(&self) -> &Arc<AnswerCollection> {
        &self.answers
    }
}
