use std::{
    collections::VecDeque,
    fmt::{self, Formatter},
    sync::Arc,
};

use parking_lot::Mutex;

use crate::value::{Arguments, Value};

/// An error a stub raises in place of returning.
pub type Fault = Arc<dyn std::error::Error + Send + Sync>;

/// What a stubbed call produces: a value, nothing, or a fault.
pub type Outcome = Result<Option<Box<dyn Value>>, Fault>;

type Callback = dyn Fn(&mut Arguments) -> Outcome + Send + Sync;

/// A single stubbed behavior.
#[derive(Clone)]
pub enum Answer {
    /// Returns a copy of the value on every call.
    Return(Box<dyn Value>),
    /// Returns nothing, the equivalent of a `void` or `null` return.
    Nothing,
    /// Raises the fault on every call.
    Raise(Fault),
    /// Calls the closure with the call's arguments. The closure may
    /// write into the arguments.
    Callback(Arc<Callback>),
}

impl Answer {
    pub fn returning(value: impl Value) -> Self {
        Answer::Return(Box::new(value))
    }

    pub fn raising(fault: impl std::error::Error + Send + Sync + 'static) -> Self {
        Answer::Raise(Arc::new(fault))
    }

    pub fn callback(f: impl Fn(&mut Arguments) -> Outcome + Send + Sync + 'static) -> Self {
        Answer::Callback(Arc::new(f))
    }

    /// Produces the outcome of this answer for a call with the given
    /// arguments.
    pub fn respond(&self, arguments: &mut Arguments) -> Outcome {
        match self {
            Answer::Return(value) => Ok(Some(value.clone())),
            Answer::Nothing => Ok(None),
            Answer::Raise(fault) => Err(Arc::clone(fault)),
            Answer::Callback(callback) => callback(arguments),
        }
    }
}

impl fmt::Debug for Answer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Return(value) => f.debug_tuple("Return").field(value).finish(),
            Answer::Nothing => f.write_str("Nothing"),
            Answer::Raise(fault) => f.debug_tuple("Raise").field(&fault.to_string()).finish(),
            Answer::Callback(_) => f.write_str("Callback"),
        }
    }
}

/// The queue of answers for one stub.
///
/// Answers are handed out in the order they were pushed. The last
/// answer is never removed, so it keeps being handed out once every
/// earlier answer was consumed.
///
/// Collections are shared: the [`StubMapper`](crate::StubMapper) keeps
/// an `Arc` to the collection and returns it on resolution, and the
/// code that set the stub up may keep pushing answers through its own
/// handle.
///
/// ```
/// use decoy::{Answer, AnswerCollection};
///
/// let answers = AnswerCollection::new(Answer::returning(1));
/// answers.push(Answer::returning(2));
///
/// let next = |answers: &AnswerCollection| {
///     answers
///         .next_answer()
///         .and_then(|answer| answer.respond(&mut []).ok().flatten())
///         .and_then(|value| value.downcast_ref::<i32>().copied())
/// };
///
/// assert_eq!(next(&answers), Some(1));
/// assert_eq!(next(&answers), Some(2));
/// assert_eq!(next(&answers), Some(2));
/// ```
#[derive(Debug, Default)]
pub struct AnswerCollection {
    answers: Mutex<VecDeque<Answer>>,
}

impl AnswerCollection {
    pub fn new(answer: Answer) -> Self {
        AnswerCollection {
            answers: Mutex::new(VecDeque::from(vec![answer])),
        }
    }

    /// Queues an answer after the ones already in the collection.
    pub fn push(&self, answer: Answer) {
        self.answers.lock().push_back(answer);
    }

    pub fn has_answer(&self) -> bool {
        !self.answers.lock().is_empty()
    }

    /// Returns the answer for the next call.
    ///
    /// The front answer is consumed unless it is the only one left.
    pub fn next_answer(&self) -> Option<Answer> {
        let mut answers = self.answers.lock();
        if answers.len() > 1 {
            answers.pop_front()
        } else {
            answers.front().cloned()
        }
    }

    /// Drops every queued answer.
    pub fn clear(&self) {
        self.answers.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.answers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
