use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{answer::AnswerCollection, matcher::Matcher, value::Arguments};

struct Entry {
    matcher: Box<dyn Matcher>,
    answers: Arc<AnswerCollection>,
}

/// Maps matchers to the answers of the stubs they select.
///
/// Calls are resolved against the registered stubs in reverse
/// registration order: a stub registered later takes precedence over
/// any earlier stub that matches the same call. A broad stub may
/// therefore be set up first and overridden by more specific ones
/// without being removed.
///
/// Stubs cannot be removed one at a time, only all at once with
/// [`clear`](StubMapper::clear).
///
/// ```
/// use std::sync::Arc;
/// use decoy::{args, matcher::{self, MethodMatcher}, Answer, AnswerCollection, StubMapper};
///
/// let mapper = StubMapper::new();
/// let general = Arc::new(AnswerCollection::new(Answer::returning(1)));
/// let specific = Arc::new(AnswerCollection::new(Answer::returning(2)));
///
/// mapper.register(general.clone(), MethodMatcher::any_parameters("foo"));
/// mapper.register(
///     specific.clone(),
///     MethodMatcher::new("foo", (matcher::eq("bar"), matcher::eq("test"))),
/// );
///
/// let found = mapper.resolve("foo", &mut args!["bar", "test"]);
/// assert!(Arc::ptr_eq(&found.unwrap(), &specific));
///
/// let found = mapper.resolve("foo", &mut args!["other"]);
/// assert!(Arc::ptr_eq(&found.unwrap(), &general));
///
/// assert!(mapper.resolve("bar", &mut args![]).is_none());
/// ```
#[derive(Default)]
pub struct StubMapper {
    entries: Mutex<Vec<Arc<Entry>>>,
}

impl StubMapper {
    pub fn new() -> Self {
        StubMapper::default()
    }

    /// Registers `answers` to be returned for calls accepted by
    /// `matcher`.
    ///
    /// Registering an equivalent matcher twice is allowed; the older
    /// stub becomes unreachable.
    pub fn register(&self, answers: Arc<AnswerCollection>, matcher: impl Matcher + 'static) {
        debug!(method = matcher.method(), expectation = %matcher.expectation(), "registering stub");

        let entry = Entry {
            matcher: Box::new(matcher),
            answers,
        };
        // &self: stubs may be registered from inside an answer or a
        // matcher running on behalf of this mapper
        self.entries.lock().push(Arc::new(entry));
    }

    /// Finds the answers for a call.
    ///
    /// Registered stubs are tried most recent first. Stubs bound to a
    /// method other than `method` are skipped without evaluating their
    /// matcher. The first matcher that accepts the call gets to apply
    /// its mutations to `arguments`, then its answers are returned.
    ///
    /// Returns `None` if no stub matched. A panicking matcher is not
    /// caught.
    pub fn resolve(&self, method: &str, arguments: &mut Arguments) -> Option<Arc<AnswerCollection>> {
        // clone so we can drop the lock before running user code; a
        // matcher may call back into this mapper
        let entries = self.entries.lock().clone();

        for (position, entry) in entries.iter().enumerate().rev() {
            if entry.matcher.method() != method {
                continue;
            }

            if !entry.matcher.matches(method, arguments) {
                trace!(method, position, expectation = %entry.matcher.expectation(), "stub did not match");
                continue;
            }

            debug!(method, position, "resolved stub");
            entry.matcher.apply_mutations(arguments);
            return Some(Arc::clone(&entry.answers));
        }

        debug!(method, stubs = entries.len(), "no stub matched");
        None
    }

    /// Removes every registered stub.
    ///
    /// Answer collections that are still referenced elsewhere are left
    /// untouched.
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.entries.lock());
        debug!(stubs = removed.len(), "cleared stubs");
    }

    /// Describes every stub bound to `method`, most recent first.
    ///
    /// Used for error reports; no matcher is evaluated.
    pub fn expectations(&self, method: &str) -> Vec<String> {
        let entries = self.entries.lock().clone();

        entries
            .iter()
            .rev()
            .filter(|entry| entry.matcher.method() == method)
            .map(|entry| entry.matcher.expectation())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for StubMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // do not evaluate user matchers
        f.debug_struct("StubMapper")
            .field("stubs_len", &self.len())
            .finish()
    }
}
