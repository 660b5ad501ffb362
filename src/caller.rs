use std::sync::Arc;

use tracing::debug;

use crate::{
    error::{Error, Result},
    stub_mapper::StubMapper,
    value::{Arguments, Value},
};

/// What a [`StubCaller`] does with a call no stub matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Unstubbed {
    /// Return nothing, the equivalent of a `null` return.
    #[default]
    ReturnNothing,
    /// Fail with [`Error::NeverStubbed`] or [`Error::NotMatched`].
    Fail,
}

/// Runs intercepted calls against a [`StubMapper`].
///
/// This is the entry point for a test double: forward every method
/// call to [`call`](StubCaller::call) and turn its result into the
/// method's return value.
///
/// ```
/// use std::sync::Arc;
/// use decoy::{args, when, StubCaller, StubMapper, Unstubbed};
///
/// let mapper = Arc::new(StubMapper::new());
/// when(&mapper, "len").then_return(3_usize);
///
/// let caller = StubCaller::new(mapper.clone());
/// let len = caller.call("len", &mut args![]).unwrap();
/// assert_eq!(len.and_then(|len| len.downcast_ref::<usize>().copied()), Some(3));
///
/// // unmatched calls return nothing unless the caller is strict
/// assert!(caller.call("is_empty", &mut args![]).unwrap().is_none());
///
/// let strict = StubCaller::new(mapper).unstubbed(Unstubbed::Fail);
/// assert!(strict.call("is_empty", &mut args![]).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StubCaller {
    mapper: Arc<StubMapper>,
    unstubbed: Unstubbed,
}

impl StubCaller {
    pub fn new(mapper: Arc<StubMapper>) -> Self {
        StubCaller {
            mapper,
            unstubbed: Unstubbed::default(),
        }
    }

    /// Sets what happens to calls no stub matched.
    pub fn unstubbed(mut self, unstubbed: Unstubbed) -> Self {
        self.unstubbed = unstubbed;
        self
    }

    /// Resolves the call and produces the next answer of the matching
    /// stub.
    ///
    /// A stub whose answers were all cleared returns nothing.
    pub fn call(&self, method: &str, arguments: &mut Arguments) -> Result<Option<Box<dyn Value>>> {
        let answers = match self.mapper.resolve(method, arguments) {
            Some(answers) => answers,
            None => return self.call_unstubbed(method, arguments),
        };

        match answers.next_answer() {
            Some(answer) => answer.respond(arguments).map_err(|fault| {
                debug!(method, %fault, "stub raised");
                Error::Raised(fault)
            }),
            None => Ok(None),
        }
    }

    fn call_unstubbed(&self, method: &str, arguments: &Arguments) -> Result<Option<Box<dyn Value>>> {
        if self.unstubbed == Unstubbed::ReturnNothing {
            return Ok(None);
        }

        let expectations = self.mapper.expectations(method);
        if expectations.is_empty() {
            return Err(Error::NeverStubbed {
                method: method.to_string(),
            });
        }

        Err(Error::NotMatched {
            method: method.to_string(),
            arguments: format_arguments(arguments),
            expectations,
        })
    }
}

fn format_arguments(arguments: &Arguments) -> String {
    arguments
        .iter()
        .map(|slot| {
            let prefix = if slot.is_reference() { "&" } else { "" };
            slot.with(|value| format!("{}{:?}", prefix, value))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Reference, Slot};

    #[test]
    fn formats_references_with_ampersand() {
        let value = Reference::new(5);
        let arguments = [Slot::value("a"), Slot::reference(&value)];
        assert_eq!(format_arguments(&arguments), "\"a\", &5");
    }
}
