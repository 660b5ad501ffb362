use thiserror::Error;

use crate::answer::Fault;

/// Errors surfaced by [`StubCaller::call`](crate::StubCaller::call).
///
/// An unmatched call is only an error when the caller was built with
/// [`Unstubbed::Fail`](crate::Unstubbed::Fail).
#[derive(Debug, Error)]
pub enum Error {
    #[error("✗ {method} was never stubbed")]
    NeverStubbed { method: String },

    #[error("✗ no stub for {method} matched\n  Actual: {method}({arguments})\n{}", format_expectations(.expectations))]
    NotMatched {
        method: String,
        arguments: String,
        expectations: Vec<String>,
    },

    #[error(transparent)]
    Raised(Fault),
}

/// Result type of [`StubCaller::call`](crate::StubCaller::call).
pub type Result<T> = std::result::Result<T, Error>;

fn format_expectations(expectations: &[String]) -> String {
    expectations
        .iter()
        .map(|expectation| format!("  ✗ Expected: {}", expectation))
        .collect::<Vec<_>>()
        .join("\n")
}
