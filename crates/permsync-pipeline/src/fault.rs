//! Fault capture contracts for pipeline error types.

use thiserror::Error;

/// An error type that can absorb the two faults a pipeline itself produces:
/// a captured panic, and a failure raised while recovering from a failure.
///
/// Every component error enum in PermSync implements this so that pipelines
/// over it never let a fault escape `run()`.
pub trait Fault: Send + 'static {
    /// Construct the error representing a captured panic.
    fn from_panic(detail: String) -> Self;

    /// Construct the distinguished "recovery failed" error: the recovery
    /// function itself faulted (or returned a failure).
    fn recovery_failed(detail: String) -> Self;
}

/// Returned by the unsafe accessor when a failure is unwrapped as a success.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unwrapped a failure result: {cause}")]
pub struct UnwrapError {
    /// Display rendering of the wrapped failure.
    pub cause: String,
}

/// Unsafe success accessor on `Result`.
pub trait OutcomeExt<T> {
    /// The success value, or an [`UnwrapError`] naming the wrapped cause.
    fn success_value(self) -> Result<T, UnwrapError>;
}

impl<T, E: std::fmt::Display> OutcomeExt<T> for Result<T, E> {
    fn success_value(self) -> Result<T, UnwrapError> {
        self.map_err(|e| UnwrapError {
            cause: e.to_string(),
        })
    }
}

/// Best-effort rendering of a panic payload.
pub(crate) fn panic_detail(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_value_on_ok() {
        let r: Result<u32, String> = Ok(7);
        assert_eq!(r.success_value().unwrap(), 7);
    }

    #[test]
    fn success_value_names_cause() {
        let r: Result<u32, String> = Err("boom".into());
        let err = r.success_value().unwrap_err();
        assert_eq!(err.cause, "boom");
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn panic_detail_downcasts() {
        assert_eq!(panic_detail(Box::new("static")), "static");
        assert_eq!(panic_detail(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_detail(Box::new(42u8)), "non-string panic payload");
    }
}
