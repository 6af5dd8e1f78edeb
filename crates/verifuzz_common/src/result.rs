//! Common result and error types for the Verifuzz workspace.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in Verifuzz
/// itself), not a misbehaving external tool. Tool failures are ordinary
/// data — see `ToolResult` in the tools crate — and never surface here.
pub type FuzzResult<T> = Result<T, InternalError>;

/// An internal fuzzer error indicating a bug in Verifuzz, not a tool problem.
///
/// The oracle is considered infallible: if evaluation fails (for example an
/// unbound wire reference), the generator produced an inconsistent design
/// and the whole run must abort rather than report bogus differentials.
#[derive(Debug, thiserror::Error)]
#[error("internal fuzzer error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("oracle lost a wire");
        assert_eq!(format!("{err}"), "internal fuzzer error: oracle lost a wire");
    }

    #[test]
    fn ok_path() {
        let r: FuzzResult<u32> = Ok(7);
        assert_eq!(r.ok(), Some(7));
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}
