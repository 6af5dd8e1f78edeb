//! Error types for design generation.

use verifuzz_common::InternalError;

/// Errors raised while generating a design.
///
/// All of these are fatal for the run: a precondition violation means the
/// configuration cannot produce a well-defined oracle, and an internal error
/// means the generator and its oracle disagree about the design's structure.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// The iteration range cannot drive a loop (the oracle would be
    /// undefined for a zero-iteration loop).
    #[error("loop iteration range requires min_iter >= 1 (got {0})")]
    EmptyIterRange(u32),

    /// The generator built an expression its oracle cannot evaluate.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_iter_range() {
        let err = GenError::EmptyIterRange(0);
        assert_eq!(
            format!("{err}"),
            "loop iteration range requires min_iter >= 1 (got 0)"
        );
    }

    #[test]
    fn internal_error_passes_through() {
        let err: GenError = InternalError::new("bad slot").into();
        assert_eq!(format!("{err}"), "internal fuzzer error: bad slot");
    }
}
