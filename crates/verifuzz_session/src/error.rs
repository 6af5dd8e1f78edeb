//! Error types for session setup and the fuzzing driver.

use verifuzz_gen::GenError;

/// Fatal errors that abort a fuzzing run.
///
/// Tool failures are *not* errors — they are counted outcomes. What aborts
/// a run is losing the ability to produce or store designs: generator
/// precondition violations, oracle inconsistencies, and session I/O.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session or iteration directory tree could not be created, or a
    /// design file could not be written.
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Design generation failed; see [`GenError`].
    #[error(transparent)]
    Gen(#[from] GenError),
}
