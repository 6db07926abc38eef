use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors that unwind out of retrieval and parsing.
///
/// Recoverable problems found while walking a log (ambiguous lines, malformed
/// summaries and so on) are never raised, they end up in
/// [`crate::ParsedLog::warnings`] instead.
#[derive(Error, Debug)]
pub enum GitnetError {
    /// The input didn't start with the `Mode =` header or named an unknown mode.
    #[error("Invalid input. {0}")]
    Parse(String),

    /// A line showed up before any `commit <hash>` line.
    #[error("Line {line_number} ('{line}') appeared before any commit hash line.")]
    OrphanLine {
        /// 1-based position of the line in the input, header included.
        line_number: usize,
        /// The offending line.
        line: String,
    },

    /// The caller passed a value that can't be used.
    #[error("{0}")]
    Input(String),

    /// The target path isn't a usable repository.
    #[error("{0}")]
    Repository(String),

    /// Running git failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Git printed something that isn't UTF-8.
    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] FromUtf8Error),
}
