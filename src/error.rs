//! Shell-wide error type.
//!
//! Every fallible operation in this crate returns `Result<T, ShellError>`.
//! The REPL boundary is the only place these are turned into a printed
//! message instead of propagated with `?`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("unterminated single quote")]
    UnterminatedSingleQuote,

    #[error("unterminated double quote")]
    UnterminatedDoubleQuote,

    #[error("unterminated escape")]
    UnterminatedEscape,

    #[error("syntax error near unexpected token `{0}`")]
    SyntaxError(String),

    #[error("{shell}: {path}: {reason}")]
    RedirectFailed {
        shell: String,
        path: PathBuf,
        reason: std::io::Error,
    },

    #[error("{0}: {1}")]
    Io(String, std::io::Error),
}
