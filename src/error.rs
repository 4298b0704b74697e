use miette::Diagnostic;
use thiserror::Error;

/// Main error type for blot operations
#[derive(Error, Diagnostic, Debug)]
pub enum BlotError {
    #[error("IO error: {0}")]
    #[diagnostic(code(blot::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(blot::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Format error: {message}")]
    #[diagnostic(code(blot::format))]
    Format {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, BlotError>;
