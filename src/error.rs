//! Crate error type

use std::fmt;

/// Errors raised while building tasks or loading data files
#[derive(Debug)]
pub enum Error {
    /// A task was created from an empty word
    EmptyWord,
    /// A task word holds something other than ASCII letters
    NonAlphabetic(String),
    /// A blank position does not index into the word
    BlankOutOfRange { position: usize, len: usize },
    /// A word list contained no usable words
    EmptyWordList,
    /// Reading or writing a data file failed
    Io(std::io::Error),
    /// A data file was not valid JSON for the expected shape
    Json(serde_json::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyWord => write!(f, "task word is empty"),
            Self::NonAlphabetic(word) => write!(f, "task word {word:?} is not plain A-Z"),
            Self::BlankOutOfRange { position, len } => write!(
                f,
                "blank position {position} out of range for word of length {len}"
            ),
            Self::EmptyWordList => write!(f, "word list is empty"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
