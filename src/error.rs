use std::{error::Error as StdError, fmt, io, result::Result as StdResult};

/// A type alias for `Result<T, trf_hos::Error>`.
pub type Result<T> = StdResult<T, Error>;

/// Error when scanning trf output for HOS candidates.
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    /// A crate private constructor for `Error`.
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    /// Unwrap this error into its underlying type.
    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }
}

/// Specific errors that can happen.
#[derive(Debug)]
pub enum ErrorKind {
    /// I/O error, either reading the input or writing the report.
    Io(io::Error),
    /// A threshold in `HosConfig` is out of range.
    Config(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::new(ErrorKind::Io(err))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Io(ref err) => write!(f, "I/O error - {}", err),
            ErrorKind::Config(ref err) => write!(f, "invalid configuration - {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self.0 {
            ErrorKind::Io(ref err) => Some(err),
            ErrorKind::Config(_) => None,
        }
    }
}
