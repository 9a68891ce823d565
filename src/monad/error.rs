use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum MonadError {
    // Bookkeeping names a field with no stored value. Contract violation,
    // not a recoverable condition.
    MissingAttribute(String),
    InvalidValue(String),
    // A failure raised by a bound step, surfaced to the caller as is.
    Callable(Box<dyn Error>),
}

impl MonadError {
    pub fn callable<E: Error + 'static>(err: E) -> Self {
        MonadError::Callable(Box::new(err))
    }
}

impl fmt::Display for MonadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MonadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MonadError::Callable(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
