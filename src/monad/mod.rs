mod container;
mod error;
mod fp;

pub use self::container::Monad;
pub use self::error::MonadError;
pub use self::fp::{compose, Bind, MockStep, Step, Unit};
