#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

pub mod common;
pub mod monad;
