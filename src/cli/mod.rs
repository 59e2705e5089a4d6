//! Command-line interface module.

mod args;
pub mod common;
pub mod display;
pub mod locate;
pub mod search;
pub mod session;
pub mod suggest;

pub use args::{Cli, Commands};
