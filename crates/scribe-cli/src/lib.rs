#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod menu;

pub use cli::{Cli, run, run_from_env};
pub use error::{CliError, Result};
pub use menu::{Command, Menu};
