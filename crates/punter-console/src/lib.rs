//! Terminal front end of the punter admin console
//!
//! The binary parses the command line, builds an [`punter_client::AppContext`]
//! from layered configuration and hands the subcommand to
//! [`commands::execute`]. Everything below the argument parser is reachable
//! from this library so commands can be exercised against fixture data.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod prompt;
pub mod render;

pub use cli::{Cli, Command, OutputFormat};
pub use commands::execute;
pub use prompt::{Answer, Prompt, TerminalPrompt};
pub use render::Renderer;
