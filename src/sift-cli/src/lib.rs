//! sift-cli library
//!
//! Provides the argument definitions, configuration and subcommand handlers
//! behind the `sift` binary for programmatic use.

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;

pub use cli::{parse_args, parse_args_from, Cli, Commands, ConfigCommands};
pub use commands::{run_command, EXIT_NO_MATCH};
pub use config::{create_default_config_file, validate_config, Config};
pub use output::{render_parse_error, OutputWriter};
