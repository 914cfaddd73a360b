//! Command-line interface for sift
//!
//! This module defines the command-line arguments with clap. Global options
//! (verbosity, config file, nesting limit) apply to every subcommand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sift - check, inspect and apply filter expressions to JSON data
///
/// Filter expressions combine JSON-pointer field references, comparison,
/// membership, range and wildcard operators, and `and`/`or` conjunctives
/// evaluated strictly left to right.
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about)]
#[command(after_help = "EXAMPLES:\n  \
    # Validate an expression and print its canonical form\n  \
    sift check '/age gte 18 and /name like \"J*\"'\n\n  \
    # Percent-encode an expression for a query string\n  \
    sift check '/tags in [\"a\",\"b\"]' --url-encode\n\n  \
    # Keep matching records from a JSON Lines file\n  \
    sift match '/status eq \"active\"' users.jsonl --lines --select\n\n  \
    # List the fields an expression reads\n  \
    sift fields '/user/name eq \"x\" or /user/tags/0 eq \"y\"'")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file to use
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Maximum group nesting depth
    #[arg(long, value_name = "N", global = true)]
    pub max_depth: Option<usize>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Parse an expression and print its canonical form
    #[command(after_help = "EXAMPLES:\n  \
        sift check '(/a eq 1 or /a eq 2) and /b neq \"x\"'\n  \
        sift check '/n between 1,10' --ast")]
    Check {
        /// Filter expression
        expression: String,

        /// Percent-encode the canonical form
        #[arg(short, long)]
        url_encode: bool,

        /// Print the filter graph as JSON instead
        #[arg(long)]
        ast: bool,

        /// The expression is percent-encoded
        #[arg(long)]
        encoded: bool,
    },

    /// Test JSON records against an expression
    #[command(after_help = "EXAMPLES:\n  \
        sift match '/a gt 1' data.json\n  \
        cat events.jsonl | sift match '/kind eq \"click\"' --lines --select")]
    Match {
        /// Filter expression
        expression: String,

        /// Input files (stdin if not specified)
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Read one JSON value per line
        #[arg(short, long)]
        lines: bool,

        /// Print matching records instead of one boolean per record
        #[arg(short, long)]
        select: bool,

        /// Exit with status 1 when no record matches
        #[arg(short = 'e', long)]
        exit_status: bool,

        /// The expression is percent-encoded
        #[arg(long)]
        encoded: bool,
    },

    /// List the fields an expression references
    Fields {
        /// Filter expression
        expression: String,

        /// The expression is percent-encoded
        #[arg(long)]
        encoded: bool,
    },

    /// Configuration management
    Config {
        /// Config subcommand
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Create a default configuration file
    Init {
        /// Path to create config file
        #[arg(default_value = "sift.toml")]
        path: PathBuf,

        /// Force overwrite if file exists
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Parse command-line arguments from a vector (for testing)
pub fn parse_args_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_parsing() {
        let cli = parse_args_from(["sift", "check", "/a eq 1", "--url-encode"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Check {
                expression: "/a eq 1".to_string(),
                url_encode: true,
                ast: false,
                encoded: false,
            }
        );
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_match_parsing() {
        let cli = parse_args_from([
            "sift", "match", "/a eq 1", "a.json", "b.json", "-l", "-s", "-e",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Match {
                expression: "/a eq 1".to_string(),
                files: vec![PathBuf::from("a.json"), PathBuf::from("b.json")],
                lines: true,
                select: true,
                exit_status: true,
                encoded: false,
            }
        );
    }

    #[test]
    fn test_global_options() {
        let cli = parse_args_from([
            "sift",
            "fields",
            "/a eq 1",
            "-vv",
            "--max-depth",
            "8",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.max_depth, Some(8));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_config_commands() {
        let cli = parse_args_from(["sift", "config", "show"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Show
            }
        );

        let cli = parse_args_from(["sift", "config", "init", "--force"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Init {
                    path: PathBuf::from("sift.toml"),
                    force: true
                }
            }
        );
    }

    #[test]
    fn test_missing_expression_is_an_error() {
        assert!(parse_args_from(["sift", "check"]).is_err());
        assert!(parse_args_from(["sift"]).is_err());
    }
}
