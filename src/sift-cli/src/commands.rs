//! Subcommand handlers
//!
//! Handlers write to the given output instead of stdout so they can be
//! driven from tests.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use sift_filter::Matches;
use sift_parser::{Filter, FilterParser};
use sift_shared::error::input_error;
use sift_shared::Result;

use crate::cli::{Commands, ConfigCommands};
use crate::config::{create_default_config_file, Config};
use crate::output::{render_parse_error, OutputWriter};

/// Exit status when `match -e` finds no matching record
pub const EXIT_NO_MATCH: i32 = 1;

/// Run `command`, returning the process exit status
pub fn run_command<W: Write>(
    command: &Commands,
    config: &Config,
    stdin: impl Read,
    out: &mut W,
) -> Result<i32> {
    let writer = OutputWriter::new(config);
    match command {
        Commands::Check {
            expression,
            url_encode,
            ast,
            encoded,
        } => {
            let filter = parse_expression(config, expression, *encoded)?;
            if *ast {
                writeln!(out, "{}", writer.graph(&filter)?)?;
            } else {
                writeln!(out, "{}", writer.filter_text(&filter, *url_encode))?;
            }
            Ok(0)
        }
        Commands::Match {
            expression,
            files,
            lines,
            select,
            exit_status,
            encoded,
        } => {
            let filter = parse_expression(config, expression, *encoded)?;
            let records = if files.is_empty() {
                read_records(stdin, *lines, "<stdin>")?
            } else {
                let mut records = Vec::new();
                for path in files {
                    records.extend(read_file_records(path, *lines)?);
                }
                records
            };

            let mut matched = 0usize;
            for record in &records {
                let is_match = filter
                    .matches(record)
                    .with_context(|| format!("Failed to evaluate filter '{}'", filter))?;
                if is_match {
                    matched += 1;
                }
                if *select {
                    if is_match {
                        writeln!(out, "{}", writer.record(record, *lines)?)?;
                    }
                } else {
                    writeln!(out, "{}", is_match)?;
                }
            }
            log::info!("{} of {} records matched", matched, records.len());

            if *exit_status && matched == 0 {
                Ok(EXIT_NO_MATCH)
            } else {
                Ok(0)
            }
        }
        Commands::Fields {
            expression,
            encoded,
        } => {
            let filter = parse_expression(config, expression, *encoded)?;
            for field in filter.fields() {
                writeln!(out, "{}", field)?;
            }
            Ok(0)
        }
        Commands::Config { command } => {
            handle_config_command(command, config, out)?;
            Ok(0)
        }
    }
}

fn handle_config_command<W: Write>(
    command: &ConfigCommands,
    config: &Config,
    out: &mut W,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            write!(out, "{}", config.to_toml()?)?;
        }
        ConfigCommands::Init { path, force } => {
            if path.exists() && !force {
                return Err(anyhow::anyhow!(
                    "Config file already exists: {}\n\n\
                    Use --force to overwrite:\n  \
                    sift config init {} --force",
                    path.display(),
                    path.display()
                ));
            }
            create_default_config_file(path)?;
            writeln!(out, "Created config file: {}", path.display())?;
        }
    }
    Ok(())
}

/// Parse with the configured nesting limit, rendering errors against the expression
pub fn parse_expression(config: &Config, expression: &str, encoded: bool) -> Result<Filter> {
    let parser = FilterParser::new().with_max_depth(config.parser.max_depth);
    let parsed = if encoded {
        parser.parse_url_encoded(expression)
    } else {
        parser.parse(expression)
    };
    parsed.map_err(|e| {
        let message = if encoded {
            e.to_string()
        } else {
            render_parse_error(expression, &e)
        };
        anyhow::Error::new(e).context(format!("Invalid filter expression: {}", message))
    })
}

fn read_file_records(path: &Path, lines: bool) -> Result<Vec<Value>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file {}", path.display()))?;
    read_records(file, lines, &path.display().to_string())
}

/// Read records: one JSON value per line with `lines`, otherwise a single
/// document whose top-level array (if any) is the record list
fn read_records(reader: impl Read, lines: bool, source: &str) -> Result<Vec<Value>> {
    let reader = BufReader::new(reader);
    if !lines {
        let value: Value = serde_json::from_reader(reader)
            .map_err(|e| input_error(format!("{}: invalid JSON: {}", source, e)))?;
        return Ok(match value {
            Value::Array(items) => items,
            other => vec![other],
        });
    }

    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", source))?;
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(&line).map_err(|e| {
            input_error(format!("{}:{}: invalid JSON: {}", source, index + 1, e))
        })?;
        records.push(value);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parse_args_from;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn run(args: &[&str], stdin: &str) -> (Result<i32>, String) {
        let mut argv = vec!["sift"];
        argv.extend_from_slice(args);
        let cli = parse_args_from(argv).unwrap();
        let mut config = Config::default();
        config.apply_cli(&cli).unwrap();
        let mut out = Vec::new();
        let status = run_command(&cli.command, &config, stdin.as_bytes(), &mut out);
        (status, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_check_prints_canonical_text() {
        let (status, out) = run(&["check", "( /a eq 1  or /b in [1, 2] )"], "");
        assert_eq!(status.unwrap(), 0);
        assert_eq!(out, "(/a eq 1 or /b in [1,2])\n");

        let (_, out) = run(&["check", "/a like \"x*\"", "--url-encode"], "");
        assert_eq!(out, "%2Fa%20like%20%22x%2A%22\n");

        let (_, out) = run(&["check", "%2Fa%20eq%201", "--encoded"], "");
        assert_eq!(out, "/a eq 1\n");
    }

    #[test]
    fn test_check_reports_position() {
        let (status, _) = run(&["check", "/a eq [1]"], "");
        let message = format!("{:#}", status.unwrap_err());
        assert!(message.contains("position 6"), "{}", message);
        assert!(message.contains("      ^"), "{}", message);
    }

    #[test]
    fn test_max_depth_flag() {
        let (status, _) = run(&["check", "((/a eq 1))", "--max-depth", "1"], "");
        assert!(status.is_err());
        let (status, _) = run(&["check", "((/a eq 1))", "--max-depth", "2"], "");
        assert_eq!(status.unwrap(), 0);
    }

    #[test]
    fn test_match_document_and_lines() {
        let (status, out) = run(&["match", "/n gt 1"], r#"[{"n": 1}, {"n": 2}, {"m": 3}]"#);
        assert_eq!(status.unwrap(), 0);
        assert_eq!(out, "false\ntrue\nfalse\n");

        let input = "{\"n\": 1}\n\n{\"n\": 5}\n";
        let (_, out) = run(&["match", "/n gt 1", "--lines", "--select"], input);
        assert_eq!(out, "{\"n\":5}\n");
    }

    #[test]
    fn test_match_exit_status() {
        let (status, _) = run(&["match", "/n gt 10", "-e"], r#"{"n": 1}"#);
        assert_eq!(status.unwrap(), EXIT_NO_MATCH);
        let (status, _) = run(&["match", "/n gt 0", "-e"], r#"{"n": 1}"#);
        assert_eq!(status.unwrap(), 0);
    }

    #[test]
    fn test_match_reports_bad_input() {
        let (status, _) = run(&["match", "/n gt 1", "--lines"], "{\"n\": 1}\nnot json\n");
        let message = status.unwrap_err().to_string();
        assert!(message.contains("<stdin>:2"), "{}", message);
    }

    #[test]
    fn test_match_files() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.json");
        let second = temp_dir.path().join("b.json");
        std::fs::write(&first, r#"{"tag": "x"}"#).unwrap();
        std::fs::write(&second, r#"[{"tag": "y"}, {"tag": "x"}]"#).unwrap();

        let (status, out) = run(
            &[
                "match",
                "/tag eq \"x\"",
                first.to_str().unwrap(),
                second.to_str().unwrap(),
            ],
            "",
        );
        assert_eq!(status.unwrap(), 0);
        assert_eq!(out, "true\nfalse\ntrue\n");

        let missing = temp_dir.path().join("missing.json");
        let (status, _) = run(&["match", "/a eq 1", missing.to_str().unwrap()], "");
        assert!(status.is_err());
    }

    #[test]
    fn test_fields() {
        let (_, out) = run(&["fields", "/b eq 1 and /a/0 in /b"], "");
        assert_eq!(out, "/b\n/a\n");
    }

    #[test]
    fn test_config_commands() {
        let (_, out) = run(&["config", "show"], "");
        assert!(out.contains("max_depth = 64"));

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sift.toml");
        let path = path.to_str().unwrap();
        let (status, out) = run(&["config", "init", path], "");
        assert_eq!(status.unwrap(), 0);
        assert!(out.starts_with("Created config file"));

        let (status, _) = run(&["config", "init", path], "");
        assert!(status.is_err());
        let (status, _) = run(&["config", "init", path, "--force"], "");
        assert_eq!(status.unwrap(), 0);
    }
}
