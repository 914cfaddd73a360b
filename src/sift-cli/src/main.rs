use std::io::{self, Write};
use std::process;

use sift_cli::{parse_args, run_command, Config};
use sift_shared::{BuildInfo, Result, VERSION};

/// Exit status for errors
const EXIT_ERROR: i32 = 2;

fn main() {
    // Check for --version flag and show enhanced version info
    if std::env::args().any(|arg| arg == "--version" || arg == "-V") {
        print_version();
        return;
    }

    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(EXIT_ERROR);
        }
    }
}

fn print_version() {
    let info = BuildInfo {
        version: VERSION,
        git_hash: option_env!("GIT_HASH"),
        build_date: option_env!("BUILD_DATE"),
        rust_version: option_env!("RUSTC_VERSION"),
    };
    print!("{}", info);
}

fn run() -> Result<i32> {
    let args = parse_args();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    config.apply_cli(&args)?;

    // Set up logging
    setup_logging(&config, args.verbose)?;
    log::debug!("effective config: {:?}", config);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let code = run_command(&args.command, &config, stdin.lock(), &mut stdout)?;
    stdout.flush()?;
    Ok(code)
}

fn setup_logging(config: &Config, verbosity: u8) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    match verbosity {
        0 => {
            if let Some(level) = config.log_level_filter()? {
                builder.filter_level(level);
            }
        }
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        2 => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
        }
    }

    builder.try_init()?;
    Ok(())
}
