use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use bo_config::{Attribute, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;

const APP_NAME: &str = "bookmark-open";

/// bookmark-open — bookmark launcher configuration tool
///
/// Validate and inspect the bookmark-open configuration file.
#[derive(Parser)]
#[command(name = "bookmark-open", version, about, long_about = None)]
struct Cli {
    /// Configuration file [default: $HOME/.config/bookmark-open/config]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Suppress normal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file (syntax + value types)
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configured settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path in use
    Path,

    /// Show version information
    Version,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("HOME is not set, pass --config <PATH>")]
    NoHome,

    #[error("could not open: {}\nApplication not setup, create the configuration file first.", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration file empty: {}\nApplication not setup, create the configuration file first.", .0.display())]
    Empty(PathBuf),

    #[error("{0}")]
    Config(#[from] bo_config::Error),
}

impl CliError {
    /// 1 = configuration rejected, 2 = environment problem
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 1,
            _ => 2,
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn config_path(explicit: Option<&Path>) -> Result<PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let home = std::env::var_os("HOME").ok_or(CliError::NoHome)?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join(APP_NAME)
        .join("config"))
}

fn open_config(path: &Path) -> Result<File, CliError> {
    let open_error = |source: std::io::Error| CliError::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_error)?;
    let metadata = file.metadata().map_err(open_error)?;
    if metadata.len() == 0 {
        return Err(CliError::Empty(path.to_path_buf()));
    }
    log::debug!("reading configuration from {}", path.display());
    Ok(file)
}

fn load(path: &Path) -> Result<Context, CliError> {
    let file = open_config(path)?;
    let mut context = Context::new();
    bo_config::load_context(file, &mut context)?;
    Ok(context)
}

fn missing_names(context: &Context) -> Vec<&'static str> {
    context.missing().into_iter().map(Attribute::name).collect()
}

fn check(path: &Path, json: bool, quiet: bool) -> Result<i32, CliError> {
    let result = match load(path) {
        Ok(context) => Ok(context),
        Err(CliError::Config(e)) => Err(e),
        Err(other) => return Err(other),
    };

    if json {
        let report = match &result {
            Ok(context) => serde_json::json!({
                "valid": true,
                "path": path.display().to_string(),
                "error": null,
                "missing": missing_names(context),
            }),
            Err(e) => serde_json::json!({
                "valid": false,
                "path": path.display().to_string(),
                "error": e.to_string(),
                "line": e.span().map(|s| s.line),
                "missing": [],
            }),
        };
        if !quiet {
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        }
        return Ok(if result.is_ok() { 0 } else { 1 });
    }

    match result {
        Ok(context) => {
            if !quiet {
                println!("{} {} is valid", "✓".green().bold(), path.display());
            }
            for name in missing_names(&context) {
                eprintln!("{}: {} is not configured", "warning".yellow().bold(), name);
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            Ok(1)
        }
    }
}

fn show(path: &Path, json: bool, quiet: bool) -> Result<i32, CliError> {
    let context = load(path)?;
    if quiet {
        return Ok(0);
    }
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&context.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", context);
    }
    Ok(0)
}

fn run(cli: &Cli) -> Result<i32, CliError> {
    match cli.command {
        Commands::Check { json } => {
            let path = config_path(cli.config.as_deref())?;
            check(&path, json, cli.quiet)
        }
        Commands::Show { json } => {
            let path = config_path(cli.config.as_deref())?;
            show(&path, json, cli.quiet)
        }
        Commands::Path => {
            let path = config_path(cli.config.as_deref())?;
            if !cli.quiet {
                println!("{}", path.display());
            }
            Ok(0)
        }
        Commands::Version => {
            println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {} {}", APP_NAME, "error:".red().bold(), e);
            eprintln!("Try '{} --help' for more information.", APP_NAME);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
