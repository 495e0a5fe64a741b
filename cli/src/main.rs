use std::path::{Path, PathBuf};

use argbind_core::{CommandDocument, tokenize};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{Level, debug};

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argbind")]
#[command(version, about = "Tokenize and bind argument vectors against declared command trees")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the token repository of an argument vector.
    Tokenize(TokenizeArgs),
    /// Bind and validate an argument vector against a declaration document.
    Check(CheckArgs),
    /// Print the usage line of a declared command or subcommand.
    Usage(UsageArgs),
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to tokenize, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Declaration document (.json, .yaml or .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to bind, given after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct UsageArgs {
    /// Declaration document (.json, .yaml or .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Print the full help page instead of the usage line.
    #[arg(long)]
    full: bool,
    /// Subcommand names leading to the command to describe.
    path: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Tokenize(args) => run_tokenize(args),
        Command::Check(args) => run_check(args),
        Command::Usage(args) => run_usage(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let repository = tokenize(args.args).map_err(|e| e.to_string())?;
    print_formatted(&repository, args.format)
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let mut command = load_command(&args.schema)?;
    let invocation = command.parse(args.args).map_err(|e| e.to_string())?;

    if invocation.help_requested() {
        print!("{}", invocation.command().help());
        return Ok(());
    }

    print_formatted(&invocation.bindings(), args.format)
}

fn run_usage(args: UsageArgs) -> Result<(), String> {
    let command = load_command(&args.schema)?;
    let target = command.find_path(args.path.as_slice()).ok_or_else(|| {
        format!(
            "no subcommand '{}' under command '{}'",
            args.path.join(" "),
            command.name()
        )
    })?;
    if args.full {
        print!("{}", target.help());
    } else {
        println!("{}", target.usage());
    }
    Ok(())
}

fn load_command(path: &Path) -> Result<argbind_core::Command, String> {
    let document = CommandDocument::load(path)
        .map_err(|err| format!("Failed to load '{}': {err}", path.display()))?;
    debug!(command = %document.name, "Loaded declaration document");
    document
        .into_command()
        .map_err(|err| format!("Invalid declaration in '{}': {err}", path.display()))
}

fn print_formatted<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<(), String> {
    let raw = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|err| format!("Failed to serialize output: {err}"))?,
    };
    println!("{}", raw.trim_end());
    Ok(())
}
