mod commands;
mod convert;
mod core;
mod rewrite;
mod syntax;
mod ui;
mod utils;

use clap::{Parser, Subcommand};
use core::error::{ConvertError, print_error};
use rewrite::ConverterKind;
use std::path::PathBuf;

/// Rewrite MSTest attributes to their xUnit equivalents in C# sources
#[derive(Parser)]
#[command(name = "xunit-convert")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Log converter activity to stderr (RUST_LOG overrides)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Convert C# documents (dry-run by default)
  Convert {
    /// Files or directories to convert (default: project root)
    paths: Vec<PathBuf>,
    /// Run only these converters (repeatable)
    #[arg(long, value_enum)]
    only: Vec<ConverterKind>,
    /// Write the rewritten documents (default: dry-run)
    #[arg(long)]
    apply: bool,
    /// Output the plan in JSON format
    #[arg(long)]
    json: bool,
    /// Show a unified diff per rewritten document
    #[arg(long, conflicts_with = "json")]
    diff: bool,
    /// Exit with code 1 when any document would change (CI mode)
    #[arg(long)]
    strict: bool,
  },

  /// Write a default xunit-convert.toml in the current directory
  Init {
    /// Overwrite an existing xunit-convert.toml
    #[arg(long)]
    force: bool,
  },

  /// List the available converters
  Converters {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);
  let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
  let red = anstyle::Color::Ansi(anstyle::AnsiColor::Red);

  clap::builder::Styles::styled()
    .usage(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .header(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .literal(anstyle::Style::new().fg_color(Some(green)))
    .invalid(anstyle::Style::new().bold().fg_color(Some(red)))
    .error(anstyle::Style::new().bold().fg_color(Some(red)))
    .valid(anstyle::Style::new().bold().underline().fg_color(Some(green)))
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let level = if cli.verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
    .format_timestamp(None)
    .init();

  let project_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(ConvertError::from(e).context("Failed to get current directory")),
  };

  // init must work even when the existing config is unreadable
  if let Commands::Init { force } = cli.command {
    if let Err(e) = commands::run_init(&project_root, force) {
      handle_error(e);
    }
    return;
  }

  // Build project context once (root + config)
  let ctx = match core::context::ProjectContext::build(&project_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Convert {
      paths,
      only,
      apply,
      json,
      diff,
      strict,
    } => commands::run_convert(&ctx, paths, only, apply, json, diff, strict),
    Commands::Converters { json } => commands::run_converters(&ctx, json),
    Commands::Init { .. } => Ok(()),
  };

  if let Err(e) = result {
    handle_error(e);
  }
}

fn handle_error(err: ConvertError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
