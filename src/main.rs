mod checks;
mod commands;
mod core;
mod logging;
mod release;
mod tools;
mod utils;

use clap::{Args, Parser, Subcommand};
use core::context::Overrides;
use core::error::{NightlyError, print_error};
use std::path::PathBuf;

/// Build a conda package and upload it to a nightly channel
#[derive(Parser)]
#[command(name = "conda-nightly")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the package and upload it under the nightly label
  Publish {
    #[command(flatten)]
    target: TargetArgs,
    /// Upload token (default: read from the variable named by upload.token_env)
    #[arg(long)]
    token: Option<String>,
    /// Version date as YYYY-MM-DD (default: today, local time)
    #[arg(long)]
    date: Option<String>,
    /// Show the plan without executing anything
    #[arg(long)]
    dry_run: bool,
    /// Output plan or report in JSON format
    #[arg(long)]
    json: bool,
    /// Stop at the first failing step instead of always attempting the upload
    #[arg(long)]
    fail_fast: bool,
  },

  /// Show the version, file name and path a run would produce
  Artifact {
    #[command(flatten)]
    target: TargetArgs,
    /// Version date as YYYY-MM-DD (default: today, local time)
    #[arg(long)]
    date: Option<String>,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Write nightly.toml in the current directory
  Init {
    /// Package name
    #[arg(long)]
    package: String,
    /// Account that owns the uploads
    #[arg(long)]
    user: String,
    /// Build output root (default: ~/conda-bld)
    #[arg(long)]
    output_root: Option<String>,
    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },

  /// Check tools, recipe, token and output directory
  Doctor {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

/// Values that override nightly.toml
#[derive(Args)]
struct TargetArgs {
  /// Package name (overrides package.name)
  #[arg(long)]
  package: Option<String>,
  /// Account that owns the upload (overrides package.user)
  #[arg(long)]
  user: Option<String>,
  /// Build output root (overrides build.output_root)
  #[arg(long)]
  output_root: Option<PathBuf>,
  /// Channel label (overrides upload.label)
  #[arg(long)]
  label: Option<String>,
}

impl TargetArgs {
  fn into_overrides(self, token: Option<String>) -> Overrides {
    Overrides {
      package: self.package,
      user: self.user,
      output_root: self.output_root,
      label: self.label,
      token,
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  logging::init(cli.verbose);

  let result = match cli.command {
    Commands::Publish {
      target,
      token,
      date,
      dry_run,
      json,
      fail_fast,
    } => commands::run_publish(commands::PublishOptions {
      overrides: target.into_overrides(token),
      date,
      dry_run,
      json,
      fail_fast,
    }),
    Commands::Artifact { target, date, json } => {
      commands::run_artifact(target.into_overrides(None), date, json).map(|()| 0)
    }
    Commands::Init {
      package,
      user,
      output_root,
      force,
    } => commands::run_init(package, user, output_root, force).map(|()| 0),
    Commands::Doctor { json } => commands::run_doctor(json).map(|()| 0),
  };

  match result {
    Ok(code) => std::process::exit(code),
    Err(err) => handle_error(err),
  }
}

fn handle_error(err: NightlyError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
