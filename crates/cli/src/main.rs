// SPDX-License-Identifier: MIT

//! opsctl: the thin command-line client for the observatory operations
//! daemon (spec §6 CLI surface). Talks to `opsd` over the length-prefixed
//! JSON RPC protocol in `obs-wire`.

mod client;
mod commands;
mod exit_error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::dome::DomeCommand;
use commands::tel::TelCommand;
use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "opsctl", version, about = "Control an observatory opsd daemon")]
struct Cli {
    /// Daemon address, host:port.
    #[arg(long, global = true, default_value = "127.0.0.1:7624")]
    host: String,

    /// Config file to validate schedules against (required by `validate`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory `script` resolves named scripts from.
    #[arg(long, global = true, default_value = ".")]
    scripts_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the daemon's status, human-readable.
    Status,
    /// Print the daemon's status as raw JSON.
    Json,
    /// Control the dome.
    Dome {
        #[command(subcommand)]
        action: DomeCommand,
    },
    /// Control the telescope.
    Tel {
        #[command(subcommand)]
        action: TelCommand,
    },
    /// Validate a schedule file against the configured site and action registry.
    Validate { file: PathBuf },
    /// Send a schedule to the daemon.
    Schedule {
        /// Apply only the dome window, dropping any queued actions.
        #[arg(long)]
        dome: bool,
        /// Apply only the queued actions, dropping any dome window.
        #[arg(long)]
        tel: bool,
        file: PathBuf,
    },
    /// Run a named operator script.
    Script {
        name: String,
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.code);
    }
}

fn dispatch(cli: Cli) -> Result<(), ExitError> {
    match cli.command {
        Command::Status => commands::status::status(&cli.host, false),
        Command::Json => commands::status::status(&cli.host, true),
        Command::Dome { action } => commands::dome::run(&cli.host, action),
        Command::Tel { action } => commands::tel::run(&cli.host, action),
        Command::Validate { file } => {
            let config = cli.config.ok_or_else(|| ExitError::local("validate requires --config <file>"))?;
            commands::validate::run(&config, &file)
        }
        Command::Schedule { dome, tel, file } => commands::schedule::run(&cli.host, &file, dome, tel),
        Command::Script { name, args } => commands::script::run(&cli.scripts_dir, &name, &args),
    }
}
