// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use modeswitch::commands::run::RunCommand;
use modeswitch::commands::show_config::ConfigCommand;
use modeswitch::commands::trigger::TriggerCommand;
use modeswitch::config::ModeSwitchConfig;
use modeswitch::error::{ModeSwitchError, Result, format_error_with_color, get_exit_code};
use modeswitch::logging;
use modeswitch::mode::Mode;
use modeswitch::signals::TriggerKind;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "modeswitch")]
#[command(author, version, about = "Toggle AUTO/MANUAL mode with a cancellable countdown", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the trigger files and coordinate mode switches
    #[command(long_about = "Watch the trigger files and coordinate mode switches

Runs until interrupted with Ctrl-C or SIGTERM.

Examples:
  modeswitch run --mode auto
  modeswitch run --mode manual --dry-run")]
    Run {
        /// Mode the host is currently running in (auto, ai, manual)
        #[arg(long, value_name = "MODE")]
        mode: Option<Mode>,

        /// Log the restart instead of performing it
        #[arg(long)]
        dry_run: bool,

        /// Do not drive a display
        #[arg(long)]
        headless: bool,
    },

    /// Ask a running daemon to switch, test or cancel
    #[command(visible_alias = "t")]
    Trigger {
        #[arg(value_enum)]
        kind: TriggerKind,
    },

    /// Print the effective configuration
    Config {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn setup_logger(cli: &Cli) {
    // Accepted and rejected requests are logged at info.
    let verbose = match cli.command {
        Commands::Run { .. } => cli.verbose.max(1),
        _ => cli.verbose,
    };
    logging::setup_logger(verbose);
}

fn exit_with_error(error: &ModeSwitchError) -> ! {
    let use_color = std::io::stderr().is_terminal();
    eprintln!("{}", format_error_with_color(error, use_color));
    std::process::exit(get_exit_code(error));
}

fn main() {
    let cli = Cli::parse();

    setup_logger(&cli);

    let config = match ModeSwitchConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e),
    };

    let result: Result<()> = (|| match cli.command {
        Commands::Run {
            mode,
            dry_run,
            headless,
        } => {
            let command = RunCommand::new(&config)?;
            command.execute(mode, dry_run, headless)
        }
        Commands::Trigger { kind } => {
            let command = TriggerCommand::new(&config)?;
            command.execute(kind)
        }
        Commands::Config { json } => {
            let command = ConfigCommand::new(&config)?;
            command.execute(json)
        }
    })();

    if let Err(e) = result {
        exit_with_error(&e);
    }
}
