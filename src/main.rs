use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use measures::MeasuresConfig;
use measures::cli::{Cli, Commands, ConfigCommands};
use measures::commands::{cmd_browse, cmd_config_init, cmd_config_path, cmd_config_show, cmd_list};
use measures::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best effort; the tool works without a writable data dir
    if let Err(e) = MeasuresConfig::data_dir().and_then(|dir| logging::init(&dir)) {
        eprintln!("{} Logging disabled: {}", "!".yellow(), e);
    }

    match cli.command {
        Commands::Browse { source } => cmd_browse(&source),
        Commands::List { source, all, json } => cmd_list(&source, all, json),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cmd_config_show(),
            ConfigCommands::Path => cmd_config_path(),
            ConfigCommands::Init { force } => cmd_config_init(force),
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "measures", &mut io::stdout());
            Ok(())
        }
    }
}
