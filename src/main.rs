use anyhow::Result;

use smx_standings::cli::Command;
use smx_standings::{
    handle_catalog, handle_completions, handle_event, handle_gauntlet, handle_ladder, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Event { folder, output } => handle_event(folder, output.as_deref()),
        Command::Gauntlet {
            config,
            entrants,
            output,
        } => handle_gauntlet(config, entrants, output.as_deref()),
        Command::Ladder {
            config,
            entrants,
            output,
        } => handle_ladder(config, entrants, output.as_deref()),
        Command::Catalog { find, rebuild } => handle_catalog(find.as_deref(), *rebuild),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
