pub mod cli;
pub mod error;

pub mod cmd {
    pub mod completions;
    pub mod track;
}

pub mod core {
    pub mod activity;
    pub mod api;
    pub mod config;
    pub mod report;
    pub mod tracker;
}

pub mod utils {
    pub mod theme;
}

use anyhow::Result;
use cli::{Cli, Commands};

pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Track(args) => cmd::track::run(args).await,
        Commands::Completions { shell } => {
            cmd::completions::generate(shell);
            Ok(())
        }
        Commands::Version => {
            cmd::completions::print_version();
            Ok(())
        }
    }
}
