use clap::{Args, Parser, Subcommand};

use crate::core::report::ReportFormat;

#[derive(Parser)]
#[command(
    name = "repotrack",
    about = "Per-contributor activity reports for a GitHub repository",
    long_about = "Collects commits, pull requests and issues for every contributor of one GitHub\nrepository and writes one summary report per contributor.",
    version,
    after_help = "For detailed command help, run: repotrack <COMMAND> --help"
)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Track contributor activity in a repository",
        long_about = "Track contributor activity in a repository.\n\nThis command:\n  • Verifies the repository exists and is accessible\n  • Lists its contributors (and organization members with --all-contributors)\n  • Fetches commits, pull requests and issues for each of them\n  • Writes one summary report per contributor with any activity\n\nExamples:\n  repotrack track --org acme --repo widgets\n  repotrack track --org acme --repo widgets --days 90 --format json"
    )]
    Track(TrackArgs),

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum, help = "Shell type to generate completions for")]
        shell: clap_complete::Shell,
    },

    #[command(about = "Print version information")]
    Version,
}

#[derive(Args)]
pub struct TrackArgs {
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, help = "GitHub personal access token")]
    pub token: Option<String>,

    #[arg(long, env = "GITHUB_ORG", help = "GitHub organization name")]
    pub org: String,

    #[arg(long, env = "GITHUB_REPO", help = "Repository name (without org prefix)")]
    pub repo: String,

    #[arg(long, help = "Days to look back for commits (default: 30)")]
    pub days: Option<u32>,

    #[arg(
        short,
        long,
        help = "Output directory (default: github_activities_<repo>)"
    )]
    pub output: Option<String>,

    #[arg(long, help = "Max concurrent requests (default: 20)")]
    pub concurrent: Option<usize>,

    #[arg(
        long,
        help = "Also track organization members, not just repository contributors"
    )]
    pub all_contributors: bool,

    #[arg(short, long, value_enum, help = "Report format (text, json, toml)")]
    pub format: Option<ReportFormat>,

    #[arg(long, help = "GitHub API base URL (default: https://api.github.com)")]
    pub api_url: Option<String>,
}
