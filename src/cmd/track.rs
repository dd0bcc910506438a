use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use secrecy::SecretString;
use tracing::debug;

use crate::cli::TrackArgs;
use crate::core::api::ApiClient;
use crate::core::config::{self, Config};
use crate::core::report::ReportWriter;
use crate::core::tracker::{RepoTracker, TrackScope};
use crate::error::CliError;
use crate::utils::theme::{
    dimmed, header, highlight, info_message, step_message, success_message, warning_message,
    PhaseSpinner,
};

pub async fn run(args: TrackArgs) -> Result<()> {
    let config = resolve_config(config::load()?, &args)?;

    let token = args
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| SecretString::from(t.to_string()))
        .ok_or(CliError::AuthenticationRequired)?;

    let client = build_client(&token, &config)?;

    let scope = if args.all_contributors {
        TrackScope::ContributorsAndMembers
    } else {
        TrackScope::Contributors
    };
    let tracker = RepoTracker::new(client, &args.org, &args.repo).with_scope(scope);
    let full_name = tracker.full_name();

    println!("{}", header(&format!("Tracking {}", full_name)));
    println!(
        "{}",
        step_message(&format!(
            "Looking back {} days, up to {} concurrent requests",
            config.tracker.days, config.tracker.max_concurrent
        ))
    );
    if scope == TrackScope::ContributorsAndMembers {
        println!(
            "{}",
            step_message("Including organization members alongside contributors")
        );
    }

    let started = Instant::now();
    let spinner = PhaseSpinner::new("Collecting contributor activity...");
    let result = tracker.track(config.tracker.days).await;
    spinner.finish();

    if result.repository.is_none() {
        println!(
            "{}",
            warning_message(&format!(
                "Repository {} not found or not accessible",
                highlight(&full_name)
            ))
        );
        print_footer(&tracker, started);
        return Ok(());
    }

    if result.is_empty() {
        println!(
            "{}",
            info_message("No contributor activity found in the lookback window")
        );
    }

    let output_dir = config
        .report
        .output_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| ReportWriter::default_output_dir(&args.repo));
    let writer = ReportWriter::new(output_dir, config.report.format);

    let outcome = writer
        .write_reports(&result, &full_name, Utc::now())
        .await
        .map_err(CliError::from)?;

    println!(
        "{}",
        success_message(&format!(
            "Activity reports saved for {} contributors in {}",
            outcome.written.len(),
            writer.output_dir().display()
        ))
    );
    if outcome.failed > 0 {
        println!(
            "{}",
            warning_message(&format!("{} reports could not be written", outcome.failed))
        );
    }

    print_footer(&tracker, started);
    Ok(())
}

/// Applies command-line overrides on top of the file/environment config.
pub fn resolve_config(mut config: Config, args: &TrackArgs) -> crate::error::Result<Config> {
    if let Some(days) = args.days {
        config.tracker.days = days;
    }
    if let Some(concurrent) = args.concurrent {
        config.tracker.max_concurrent = concurrent;
    }
    if let Some(format) = args.format {
        config.report.format = format;
    }
    if let Some(output) = &args.output {
        config.report.output_dir = Some(output.clone());
    }
    if let Some(api_url) = &args.api_url {
        config.github.api_url = api_url.clone();
    }

    config::loader::validate(&config)?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn build_client(token: &SecretString, config: &Config) -> crate::error::Result<ApiClient> {
    Ok(ApiClient::new(token, &config.github, &config.tracker)?)
}

fn print_footer(tracker: &RepoTracker, started: Instant) {
    let stats = tracker.client().stats();
    println!(
        "{}",
        dimmed(&format!(
            "  {} requests, {} failed, {} rate-limit waits, peak {} in flight",
            stats.requests, stats.failures, stats.rate_limit_waits, stats.peak_in_flight
        ))
    );
    println!(
        "{} {}",
        "Completed in".bold(),
        format!("{:.2} seconds", started.elapsed().as_secs_f64()).bold()
    );
}
