//! CLI entry point for the COVID-19 dashboard backend.
//!
//! Serves the JSON API consumed by the dashboard, and offers one-shot
//! subcommands that print the same aggregated data to stdout.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use covid_dashboard::analyzers::aggregate::aggregate;
use covid_dashboard::analyzers::ranking::{country_list, top_countries};
use covid_dashboard::analyzers::rate::derive_rate_of_change;
use covid_dashboard::analyzers::types::DateRange;
use covid_dashboard::config::{Cli, Commands};
use covid_dashboard::date::is_valid_date;
use covid_dashboard::fetch::BasicClient;
use covid_dashboard::infra::disease_sh::DiseaseShClient;
use covid_dashboard::output::TraceLog;
use covid_dashboard::server::{self, AppState};
use covid_dashboard::services::DiseaseApi;
use covid_dashboard::webhook::Webhook;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/covid_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("covid_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(env_filter("RUST_LOG", "info")?);

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(env_filter("RUST_LOG_JSON", "debug")?);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let api = DiseaseShClient::new(BasicClient::new()?, &cli.upstream.disease_api_url)?;

    match cli.command {
        Commands::Serve {
            bind_address,
            trace_log_path,
            webhook_url,
        } => {
            let webhook_url = webhook_url
                .filter(|u| !u.is_empty())
                .map(|u| Url::parse(&u))
                .transpose()
                .context("WEBHOOK_URL is not a valid URL")?;
            if webhook_url.is_none() {
                warn!("WEBHOOK_URL environment variable is missing, webhooks disabled");
            }

            let trace_log = TraceLog::new(trace_log_path);
            info!(
                upstream = %cli.upstream.disease_api_url,
                trace_log = %trace_log.path().display(),
                "Starting server"
            );

            let state = Arc::new(AppState {
                api: Arc::new(api),
                trace_log,
                webhook: Webhook::new(webhook_url, Arc::new(BasicClient::new()?)),
            });

            server::serve(&bind_address, state).await?;
        }
        Commands::Cases {
            country,
            period,
            start,
            end,
            rate,
        } => {
            for date in [&start, &end].into_iter().flatten() {
                if !is_valid_date(date) {
                    bail!("invalid date {date:?}, expected YYYY-MM-DD");
                }
            }
            if let (Some(s), Some(e)) = (&start, &end) {
                if s > e {
                    bail!("start date {s} is after end date {e}");
                }
            }

            let cases = api.historical_cases(&country).await?;
            let aggregated = aggregate(&cases, period, &DateRange::new(start, end))?;
            info!(%country, %period, buckets = aggregated.len(), "Cases aggregated");

            let json = if rate {
                serde_json::to_string_pretty(&derive_rate_of_change(&aggregated))?
            } else {
                serde_json::to_string_pretty(&aggregated)?
            };
            println!("{json}");
        }
        Commands::TopCountries { limit } => {
            let countries = api.countries().await?;
            let top = top_countries(countries, limit);
            println!("{}", serde_json::to_string_pretty(&top)?);
        }
        Commands::ListCountries => {
            let countries = api.countries().await?;
            info!(total = countries.len(), "Country list fetched");
            for name in country_list(&countries) {
                println!("{name}");
            }
        }
    }

    Ok(())
}

/// Filter from `var` with `default` added as a baseline directive.
fn env_filter(var: &str, default: &str) -> Result<EnvFilter> {
    Ok(EnvFilter::from_env(var).add_directive(default.parse()?))
}
