//! Command-line and environment configuration.

use clap::{Args, Parser, Subcommand};

use crate::analyzers::types::Period;
use crate::infra::disease_sh::DEFAULT_BASE_URL;

#[derive(Parser)]
#[command(name = "covid_dashboard")]
#[command(about = "COVID-19 case statistics aggregated by day, week, or month", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub upstream: UpstreamArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct UpstreamArgs {
    /// Base URL of the disease.sh-compatible statistics API
    #[arg(long, env = "DISEASE_API_URL", default_value = DEFAULT_BASE_URL)]
    pub disease_api_url: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the JSON API
    Serve {
        #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
        bind_address: String,

        /// JSON-lines file that receives one entry per series request
        #[arg(long, env = "TRACE_LOG_PATH", default_value = "server/logs/http_trace.jsonl")]
        trace_log_path: String,

        /// Optional: endpoint notified with every served series
        #[arg(long, env = "WEBHOOK_URL")]
        webhook_url: Option<String>,
    },
    /// Print a country's aggregated cases (or their rate of change) as JSON
    Cases {
        /// Country name or code, or "all" for the global timeline
        #[arg(short, long, default_value = "all")]
        country: String,

        #[arg(short, long, value_enum, default_value_t = Period::Month)]
        period: Period,

        /// Inclusive start date, YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,

        /// Inclusive end date, YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,

        /// Print the period-over-period rate of change instead of totals
        #[arg(long, default_value_t = false)]
        rate: bool,
    },
    /// Print the countries with the most cases
    TopCountries {
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
    /// Print every country the statistics API knows, prefixed with "all"
    ListCountries,
}
