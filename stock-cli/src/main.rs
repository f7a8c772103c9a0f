//! stockctl - inventory stock reports from the command line
//!
//! Loads `.env`, reads the backend configuration from the environment, signs
//! in (or uses `STOCK_ACCESS_TOKEN`), then runs one command.

mod commands;
mod logger;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stock_client::{ClientConfig, RestClient};

#[derive(Debug, Parser)]
#[command(name = "stockctl", version, about = "Inventory stock reports")]
struct Cli {
    /// Account email, used when no access token is configured
    #[arg(long, env = "STOCK_EMAIL", global = true)]
    email: Option<String>,

    #[arg(long, env = "STOCK_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "STOCK_LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Also write daily rotating log files here
    #[arg(long, env = "STOCK_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List catalog items
    Items {
        /// Case-insensitive name or SKU search
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Items at or below their low-stock threshold
    LowStock,
    /// List tags
    Tags,
    /// Create an item
    AddItem {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        sku: String,
        #[arg(long, default_value = "0")]
        initial_stock: String,
        #[arg(long, default_value = "5")]
        threshold: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Submit a new stock report
    Submit {
        /// ITEM:START:END, repeatable
        #[arg(long = "line", value_parser = parse_line_arg)]
        lines: Vec<LineArg>,
        #[arg(long, default_value = "")]
        note: String,
        #[arg(long, default_value = "")]
        revenue: String,
    },
    /// Replace the lines of a committed report
    Edit {
        report_id: String,
        #[arg(long = "line", value_parser = parse_line_arg)]
        lines: Vec<LineArg>,
        #[arg(long, default_value = "")]
        note: String,
        #[arg(long, default_value = "")]
        revenue: String,
    },
    /// Delete a committed report
    Delete { report_id: String },
    /// Reports in a date range (defaults to the current month)
    History {
        /// YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        /// Print the copy text of one report
        #[arg(long, conflicts_with = "aggregate")]
        report: Option<String>,
        /// Print the aggregated copy text of the range
        #[arg(long)]
        aggregate: bool,
    },
    /// Show the signed-in user and role
    Whoami,
    /// Register a new account
    Signup,
}

/// One `--line ITEM:START:END` argument; counts stay raw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineArg {
    pub item_id: String,
    pub start: String,
    pub end: String,
}

fn parse_line_arg(raw: &str) -> Result<LineArg, String> {
    let mut parts = raw.rsplitn(3, ':');
    let end = parts.next();
    let start = parts.next();
    let item = parts.next();
    match (item, start, end) {
        (Some(item), Some(start), Some(end)) if !item.trim().is_empty() => Ok(LineArg {
            item_id: item.trim().to_string(),
            start: start.to_string(),
            end: end.to_string(),
        }),
        _ => Err(format!("expected ITEM:START:END, got {raw:?}")),
    }
}

impl Cli {
    fn credentials(&self) -> anyhow::Result<(&str, &str)> {
        match (self.email.as_deref(), self.password.as_deref()) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => anyhow::bail!(
                "No access token configured; pass --email and --password or set STOCK_EMAIL and STOCK_PASSWORD"
            ),
        }
    }
}

/// Client carrying a usable token; `true` when this run signed in itself
async fn connect(cli: &Cli, config: &ClientConfig) -> anyhow::Result<(RestClient, bool)> {
    let mut client = config.build_rest_client()?;
    if client.token().is_some() {
        return Ok((client, false));
    }
    let (email, password) = cli.credentials()?;
    client.sign_in(email, password).await?;
    Ok((client, true))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = logger::init_logger(&cli.log_level, cli.json_logs, cli.log_dir.as_deref())?;

    let config = ClientConfig::from_env()?;
    tracing::debug!(base_url = %config.base_url, "Configuration loaded");

    if let Command::Signup = cli.command {
        let (email, password) = cli.credentials()?;
        let client = config.build_rest_client()?;
        return commands::sign_up(&client, email, password).await;
    }

    let (mut client, signed_in) = connect(&cli, &config).await?;
    let result = commands::run(&cli.command, &client).await;

    if signed_in && let Err(e) = client.sign_out().await {
        tracing::warn!(error = %e, "Sign-out failed");
    }
    result
}
