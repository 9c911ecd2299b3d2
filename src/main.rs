//! CoinMarketCap client - command line entry point
//!
//! This binary provides two subcommands:
//! - endpoints: List every endpoint with its minimum key tier
//! - call: Call one endpoint and print the JSON response

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coinmarketcap_client::{Client, ClientConfig, Credentials, Endpoint, Tier, ENDPOINTS};

#[derive(Parser, Debug)]
#[command(name = "cmc")]
#[command(about = "Query the CoinMarketCap Pro API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to a file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List endpoints and the key tier each one requires
    Endpoints,

    /// Call an endpoint and print its JSON response
    Call {
        /// Endpoint name, e.g. "cryptocurrency/listings/latest"
        endpoint: String,

        /// Query parameter as name=value (repeatable)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// API key [default: $CMC_API_KEY]
        #[arg(long)]
        key: Option<String>,

        /// Subscription tier of the key [default: $CMC_KEY_TYPE, else basic]
        #[arg(long, value_parser = parse_tier)]
        key_type: Option<Tier>,

        /// Print null instead of failing on HTTP errors (also CMC_FAIL_SILENTLY=1)
        #[arg(long)]
        fail_silently: bool,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got '{}'", raw)),
    }
}

fn parse_tier(raw: &str) -> Result<Tier, String> {
    raw.parse().map_err(|e: coinmarketcap_client::CmcError| e.to_string())
}

/// Environment config; the flag can only switch fail-silently on
fn client_config(fail_silently: bool) -> ClientConfig {
    let config = ClientConfig::from_env();
    if fail_silently {
        config.with_fail_silently(true)
    } else {
        config
    }
}

fn build_client(
    key: Option<String>,
    key_type: Option<Tier>,
    fail_silently: bool,
) -> Result<Client> {
    let credentials =
        Credentials::resolve(key, key_type).context("Pass --key or set CMC_API_KEY")?;
    Ok(Client::from_credentials(credentials, client_config(fail_silently)))
}

fn setup_logging(verbose: bool, log_dir: Option<&PathBuf>) -> Result<()> {
    // Set log level - filter out noisy external crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    // stdout is reserved for JSON output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let log_filename = format!(
                "cmc_{}.log",
                chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
            );
            let file_appender = tracing_appender::rolling::never(dir, log_filename);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_appender)
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    debug!("Logging initialized");
    Ok(())
}

fn list_endpoints() {
    for spec in ENDPOINTS.iter() {
        println!("{:<50} {}", spec.endpoint.name(), spec.min_tier);
    }
}

fn call(
    endpoint: &str,
    params: &[(String, String)],
    key: Option<String>,
    key_type: Option<Tier>,
    fail_silently: bool,
) -> Result<()> {
    let endpoint: Endpoint = endpoint.parse()?;
    let client = build_client(key, key_type, fail_silently)?;

    info!("Calling {} as a {} key", endpoint, client.key_type());
    let response = client
        .call_raw(endpoint, params)
        .with_context(|| format!("Request to {} failed", endpoint))?;

    let rendered = match response {
        Some(json) => serde_json::to_string_pretty(&json)?,
        None => "null".to_string(),
    };
    println!("{}", rendered);
    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.log_dir.as_ref())?;

    match cli.command {
        Commands::Endpoints => {
            list_endpoints();
            Ok(())
        }
        Commands::Call {
            endpoint,
            params,
            key,
            key_type,
            fail_silently,
        } => call(&endpoint, &params, key, key_type, fail_silently),
    }
}
