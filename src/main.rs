mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use grocer_review::access::sign_in;
use grocer_review::catalog::Catalog;
use grocer_review::config::{Config, DataSourceConfig, Provider};
use grocer_review::feed::fixture::FixtureSource;
use grocer_review::feed::http::HttpDataSource;
use grocer_review::feed::{soft, DataSource};
use grocer_review::session::ReviewSession;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tui::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "grocer-review", about = "Review and approve store order recommendations")]
struct Args {
    /// Path to the TOML config file.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Sign in as this user instead of prompting.
    #[arg(long)]
    email: Option<String>,

    /// Serve data from the fixture directory instead of the backend.
    #[arg(long)]
    fixture: bool,
}

fn build_source(cfg: &DataSourceConfig) -> Result<Arc<dyn DataSource>> {
    match cfg.provider {
        Provider::Http => {
            let source = HttpDataSource::new(&cfg.base_url, Duration::from_millis(cfg.request_timeout_ms))?;
            tracing::info!(base_url = %cfg.base_url, "using http data source");
            Ok(Arc::new(source))
        }
        Provider::Fixture => {
            let source = FixtureSource::load_dir(&cfg.data_dir)?
                .with_latency(Duration::from_millis(cfg.fixture_latency_ms));
            Ok(Arc::new(source))
        }
    }
}

/// Fetch the reference data concurrently. Missing pieces degrade to empty.
async fn load_catalog(source: &dyn DataSource) -> Catalog {
    let (users, stores, products, reasons) = tokio::join!(
        soft("users", source.fetch_users()),
        soft("stores", source.fetch_stores()),
        soft("product catalog", source.fetch_product_catalog()),
        soft("justification reasons", source.fetch_justification_reasons()),
    );
    for error in [&users.error, &stores.error, &products.error, &reasons.error]
        .into_iter()
        .flatten()
    {
        eprintln!("  Warning: {}", error);
    }
    Catalog::new(users.data, stores.data, products.data, reasons.data)
}

fn prompt_email() -> Result<String> {
    print!("  Email: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read email from stdin")?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load saved overrides from .env (real env vars take precedence)
    Config::load_env_file();

    let mut config = Config::load(&args.config)?;
    config.apply_env_overrides();
    if args.fixture {
        config.data_source.provider = Provider::Fixture;
    }

    let log_file = std::fs::File::create(&config.logging.file)
        .with_context(|| format!("Failed to create log file: {}", config.logging.file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    println!();
    println!("  GreenGrocer Order Review v0.1.0");
    println!("  ===============================");
    println!();

    let source = build_source(&config.data_source)?;
    let catalog = Arc::new(load_catalog(source.as_ref()).await);
    println!(
        "  Loaded {} stores, {} products, {} users.",
        catalog.stores().len(),
        catalog.products().len(),
        catalog.users().len()
    );

    let email = match args.email {
        Some(email) => email,
        None => prompt_email()?,
    };
    let signed_in = sign_in(&catalog, &email)?;

    let session = signed_in
        .store_name()
        .map(|store| ReviewSession::new(catalog.clone(), store, config.review.quantity_input));
    let state = AppState::new(
        catalog,
        signed_in,
        session,
        config.review.recent_spoilage_rows,
    );

    tui::run_tui(state, source).await
}
