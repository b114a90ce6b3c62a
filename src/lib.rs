pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::Prompter;
use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use crate::core::session::Session;
use crate::providers::ExchangeRateApiProvider;
use crate::store::JsonExpenseStore;
use anyhow::Result;
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info};

/// Loads the config, from `config_path` when given, otherwise from the
/// default location.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let mut config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    config.apply_env();
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Runs an interactive session with the given terminal streams. The config is
/// used as given; environment overrides are applied by [`load_config`].
pub async fn run_with_io<R: BufRead, W: Write>(
    config: &AppConfig,
    input: R,
    output: W,
    today: chrono::NaiveDate,
) -> Result<()> {
    let expenses_path = config.expenses_path()?;
    info!("Using expenses file {}", expenses_path.display());

    let store = JsonExpenseStore::new(expenses_path);
    let mut session = Session::open(Box::new(store), config.categories.as_slice());

    let rate_cache = Arc::new(Cache::<String, f64>::new());
    let rates = ExchangeRateApiProvider::new(
        &config.providers.exchange_rate.base_url,
        config.providers.exchange_rate.api_key.clone(),
        rate_cache,
    );

    let mut prompter = Prompter::new(input, output);
    cli::menu::run_menu(&mut session, &mut prompter, &rates, today).await
}

pub async fn run(config_path: Option<&str>) -> Result<()> {
    info!("Expense tracker starting...");
    let config = load_config(config_path)?;

    let stdin = std::io::stdin();
    let today = chrono::Local::now().date_naive();
    run_with_io(&config, stdin.lock(), std::io::stdout(), today).await
}
