use agrimarket_core::config::Settings;
use agrimarket_core::engine::HISTORY_DAYS;
use agrimarket_core::time::resolve_as_of_date;
use agrimarket_core::MarketService;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "agrimarket")]
struct Args {
    /// Seed for the synthetic price history (overrides MARKET_SERIES_SEED).
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Current price snapshot for every tracked commodity.
    Prices,

    /// Daily price history for one commodity.
    History {
        #[arg(long)]
        commodity: String,

        #[arg(long, default_value_t = HISTORY_DAYS)]
        days: usize,
    },

    /// BUY/SELL/HOLD recommendation for an inventory position.
    Recommend {
        #[arg(long)]
        commodity: String,

        #[arg(long)]
        inventory_tons: f64,

        #[arg(long, default_value_t = 0.0)]
        monthly_storage_cost: f64,

        /// Evaluation date (YYYY-MM-DD). Defaults to today's UTC date.
        #[arg(long)]
        as_of_date: Option<String>,
    },

    /// Market news, optionally for one commodity.
    News {
        #[arg(long)]
        commodity: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if args.seed.is_some() {
        settings.series_seed = args.seed;
    }

    let result = run(&settings, args.command).await;
    match result {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %format!("{err:#}"), "command failed");
            Err(err)
        }
    }
}

async fn run(settings: &Settings, command: Command) -> anyhow::Result<Value> {
    let service = MarketService::from_settings(settings)?;

    let output = match command {
        Command::Prices => serde_json::to_value(service.current_prices().await?)?,
        Command::History { commodity, days } => {
            let series = service
                .historical_prices(&commodity, days)
                .await
                .with_context(|| format!("history for {commodity} failed"))?;
            serde_json::to_value(series)?
        }
        Command::Recommend {
            commodity,
            inventory_tons,
            monthly_storage_cost,
            as_of_date,
        } => {
            let as_of = resolve_as_of_date(as_of_date.as_deref(), chrono::Utc::now())?;
            let result = service
                .market_recommendation_as_of(&commodity, inventory_tons, monthly_storage_cost, as_of)
                .await
                .with_context(|| format!("recommendation for {commodity} failed"))?;
            tracing::info!(
                %as_of,
                commodity = %result.commodity,
                action = %result.action,
                confidence = result.confidence,
                "recommendation ready"
            );
            serde_json::to_value(result)?
        }
        Command::News { commodity } => {
            serde_json::to_value(service.commodity_news(commodity.as_deref()).await)?
        }
    };

    Ok(output)
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
