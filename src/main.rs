use std::sync::Arc;

use tracing::{error, info};

use card::{CardFormat, CardRenderer, ImageGenerator};
use config::Config;
use dispatcher::{Dispatcher, RequestKind};
use error::AppError;
use football::{FixtureClient, RequestMetrics};
use scheduler::DailyTrigger;
use telegram::{TelegramClient, UpdateListener};

mod card;
mod config;
mod db;
mod dispatcher;
mod error;
mod football;
mod health;
mod locale;
mod logging;
mod scheduler;
mod telegram;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    logging::init();
    info!("⚽ Starting Big Match bot...");

    let config = Config::from_env()?;

    // The store is optional at runtime; a failure is only reported.
    let _pool = match db::connect(&config.database_url).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            error!(error = %e, "🗄️ ❌ Database connection failed");
            None
        }
    };

    let metrics = RequestMetrics::new("api-football");
    tokio::spawn(metrics.clone().log_loop());

    let fixtures = FixtureClient::new(
        config.football_api_key.clone(),
        config.football_api_base_url.clone(),
        config.football_rate_limit_per_minute,
        metrics,
    )?;

    let telegram = Arc::new(TelegramClient::new(
        config.bot_token.clone(),
        config.telegram_api_base_url.clone(),
    )?);

    let renderer = match config.card_format {
        CardFormat::Text => CardRenderer::Text,
        CardFormat::Image => {
            CardRenderer::Image(Arc::new(ImageGenerator::new(config.font_dir.as_deref())?))
        }
    };
    info!(format = %renderer.format(), "🖼️ Card renderer ready");

    let dispatcher = Arc::new(Dispatcher::new(
        fixtures,
        telegram.clone(),
        renderer,
        config.destinations(),
        config.broadcast_timezone,
    ));

    scheduler::spawn(
        dispatcher.clone(),
        DailyTrigger {
            at: config.today_broadcast_at,
            kind: RequestKind::TodayFixtures,
        },
        config.broadcast_timezone,
    );
    scheduler::spawn(
        dispatcher.clone(),
        DailyTrigger {
            at: config.results_broadcast_at,
            kind: RequestKind::YesterdayResults,
        },
        config.broadcast_timezone,
    );

    UpdateListener::new(telegram, dispatcher, config.update_poll_timeout_secs).spawn();

    tokio::select! {
        res = health::serve(config.port) => res?,
        _ = tokio::signal::ctrl_c() => info!("👋 Shutting down"),
    }

    Ok(())
}
