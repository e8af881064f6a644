use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;

pub mod client;
pub mod metrics;
pub mod selector;
pub mod types;

pub use client::FixtureClient;
pub use metrics::RequestMetrics;
pub use selector::{SelectedMatch, select_big_matches};
pub use types::Fixture;

/// Anything able to list the fixtures played on a calendar date.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    async fn fixtures_on(&self, date: NaiveDate) -> Result<Vec<Fixture>, AppError>;
}
