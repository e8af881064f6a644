use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::StatusCode;
use tracing::{debug, trace};

use super::FixtureSource;
use super::metrics::RequestMetrics;
use super::types::{Fixture, FixturesResponse};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";

/// Client for the API-Football `fixtures` endpoint.
pub struct FixtureClient {
    client: reqwest::Client,
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    base_url: String,
    /// API-Sports key
    key: String,
    metrics: Arc<RequestMetrics>,
}

impl FixtureClient {
    pub fn new(
        key: String,
        base_url: String,
        requests_per_minute: NonZeroU32,
        metrics: Arc<RequestMetrics>,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent("BigMatchBot/1.0")
            .build()?;

        Ok(Self {
            client,
            limiter: RateLimiter::direct(Quota::per_minute(requests_per_minute)),
            base_url: base_url.trim_end_matches('/').to_string(),
            key,
            metrics,
        })
    }

    pub async fn get_fixtures_by_date(&self, date: NaiveDate) -> Result<Vec<Fixture>, AppError> {
        let date = date.format("%Y-%m-%d").to_string();
        trace!(date, "⚽ get_fixtures_by_date");

        self.limiter.until_ready().await;
        self.metrics.inc();

        let res = self
            .client
            .get(format!("{}/fixtures", self.base_url))
            .query(&[("date", date.as_str())])
            .header("x-apisports-key", &self.key)
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(AppError::FootballApi {
                status: status.as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }

        let body: FixturesResponse = res.json().await?;
        if let Some(message) = body.error_message() {
            return Err(AppError::FootballApi {
                status: status.as_u16(),
                message,
            });
        }

        debug!(date, count = body.response.len(), "⚽ Fixtures fetched");
        Ok(body.response.into_iter().map(Fixture::from).collect())
    }
}

#[async_trait]
impl FixtureSource for FixtureClient {
    async fn fixtures_on(&self, date: NaiveDate) -> Result<Vec<Fixture>, AppError> {
        self.get_fixtures_by_date(date).await
    }
}
