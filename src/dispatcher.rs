//! Runs the fetch → select → render → send pipeline for one or all chats.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use futures::future::join_all;
use tracing::{error, info, instrument, warn};

use crate::card::{CardRenderer, RenderRequest};
use crate::error::AppError;
use crate::football::{FixtureSource, select_big_matches};
use crate::locale::Locale;
use crate::telegram::{ChatId, MessageSender, OutgoingMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    TodayFixtures,
    YesterdayResults,
}

impl RequestKind {
    /// The calendar date whose fixtures this request is about.
    pub fn target_date(self, today: NaiveDate) -> NaiveDate {
        match self {
            RequestKind::TodayFixtures => today,
            RequestKind::YesterdayResults => today.pred_opt().unwrap_or(today),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::TodayFixtures => f.write_str("today"),
            RequestKind::YesterdayResults => f.write_str("yesterday"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub chat_id: ChatId,
    pub locale: Locale,
}

impl Destination {
    pub fn new(chat_id: ChatId, lao_group_id: &ChatId) -> Self {
        let locale = Locale::for_chat(&chat_id, lao_group_id);
        Self { chat_id, locale }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// A card with the inline keyboard was sent.
    Delivered,
    /// Nothing passed the selector; the "no big match" notice was sent.
    NoMatches,
    /// Something failed; the "could not fetch" notice was attempted.
    Failed,
}

pub struct Dispatcher<F, S> {
    fixtures: F,
    sender: S,
    renderer: CardRenderer,
    destinations: Vec<Destination>,
    time_zone: Tz,
}

impl<F, S> Dispatcher<F, S>
where
    F: FixtureSource,
    S: MessageSender,
{
    pub fn new(
        fixtures: F,
        sender: S,
        renderer: CardRenderer,
        destinations: Vec<Destination>,
        time_zone: Tz,
    ) -> Self {
        Self {
            fixtures,
            sender,
            renderer,
            destinations,
            time_zone,
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Delivers to every destination concurrently; one outcome per destination,
    /// in configuration order.
    pub async fn broadcast(&self, kind: RequestKind) -> Vec<DeliveryOutcome> {
        info!(%kind, destinations = self.destinations.len(), "📣 Broadcasting");

        join_all(
            self.destinations
                .iter()
                .map(|destination| self.deliver(destination, kind)),
        )
        .await
    }

    pub async fn deliver(&self, destination: &Destination, kind: RequestKind) -> DeliveryOutcome {
        self.deliver_at(destination, kind, Utc::now()).await
    }

    /// Never fails: errors are logged and turned into the locale's notice.
    #[instrument(skip(self, destination, now), fields(chat_id = %destination.chat_id, locale = %destination.locale))]
    pub async fn deliver_at(
        &self,
        destination: &Destination,
        kind: RequestKind,
        now: DateTime<Utc>,
    ) -> DeliveryOutcome {
        match self.try_deliver(destination, kind, now).await {
            Ok(outcome) => {
                info!(?outcome, "📣 ✅ Delivery finished");
                outcome
            }
            Err(e) => {
                error!(error = %e, "📣 ❌ Delivery failed");
                let notice = OutgoingMessage::text(destination.locale.strings().fetch_failed);
                if let Err(e) = self.sender.send(&destination.chat_id, notice).await {
                    warn!(error = %e, "📣 ⚠️ Failed to send error notice");
                }
                DeliveryOutcome::Failed
            }
        }
    }

    async fn try_deliver(
        &self,
        destination: &Destination,
        kind: RequestKind,
        now: DateTime<Utc>,
    ) -> Result<DeliveryOutcome, AppError> {
        let locale = destination.locale;
        let today = now.with_timezone(&self.time_zone).date_naive();
        let date = kind.target_date(today);

        let fixtures = self.fixtures.fixtures_on(date).await?;
        let fixture_count = fixtures.len();
        let matches = select_big_matches(fixtures);
        info!(%date, fixture_count, selected = matches.len(), "⚽ Fixtures selected");

        if matches.is_empty() {
            let notice = OutgoingMessage::text(locale.strings().no_big_match);
            self.sender.send(&destination.chat_id, notice).await?;
            return Ok(DeliveryOutcome::NoMatches);
        }

        let request = RenderRequest {
            matches: &matches,
            title: locale.title(kind),
            locale,
            date: today,
        };
        let card = self.renderer.render(&request).await?;
        let message = card.into_message().keyboard(locale.keyboard());
        self.sender.send(&destination.chat_id, message).await?;

        Ok(DeliveryOutcome::Delivered)
    }
}
