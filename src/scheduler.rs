//! Fires broadcasts at fixed wall-clock times in the broadcast time zone.

use std::sync::Arc;

use chrono::{DateTime, Days, LocalResult, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::dispatcher::{Dispatcher, RequestKind};
use crate::football::FixtureSource;
use crate::telegram::MessageSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTrigger {
    pub at: NaiveTime,
    pub kind: RequestKind,
}

/// Next instant strictly after `now` whose wall-clock time in `tz` is `at`.
///
/// A time skipped by a DST jump moves to the following day; an ambiguous one
/// takes its earlier occurrence.
pub fn next_fire(now: DateTime<Utc>, at: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let today = now.with_timezone(&tz).date_naive();

    for offset in 0..3 {
        let Some(day) = today.checked_add_days(Days::new(offset)) else {
            break;
        };
        let candidate = match tz.from_local_datetime(&day.and_time(at)) {
            LocalResult::Single(t) => t,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => continue,
        };
        let candidate = candidate.with_timezone(&Utc);
        if candidate > now {
            return candidate;
        }
    }

    now + chrono::Duration::days(1)
}

pub fn spawn<F, S>(dispatcher: Arc<Dispatcher<F, S>>, trigger: DailyTrigger, tz: Tz) -> JoinHandle<()>
where
    F: FixtureSource + 'static,
    S: MessageSender + 'static,
{
    tokio::spawn(async move {
        info!(at = %trigger.at, kind = %trigger.kind, %tz, "⏰ Daily broadcast scheduled");

        loop {
            let now = Utc::now();
            let fire_at = next_fire(now, trigger.at, tz);
            let wait = match (fire_at - now).to_std() {
                Ok(wait) => wait,
                Err(e) => {
                    warn!(error = %e, "⏰ ⚠️ Negative wait, firing now");
                    std::time::Duration::ZERO
                }
            };
            info!(%fire_at, kind = %trigger.kind, "⏰ Next broadcast");

            tokio::time::sleep(wait).await;
            let outcomes = dispatcher.broadcast(trigger.kind).await;
            info!(kind = %trigger.kind, ?outcomes, "⏰ ✅ Scheduled broadcast done");
        }
    })
}
