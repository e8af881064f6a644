use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::{Instrument, info_span};

/// Counts upstream requests so quota usage shows up in the logs.
#[derive(Debug)]
pub struct RequestMetrics {
    start: Instant,
    count: AtomicU64,
    name: &'static str,
}

impl RequestMetrics {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            start: Instant::now(),
            count: AtomicU64::new(0),
            name,
        })
    }

    pub fn inc(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub async fn log_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        let mut last_total = 0;
        loop {
            let span = info_span!("📊 ", client = self.name);
            async {
                interval.tick().await;
                let total = self.total();
                // Quiet while idle; the bot only fetches a few times a day.
                if total == last_total {
                    return;
                }
                last_total = total;
                let elapsed_hours = self.start.elapsed().as_secs_f64() / 3600.0;
                let avg = if elapsed_hours > 0.0 {
                    total as f64 / elapsed_hours
                } else {
                    0.0
                };
                tracing::info!("{} requests executed (avg {:.2} req/hour)", total, avg);
            }
            .instrument(span)
            .await
        }
    }
}
