use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{ChatId, Command, MessageSender, OutgoingMessage, TelegramClient};
use crate::dispatcher::{Dispatcher, RequestKind};
use crate::football::FixtureSource;

const START_GREETING: &str = "สวัสดีครับ! ⚽️ Football Bot พร้อมทำงานแล้ว";
const TODAY_ACK: &str = "✅ ส่งเข้า Channel (ไทย) และ Group (ลาว) แล้ว";
const RESULTS_ACK: &str = "✅ ส่งผล Big Match เมื่อคืน เข้า Channel (ไทย) และ Group (ลาว) แล้วครับ";

const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Long-polls `getUpdates` and turns chat commands into broadcasts.
pub struct UpdateListener<F, S> {
    updates: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher<F, S>>,
    poll_timeout_secs: u64,
}

impl<F, S> UpdateListener<F, S>
where
    F: FixtureSource + 'static,
    S: MessageSender + 'static,
{
    pub fn new(
        updates: Arc<TelegramClient>,
        dispatcher: Arc<Dispatcher<F, S>>,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            updates,
            dispatcher,
            poll_timeout_secs,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    pub async fn run(self) {
        info!("🤖 Listening for commands");
        let mut offset: Option<i64> = None;

        loop {
            let updates = match self
                .updates
                .get_updates(offset, self.poll_timeout_secs)
                .await
            {
                Ok(updates) => updates,
                Err(e) => {
                    error!(error = %e, "🤖 ❌ Failed to fetch updates");
                    tokio::time::sleep(ERROR_BACKOFF).await;
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);

                let Some(message) = update.into_message() else {
                    continue;
                };
                let Some(command) = message.text.as_deref().and_then(Command::parse) else {
                    continue;
                };

                let chat_id = ChatId::from(message.chat.id);
                info!(?command, %chat_id, "🤖 Command received");

                let dispatcher = self.dispatcher.clone();
                tokio::spawn(async move {
                    handle_command(&dispatcher, command, &chat_id).await;
                });
            }
        }
    }
}

/// Runs a command to completion, then acknowledges it in the invoking chat.
pub async fn handle_command<F, S>(dispatcher: &Dispatcher<F, S>, command: Command, chat_id: &ChatId)
where
    F: FixtureSource,
    S: MessageSender,
{
    let reply = match command {
        Command::Start => START_GREETING,
        Command::BigMatchToday => {
            let outcomes = dispatcher.broadcast(RequestKind::TodayFixtures).await;
            debug!(?outcomes, "🤖 Today broadcast done");
            TODAY_ACK
        }
        Command::ResultYesterday => {
            let outcomes = dispatcher.broadcast(RequestKind::YesterdayResults).await;
            debug!(?outcomes, "🤖 Results broadcast done");
            RESULTS_ACK
        }
    };

    if let Err(e) = dispatcher
        .sender()
        .send(chat_id, OutgoingMessage::text(reply))
        .await
    {
        warn!(%chat_id, error = %e, "🤖 ⚠️ Failed to reply to command");
    }
}
