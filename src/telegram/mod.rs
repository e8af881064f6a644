use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;

pub mod client;
pub mod commands;
pub mod listener;
pub mod types;

pub use client::TelegramClient;
pub use commands::Command;
pub use listener::UpdateListener;
pub use types::{
    ChatId, InlineKeyboardButton, InlineKeyboardMarkup, OutgoingMessage, ParseMode, Payload,
};

/// A way to deliver a message to a chat.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, chat_id: &ChatId, message: OutgoingMessage) -> Result<(), AppError>;
}

#[async_trait]
impl<T: MessageSender + ?Sized> MessageSender for Arc<T> {
    async fn send(&self, chat_id: &ChatId, message: OutgoingMessage) -> Result<(), AppError> {
        (**self).send(chat_id, message).await
    }
}
