use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, multipart};
use serde::de::DeserializeOwned;
use tracing::trace;

use super::MessageSender;
use super::types::{
    ApiResponse, ChatId, GetUpdatesRequest, InlineKeyboardMarkup, Message, OutgoingMessage,
    ParseMode, Payload, SendMessageRequest, Update,
};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

const ALLOWED_UPDATES: &[&str] = &["message", "channel_post"];

/// Thin Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl TelegramClient {
    pub fn new(token: String, base_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent("BigMatchBot/1.0")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    pub async fn send_text(
        &self,
        chat_id: &ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, AppError> {
        trace!(%chat_id, "✉️ sendMessage");
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
            reply_markup,
        };

        call(self.client.post(self.method_url("sendMessage")).json(&body)).await
    }

    pub async fn send_photo(
        &self,
        chat_id: &ChatId,
        png: Vec<u8>,
        caption: Option<String>,
        parse_mode: Option<ParseMode>,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, AppError> {
        trace!(%chat_id, size = png.len(), "✉️ sendPhoto");
        let photo = multipart::Part::bytes(png)
            .file_name("bigmatch.png")
            .mime_str("image/png")?;

        let mut form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("photo", photo);
        if let Some(caption) = caption {
            form = form.text("caption", caption);
        }
        if let Some(parse_mode) = parse_mode {
            form = form.text("parse_mode", parse_mode.as_str());
        }
        if let Some(markup) = reply_markup {
            form = form.text("reply_markup", serde_json::to_string(markup)?);
        }

        call(self.client.post(self.method_url("sendPhoto")).multipart(form)).await
    }

    /// Long-polls for new updates. Blocks up to `timeout_secs` when idle.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, AppError> {
        let body = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };

        call(
            self.client
                .post(self.method_url("getUpdates"))
                .timeout(Duration::from_secs(timeout_secs + 10))
                .json(&body),
        )
        .await
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send(&self, chat_id: &ChatId, message: OutgoingMessage) -> Result<(), AppError> {
        let OutgoingMessage {
            payload,
            parse_mode,
            reply_markup,
        } = message;

        match payload {
            Payload::Text(text) => {
                self.send_text(chat_id, &text, parse_mode, reply_markup.as_ref())
                    .await?;
            }
            Payload::Photo { png, caption } => {
                self.send_photo(chat_id, png, caption, parse_mode, reply_markup.as_ref())
                    .await?;
            }
        }
        Ok(())
    }
}

/// Sends a Bot API request and unwraps the `{ ok, result }` envelope.
async fn call<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AppError> {
    let res = request.send().await?;
    let status = res.status();
    let bytes = res.bytes().await?;

    match serde_json::from_slice::<ApiResponse<T>>(&bytes) {
        Ok(ApiResponse {
            ok: true,
            result: Some(result),
            ..
        }) => Ok(result),
        Ok(body) => Err(AppError::Telegram {
            code: body.error_code.unwrap_or(i64::from(status.as_u16())),
            description: body
                .description
                .unwrap_or_else(|| "missing result".to_string()),
        }),
        Err(_) => Err(AppError::Telegram {
            code: i64::from(status.as_u16()),
            description: String::from_utf8_lossy(&bytes).into_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::telegram::InlineKeyboardButton;

    fn sent_message() -> serde_json::Value {
        json!({
            "ok": true,
            "result": { "message_id": 10, "chat": { "id": -1001 }, "text": "hi" }
        })
    }

    #[tokio::test]
    async fn send_text_posts_json_with_markup() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/botTOKEN/sendMessage")
                    .json_body(json!({
                        "chat_id": "-1001",
                        "text": "*hi*",
                        "parse_mode": "Markdown",
                        "reply_markup": {
                            "inline_keyboard": [[{ "text": "Go", "url": "https://example.com" }]]
                        }
                    }));
                then.status(200).json_body(sent_message());
            })
            .await;
        let client = TelegramClient::new("TOKEN".into(), server.base_url()).unwrap();
        let message = OutgoingMessage::text("*hi*")
            .markdown()
            .keyboard(InlineKeyboardMarkup {
                inline_keyboard: vec![vec![InlineKeyboardButton::url(
                    "Go",
                    "https://example.com",
                )]],
            });

        client.send(&ChatId::from("-1001"), message).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_photo_uses_multipart_upload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/botTOKEN/sendPhoto")
                    .body_contains("name=\"photo\"")
                    .body_contains("name=\"caption\"")
                    .body_contains("big match");
                then.status(200).json_body(sent_message());
            })
            .await;
        let client = TelegramClient::new("TOKEN".into(), server.base_url()).unwrap();
        let message = OutgoingMessage::photo(b"PNG".to_vec(), Some("big match".into()));

        client.send(&ChatId::from("-1001"), message).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_requests_surface_the_bot_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/botTOKEN/sendMessage");
                then.status(400).json_body(json!({
                    "ok": false,
                    "error_code": 400,
                    "description": "Bad Request: chat not found"
                }));
            })
            .await;
        let client = TelegramClient::new("TOKEN".into(), server.base_url()).unwrap();

        let res = client
            .send(&ChatId::from("-1"), OutgoingMessage::text("hi"))
            .await;

        assert!(matches!(
            res,
            Err(AppError::Telegram { code: 400, ref description }) if description.contains("chat not found")
        ));
    }

    #[tokio::test]
    async fn non_json_gateway_errors_are_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/botTOKEN/sendMessage");
                then.status(502).body("Bad Gateway");
            })
            .await;
        let client = TelegramClient::new("TOKEN".into(), server.base_url()).unwrap();

        let res = client
            .send(&ChatId::from("-1"), OutgoingMessage::text("hi"))
            .await;

        assert!(matches!(res, Err(AppError::Telegram { code: 502, .. })));
    }

    #[tokio::test]
    async fn get_updates_passes_offset_and_timeout() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/botTOKEN/getUpdates")
                    .json_body(json!({
                        "offset": 8,
                        "timeout": 0,
                        "allowed_updates": ["message", "channel_post"]
                    }));
                then.status(200).json_body(json!({
                    "ok": true,
                    "result": [{
                        "update_id": 8,
                        "message": { "message_id": 3, "chat": { "id": 5 }, "text": "/start" }
                    }]
                }));
            })
            .await;
        let client = TelegramClient::new("TOKEN".into(), server.base_url()).unwrap();

        let updates = client.get_updates(Some(8), 0).await.unwrap();

        mock.assert_async().await;
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 8);
    }
}
