//! Turns a selection of matches into something a chat can display.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::AppError;
use crate::football::SelectedMatch;
use crate::locale::Locale;
use crate::telegram::OutgoingMessage;

pub mod image;
pub mod text;

pub use image::ImageGenerator;
pub use text::render_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardFormat {
    #[default]
    Text,
    Image,
}

impl FromStr for CardFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            other => Err(AppError::Config(format!(
                "unknown card format '{other}', expected 'text' or 'image'"
            ))),
        }
    }
}

impl fmt::Display for CardFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// Everything a renderer needs for one card.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub matches: &'a [SelectedMatch],
    pub title: &'a str,
    pub locale: Locale,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Text(String),
    Image { png: Vec<u8>, caption: String },
}

impl Card {
    pub fn into_message(self) -> OutgoingMessage {
        match self {
            Card::Text(text) => OutgoingMessage::text(text).markdown(),
            Card::Image { png, caption } => OutgoingMessage::photo(png, Some(caption)),
        }
    }
}

/// The configured card renderer; chosen once at startup.
#[derive(Clone)]
pub enum CardRenderer {
    Text,
    Image(Arc<ImageGenerator>),
}

impl CardRenderer {
    pub fn format(&self) -> CardFormat {
        match self {
            CardRenderer::Text => CardFormat::Text,
            CardRenderer::Image(_) => CardFormat::Image,
        }
    }

    pub async fn render(&self, request: &RenderRequest<'_>) -> Result<Card, AppError> {
        match self {
            CardRenderer::Text => Ok(Card::Text(render_text(request))),
            CardRenderer::Image(generator) => {
                let png = generator.generate_card(request).await?;
                Ok(Card::Image {
                    png,
                    caption: request.title.to_string(),
                })
            }
        }
    }
}
