//! Telegram adapter (teloxide).
//!
//! This crate implements the `mlb-core` ports over the Telegram Bot API:
//! `MessagingPort` for replies and typing indicators, `AttachmentFetcher` for documents.

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use teloxide::{net::Download, prelude::*, types::ParseMode};
use tracing::debug;

pub mod handlers;
pub mod router;
pub mod shutdown;

use mlb_core::{
    domain::{Attachment, ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ChatAction, MessagingCapabilities},
    },
    ports::AttachmentFetcher,
    Result,
};

/// Describe a Bot API failure without the request URL (it carries the bot token).
fn describe(e: teloxide::RequestError) -> String {
    match e {
        teloxide::RequestError::Network(e) => format!("network error: {}", e.without_url()),
        other => other.to_string(),
    }
}

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Messaging(format!("telegram error: {}", describe(e)))
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
        }
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        let msg = self
            .bot
            .send_message(Self::tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .disable_web_page_preview(true)
            .await
            .map_err(Self::map_err)?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        let tg_action = match action {
            ChatAction::Typing => teloxide::types::ChatAction::Typing,
        };
        self.bot
            .send_chat_action(Self::tg_chat(chat_id), tg_action)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

/// Downloads Telegram documents: `getFile` for the file id, then the Bot API file stream.
///
/// `Attachment::url` carries the Bot API `file_id`.
#[derive(Clone)]
pub struct TelegramFetcher {
    bot: Bot,
}

impl TelegramFetcher {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Collect a byte stream, giving up as soon as it grows past `max_bytes`.
async fn read_capped<S, B>(mut stream: S, max_bytes: u64) -> Result<Vec<u8>>
where
    S: Stream<Item = std::result::Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Error::from_reqwest)?;
        body.extend_from_slice(chunk.as_ref());
        if body.len() as u64 > max_bytes {
            return Err(Error::SizeLimitExceeded {
                size: body.len() as u64,
                limit: max_bytes,
            });
        }
    }
    Ok(body)
}

#[async_trait]
impl AttachmentFetcher for TelegramFetcher {
    async fn fetch(&self, attachment: &Attachment, max_bytes: u64) -> Result<Vec<u8>> {
        let file = self
            .bot
            .get_file(attachment.url.clone())
            .await
            .map_err(|e| Error::Transport(format!("telegram getFile failed: {}", describe(e))))?;

        if u64::from(file.meta.size) > max_bytes {
            return Err(Error::SizeLimitExceeded {
                size: u64::from(file.meta.size),
                limit: max_bytes,
            });
        }

        let body = read_capped(self.bot.download_file_stream(&file.path), max_bytes).await?;
        debug!(bytes = body.len(), "telegram download complete");
        Ok(body)
    }
}
