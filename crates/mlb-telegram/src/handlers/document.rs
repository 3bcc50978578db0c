use std::sync::Arc;

use teloxide::{prelude::*, types::Document};
use tracing::debug;

use mlb_core::domain::{Attachment, ChatId, InboundMessage, MessageId};

use crate::router::AppState;

use super::{author_of, media_group::MessageMeta};

/// Reduce a Telegram document to a pipeline attachment (`url` = Bot API file id).
pub(crate) fn attachment_from_document(doc: &Document) -> Attachment {
    Attachment {
        url: doc.file.id.clone(),
        file_name: doc.file_name.clone(),
        content_type: doc
            .mime_type
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_default(),
        size: doc.file.size as u64,
    }
}

pub async fn handle_document(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(doc) = msg.document() else {
        return Ok(());
    };

    let attachment = attachment_from_document(doc);
    let meta = MessageMeta {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
        author: author_of(&msg),
    };

    // Albums arrive as one update per document: buffer them into a single message.
    if let Some(group_id) = msg.media_group_id() {
        debug!(media_group_id = group_id, "buffering album document");
        state
            .media_groups
            .add_to_group(
                group_id.to_string(),
                meta,
                attachment,
                state.cfg.media_group_timeout,
            )
            .await;
        return Ok(());
    }

    let inbound = InboundMessage {
        chat_id: meta.chat_id,
        message_id: meta.message_id,
        author: meta.author,
        attachments: vec![attachment],
    };

    // Uploads can take a while; don't hold up this chat's update queue.
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        pipeline.handle(inbound).await;
    });

    Ok(())
}
