use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use mlb_core::{
    domain::{Attachment, ChatId, InboundMessage, MessageId},
    pipeline::Pipeline,
};

/// Who sent an album, and where. Taken from the first document of the album.
#[derive(Clone, Debug)]
pub struct MessageMeta {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub author: String,
}

struct PendingGroup {
    meta: MessageMeta,
    attachments: Vec<Attachment>,
    cancel: CancellationToken,
}

/// Collects the documents of a Telegram album and runs the pipeline once the album has been
/// quiet for the configured timeout.
pub struct MediaGroupBuffer {
    pipeline: Pipeline,
    pending: tokio::sync::Mutex<HashMap<String, PendingGroup>>,
}

impl MediaGroupBuffer {
    pub fn new(pipeline: Pipeline) -> Arc<Self> {
        Arc::new(Self {
            pipeline,
            pending: tokio::sync::Mutex::new(HashMap::new()),
        })
    }

    pub async fn add_to_group(
        self: &Arc<Self>,
        media_group_id: String,
        meta: MessageMeta,
        attachment: Attachment,
        timeout: Duration,
    ) {
        let cancel = CancellationToken::new();

        let mut map = self.pending.lock().await;
        match map.get_mut(&media_group_id) {
            // Existing group: push and reset timeout.
            Some(group) => {
                group.attachments.push(attachment);
                group.cancel.cancel();
                group.cancel = cancel.clone();
            }
            None => {
                map.insert(
                    media_group_id.clone(),
                    PendingGroup {
                        meta,
                        attachments: vec![attachment],
                        cancel: cancel.clone(),
                    },
                );
            }
        }
        drop(map);

        self.spawn_timer(media_group_id, cancel, timeout);
    }

    pub async fn pending_groups(&self) -> usize {
        self.pending.lock().await.len()
    }

    fn spawn_timer(
        self: &Arc<Self>,
        media_group_id: String,
        cancel: CancellationToken,
        timeout: Duration,
    ) {
        let buffer = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
              _ = cancel.cancelled() => {}
              _ = tokio::time::sleep(timeout) => {
                buffer.process_group(&media_group_id).await;
              }
            }
        });
    }

    async fn process_group(&self, media_group_id: &str) {
        let group = {
            let mut map = self.pending.lock().await;
            map.remove(media_group_id)
        };

        let Some(group) = group else {
            return;
        };

        debug!(
            media_group_id,
            documents = group.attachments.len(),
            "album complete"
        );

        let msg = InboundMessage {
            chat_id: group.meta.chat_id,
            message_id: group.meta.message_id,
            author: group.meta.author,
            attachments: group.attachments,
        };
        self.pipeline.handle(msg).await;
    }
}
