//! Fetch-and-submit pipeline.
//!
//! One inbound message in, at most one reply out:
//! - filter the attachments,
//! - signal "typing" once,
//! - upload every eligible attachment on its own task (download → size check → submit →
//!   insights),
//! - join, assemble and send the reply.
//!
//! A failure in one attachment only drops that attachment.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinSet;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::{
    config::{Config, DEFAULT_MAX_ATTACHMENTS, DEFAULT_MAX_ATTACHMENT_BYTES},
    domain::{Attachment, InboundMessage},
    errors::Error,
    filter::eligible_attachments,
    formatting::render_reply_html,
    messaging::{port::MessagingPort, types::ChatAction},
    ports::{AttachmentFetcher, PasteService},
    reply::{assemble, Branding, Outcome, Reply},
    Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineLimits {
    pub max_attachments: usize,
    pub max_attachment_bytes: u64,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            max_attachments: DEFAULT_MAX_ATTACHMENTS,
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
        }
    }
}

impl From<&Config> for PipelineLimits {
    fn from(cfg: &Config) -> Self {
        Self {
            max_attachments: cfg.max_attachments,
            max_attachment_bytes: cfg.max_attachment_bytes,
        }
    }
}

/// The upload pipeline with its collaborators injected.
///
/// Cheap to clone; every inbound message can be handled on its own task.
#[derive(Clone)]
pub struct Pipeline {
    paste: Arc<dyn PasteService>,
    fetcher: Arc<dyn AttachmentFetcher>,
    messenger: Arc<dyn MessagingPort>,
    limits: PipelineLimits,
    branding: Branding,
}

impl Pipeline {
    pub fn new(
        paste: Arc<dyn PasteService>,
        fetcher: Arc<dyn AttachmentFetcher>,
        messenger: Arc<dyn MessagingPort>,
        limits: PipelineLimits,
        branding: Branding,
    ) -> Self {
        Self {
            paste,
            fetcher,
            messenger,
            limits,
            branding,
        }
    }

    pub fn limits(&self) -> PipelineLimits {
        self.limits
    }

    /// Process one inbound message end to end.
    ///
    /// Returns the reply that was assembled (and handed to the messenger), or `None` when the
    /// message had nothing to upload or every upload failed. Delivery failures are logged only.
    pub async fn handle(&self, msg: InboundMessage) -> Option<Reply> {
        let span = info_span!(
            "message",
            chat_id = msg.chat_id.0,
            message_id = msg.message_id.0,
            author = %msg.author
        );

        async move {
            let eligible = eligible_attachments(&msg.attachments, self.limits.max_attachments);
            if eligible.is_empty() {
                debug!(
                    attachments = msg.attachments.len(),
                    "no eligible attachments"
                );
                return None;
            }

            info!(count = eligible.len(), "uploading attachments");
            if let Err(e) = self
                .messenger
                .send_chat_action(msg.chat_id, ChatAction::Typing)
                .await
            {
                warn!(error = %e, "failed to start typing indicator");
            }

            let outcomes = self.upload_all(eligible).await;
            let reply = assemble(&outcomes, &self.branding, Utc::now())?;

            let html = render_reply_html(&reply);
            match self.messenger.send_html(msg.chat_id, &html).await {
                Ok(_) => info!(fields = reply.fields.len(), "reply sent"),
                Err(e) => warn!(error = %e, "failed to send reply"),
            }
            Some(reply)
        }
        .instrument(span)
        .await
    }

    /// Upload every attachment concurrently and collect the successes, sorted by index.
    pub async fn upload_all(&self, eligible: Vec<Attachment>) -> Vec<Outcome> {
        let mut tasks = JoinSet::new();
        for (index, attachment) in eligible.into_iter().enumerate() {
            let paste = Arc::clone(&self.paste);
            let fetcher = Arc::clone(&self.fetcher);
            let max_bytes = self.limits.max_attachment_bytes;
            let span = info_span!("attachment", index, url = %attachment.url);

            tasks.spawn(
                async move {
                    match upload_attachment(
                        paste.as_ref(),
                        fetcher.as_ref(),
                        max_bytes,
                        index,
                        attachment,
                    )
                    .await
                    {
                        Ok(outcome) => Some(outcome),
                        Err(e) => {
                            warn!(error = %e, "attachment dropped");
                            None
                        }
                    }
                }
                .instrument(span),
            );
        }

        let mut outcomes = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(outcome)) => outcomes.push(outcome),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "upload task failed"),
            }
        }
        outcomes.sort_by_key(|o| o.index);
        outcomes
    }
}

async fn upload_attachment(
    paste: &dyn PasteService,
    fetcher: &dyn AttachmentFetcher,
    max_bytes: u64,
    index: usize,
    attachment: Attachment,
) -> Result<Outcome> {
    if attachment.size > max_bytes {
        return Err(Error::SizeLimitExceeded {
            size: attachment.size,
            limit: max_bytes,
        });
    }

    debug!("downloading attachment");
    let body = fetcher.fetch(&attachment, max_bytes).await?;
    if body.len() as u64 > max_bytes {
        return Err(Error::SizeLimitExceeded {
            size: body.len() as u64,
            limit: max_bytes,
        });
    }

    let content = String::from_utf8_lossy(&body);
    let pasted = paste.submit(&content).await?;
    info!(id = %pasted.id, paste_url = %pasted.url, "log uploaded");

    let insights = match paste.fetch_insights(&pasted.id).await {
        Ok(i) => Some(i),
        Err(e) => {
            warn!(id = %pasted.id, error = %e, "insights unavailable");
            None
        }
    };

    Ok(Outcome {
        index,
        attachment,
        paste: pasted,
        insights,
    })
}
