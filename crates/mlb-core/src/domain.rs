/// Chat id (numeric, platform-assigned).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Message id (numeric, unique within a chat).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// A file carried on an inbound message.
///
/// `url` is whatever locator the configured [`crate::ports::AttachmentFetcher`] understands:
/// an HTTP(S) URL for [`crate::fetch::HttpFetcher`], a Bot API file id for the Telegram fetcher.
/// `size` is the size declared by the platform, not necessarily what a download yields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub file_name: Option<String>,
    pub content_type: String,
    pub size: u64,
}

/// An inbound message event, already reduced to what the pipeline needs.
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub author: String,
    pub attachments: Vec<Attachment>,
}
