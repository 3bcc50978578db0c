//! Recording fakes of the core ports, shared by the handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use teloxide::types::Message;

use mlb_core::{
    config::Config,
    domain::{Attachment, ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ChatAction, MessagingCapabilities},
    },
    paste::{Analysis, Insights, Limits, PasteResult, Problem},
    ports::{AttachmentFetcher, PasteService},
    Result,
};

use crate::router::AppState;

/// Stores submissions by content; analysis always reports one problem.
#[derive(Default)]
pub struct RecordingPaste {
    pub submissions: Mutex<Vec<String>>,
    pub analysed: Mutex<Vec<String>>,
}

#[async_trait]
impl PasteService for RecordingPaste {
    async fn submit(&self, content: &str) -> Result<PasteResult> {
        self.submissions.lock().unwrap().push(content.to_string());
        Ok(PasteResult {
            id: content.to_string(),
            url: format!("https://mclo.gs/{content}"),
            raw_url: format!("https://api.mclo.gs/1/raw/{content}"),
        })
    }

    async fn fetch_raw(&self, _id: &str) -> Result<String> {
        Err(Error::Service("unused".into()))
    }

    async fn fetch_insights(&self, _id: &str) -> Result<Insights> {
        Err(Error::Service("Log not found.".into()))
    }

    async fn analyse(&self, content: &str) -> Result<Insights> {
        self.analysed.lock().unwrap().push(content.to_string());
        Ok(Insights {
            title: "Vanilla 1.20.4 Server Log".to_string(),
            analysis: Analysis {
                problems: vec![Problem {
                    message: "Port 25565 is already in use".to_string(),
                    counter: 1,
                    ..Problem::default()
                }],
                ..Analysis::default()
            },
            ..Insights::default()
        })
    }

    async fn fetch_limits(&self) -> Result<Limits> {
        Ok(Limits {
            storage_time_seconds: 90 * 24 * 60 * 60,
            max_content_length: 10 * 1024 * 1024,
            max_lines: 25_000,
        })
    }
}

/// Serves the file id back as the body.
#[derive(Default)]
pub struct EchoFetcher {
    pub fetched: Mutex<Vec<String>>,
}

#[async_trait]
impl AttachmentFetcher for EchoFetcher {
    async fn fetch(&self, attachment: &Attachment, _max_bytes: u64) -> Result<Vec<u8>> {
        self.fetched.lock().unwrap().push(attachment.url.clone());
        Ok(attachment.url.as_bytes().to_vec())
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    pub sends: Mutex<Vec<String>>,
    pub actions: Mutex<Vec<ChatAction>>,
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: 4096,
        }
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        self.sends.lock().unwrap().push(html.to_string());
        Ok(MessageRef {
            chat_id,
            message_id: MessageId(1),
        })
    }

    async fn send_chat_action(&self, _chat_id: ChatId, action: ChatAction) -> Result<()> {
        self.actions.lock().unwrap().push(action);
        Ok(())
    }
}

pub struct Harness {
    pub state: Arc<AppState>,
    pub paste: Arc<RecordingPaste>,
    pub fetcher: Arc<EchoFetcher>,
    pub messenger: Arc<FakeMessenger>,
}

pub fn harness() -> Harness {
    let cfg = Config::from_lookup(|key| match key {
        "TELEGRAM_BOT_TOKEN" => Some("123:abc".to_string()),
        "MAX_ATTACHMENT_BYTES" => Some("1024".to_string()),
        "MEDIA_GROUP_TIMEOUT" => Some("50".to_string()),
        _ => None,
    })
    .unwrap();

    let paste = Arc::new(RecordingPaste::default());
    let fetcher = Arc::new(EchoFetcher::default());
    let messenger = Arc::new(FakeMessenger::default());
    let state = Arc::new(AppState::new(
        Arc::new(cfg),
        paste.clone(),
        fetcher.clone(),
        messenger.clone(),
    ));

    Harness {
        state,
        paste,
        fetcher,
        messenger,
    }
}

pub fn plain_text(file_id: &str, size: u64) -> Attachment {
    Attachment {
        url: file_id.to_string(),
        file_name: Some(format!("{file_id}.log")),
        content_type: "text/plain".to_string(),
        size,
    }
}

fn base_message(extra: serde_json::Value) -> serde_json::Value {
    let mut msg = serde_json::json!({
        "message_id": 9,
        "date": 1_700_000_000,
        "chat": { "id": 5, "type": "private", "first_name": "Steve" },
        "from": { "id": 5, "is_bot": false, "first_name": "Steve", "username": "steve" }
    });
    if let (Some(obj), Some(extra)) = (msg.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            obj.insert(k.clone(), v.clone());
        }
    }
    msg
}

pub fn text_message(text: &str) -> Message {
    serde_json::from_value(base_message(serde_json::json!({ "text": text }))).unwrap()
}

pub fn document_message(file_id: &str, mime_type: &str, size: u32) -> Message {
    serde_json::from_value(base_message(serde_json::json!({
        "document": document_json(file_id, mime_type, size)
    })))
    .unwrap()
}

/// `/analyse` sent in reply to a document message.
pub fn analyse_reply(file_id: &str, mime_type: &str, size: u32) -> Message {
    let replied = base_message(serde_json::json!({
        "message_id": 8,
        "document": document_json(file_id, mime_type, size)
    }));
    serde_json::from_value(base_message(serde_json::json!({
        "text": "/analyse",
        "reply_to_message": replied
    })))
    .unwrap()
}

pub fn document_json(file_id: &str, mime_type: &str, size: u32) -> serde_json::Value {
    serde_json::json!({
        "file_id": file_id,
        "file_unique_id": format!("u-{file_id}"),
        "file_size": size,
        "file_name": format!("{file_id}.log"),
        "mime_type": mime_type
    })
}
