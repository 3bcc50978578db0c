//! Telegram update handlers.
//!
//! Each handler is a small adapter that turns a Telegram message into `mlb-core` types and hands
//! it to the upload pipeline (documents) or answers it directly (commands).

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use crate::router::AppState;

mod commands;
mod document;
pub mod media_group;
#[cfg(test)]
mod test_support;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return commands::handle_command(msg, state).await;
        }
        return Ok(());
    }

    if msg.document().is_some() {
        return document::handle_document(msg, state).await;
    }

    Ok(())
}

/// How the author is named in logs: `@username`, else the first name.
pub(crate) fn display_author(username: Option<&str>, first_name: Option<&str>) -> String {
    if let Some(u) = username.filter(|u| !u.is_empty()) {
        return format!("@{u}");
    }
    first_name
        .filter(|n| !n.trim().is_empty())
        .map(|n| n.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub(crate) fn author_of(msg: &Message) -> String {
    let user = msg.from();
    display_author(
        user.and_then(|u| u.username.as_deref()),
        user.map(|u| u.first_name.as_str()),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use super::test_support::{document_message, harness, text_message};

    #[test]
    fn author_prefers_username() {
        assert_eq!(display_author(Some("steve"), Some("Steve")), "@steve");
        assert_eq!(display_author(Some(""), Some("Alex ")), "Alex");
        assert_eq!(display_author(None, None), "unknown");
        assert_eq!(display_author(None, Some("  ")), "unknown");
    }

    #[tokio::test]
    async fn plain_text_is_ignored() {
        let h = harness();

        handle_message(text_message("hello there"), h.state.clone())
            .await
            .unwrap();

        assert!(h.messenger.sends.lock().unwrap().is_empty());
        assert!(h.messenger.actions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn commands_are_answered() {
        let h = harness();

        handle_message(text_message("/help"), h.state.clone())
            .await
            .unwrap();

        let sends = h.messenger.sends.lock().unwrap();
        assert_eq!(sends.len(), 1);
        assert!(sends[0].contains("/analyse"));
    }

    #[tokio::test]
    async fn documents_go_through_the_upload_pipeline() {
        let h = harness();

        handle_message(document_message("latest", "text/plain", 10), h.state.clone())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(*h.paste.submissions.lock().unwrap(), vec!["latest"]);
        let sends = h.messenger.sends.lock().unwrap();
        assert_eq!(sends.len(), 1);
        assert!(sends[0].contains("https://mclo.gs/latest"));
    }

    #[tokio::test]
    async fn non_text_documents_are_not_uploaded() {
        let h = harness();

        handle_message(document_message("world", "application/zip", 10), h.state.clone())
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(h.fetcher.fetched.lock().unwrap().is_empty());
        assert!(h.messenger.sends.lock().unwrap().is_empty());
    }
}
