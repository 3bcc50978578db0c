use std::sync::Arc;

use teloxide::prelude::*;
use tracing::warn;

use mlb_core::{
    domain::ChatId,
    errors::Error,
    filter::is_plain_text,
    formatting::{escape_html, render_insights_html, render_limits_html},
    messaging::types::ChatAction,
    Result,
};

use crate::router::AppState;

use super::{author_of, document::attachment_from_document};

const HELP: &str = "📄 <b>mclo.gs upload bot</b>\n\n\
Send one or more <code>.txt</code> / <code>.log</code> files (plain text, up to 5 at once) \
and I'll upload them to mclo.gs and reply with the links and any detected problems.\n\n\
<b>Commands</b>\n\
/analyse - reply to a log file to analyse it without uploading\n\
/limits - show mclo.gs storage limits\n\
/help - this message";

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

async fn send(state: &AppState, chat_id: ChatId, html: &str) {
    if let Err(e) = state.messenger.send_html(chat_id, html).await {
        warn!(chat_id = chat_id.0, error = %e, "failed to send command reply");
    }
}

pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let text = msg.text().unwrap_or("");
    let (cmd, _args) = parse_command(text);
    let chat_id = ChatId(msg.chat.id.0);

    match cmd.as_str() {
        "start" | "help" => {
            send(&state, chat_id, HELP).await;
        }

        "limits" => {
            let html = match state.paste.fetch_limits().await {
                Ok(limits) => render_limits_html(&limits),
                Err(e) => {
                    warn!(chat_id = chat_id.0, error = %e, "limits lookup failed");
                    format!("❌ Could not fetch limits: {}", escape_html(&e.to_string()))
                }
            };
            send(&state, chat_id, &html).await;
        }

        "analyse" | "analyze" => {
            let Some(doc) = msg.reply_to_message().and_then(|m| m.document()) else {
                send(
                    &state,
                    chat_id,
                    "Reply to a message with a log file to analyse it.",
                )
                .await;
                return Ok(());
            };

            let attachment = attachment_from_document(doc);
            let author = author_of(&msg);
            let state = state.clone();
            // Analysis can take a while; don't hold up this chat's update queue.
            tokio::spawn(async move {
                let html = match analyse_attachment(&state, chat_id, attachment).await {
                    Ok(html) => html,
                    Err(e) => {
                        warn!(chat_id = chat_id.0, author = %author, error = %e, "analysis failed");
                        format!("❌ Analysis failed: {}", escape_html(&e.to_string()))
                    }
                };
                send(&state, chat_id, &html).await;
            });
        }

        _ => {}
    }

    Ok(())
}

async fn analyse_attachment(
    state: &AppState,
    chat_id: ChatId,
    attachment: mlb_core::domain::Attachment,
) -> Result<String> {
    if !is_plain_text(&attachment.content_type) {
        return Err(Error::Service("only plain-text files can be analysed".into()));
    }

    let limit = state.pipeline.limits().max_attachment_bytes;
    if attachment.size > limit {
        return Err(Error::SizeLimitExceeded {
            size: attachment.size,
            limit,
        });
    }

    if let Err(e) = state
        .messenger
        .send_chat_action(chat_id, ChatAction::Typing)
        .await
    {
        warn!(chat_id = chat_id.0, error = %e, "failed to send typing indicator");
    }

    let body = state.fetcher.fetch(&attachment, limit).await?;
    if body.len() as u64 > limit {
        return Err(Error::SizeLimitExceeded {
            size: body.len() as u64,
            limit,
        });
    }

    let insights = state.paste.analyse(&String::from_utf8_lossy(&body)).await?;
    Ok(render_insights_html(
        &insights,
        state.messenger.capabilities().max_message_len,
    ))
}
