use crate::domain::Attachment;

/// Content type prefix of attachments the bot uploads.
pub const TEXT_PLAIN: &str = "text/plain";

/// Select the attachments worth uploading.
///
/// The whole message is rejected (empty result) when it carries no attachments or more than
/// `max_count`; otherwise only `text/plain` attachments survive, in source order.
pub fn eligible_attachments(attachments: &[Attachment], max_count: usize) -> Vec<Attachment> {
    if attachments.is_empty() || attachments.len() > max_count {
        return Vec::new();
    }
    attachments
        .iter()
        .filter(|a| is_plain_text(&a.content_type))
        .cloned()
        .collect()
}

/// `text/plain`, optionally with parameters (`text/plain; charset=utf-8`).
pub fn is_plain_text(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..TEXT_PLAIN.len())
        .map(|p| p.eq_ignore_ascii_case(TEXT_PLAIN))
        .unwrap_or(false)
}
