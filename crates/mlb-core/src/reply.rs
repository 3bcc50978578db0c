//! Reply assembly: many per-attachment outcomes in, at most one outbound message out.

use chrono::{DateTime, Utc};

use crate::{
    domain::Attachment,
    paste::{Insights, PasteResult},
};

/// Title used when the service could not (or did not) name the log.
pub const FALLBACK_TITLE: &str = "Log file";

/// Accent color of the reply card.
pub const ACCENT_COLOR: u32 = 0x2d3943;

pub const API_DOCS_URL: &str = "https://api.mclo.gs/";

/// A successfully uploaded attachment.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Position of the attachment among the eligible ones.
    pub index: usize,
    pub attachment: Attachment,
    pub paste: PasteResult,
    pub insights: Option<Insights>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyField {
    pub title: String,
    pub url: String,
    pub problems: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyAuthor {
    pub name: String,
    pub url: String,
    pub icon_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyLink {
    pub label: String,
    pub url: String,
}

/// Outbound summary message, platform-neutral.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub author: ReplyAuthor,
    pub title: String,
    pub description: String,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<ReplyField>,
    pub links: Vec<ReplyLink>,
}

/// Static branding shown on every reply.
#[derive(Clone, Debug)]
pub struct Branding {
    pub site_url: String,
    pub icon_url: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            site_url: crate::config::DEFAULT_SITE_URL.to_string(),
            icon_url: None,
        }
    }
}

impl ReplyField {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let title = outcome
            .insights
            .as_ref()
            .and_then(|i| i.display_title())
            .map(str::to_string)
            .or_else(|| {
                outcome
                    .attachment
                    .file_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        let problems = outcome
            .insights
            .as_ref()
            .map(|i| i.analysis.problems.len())
            .unwrap_or(0);

        Self {
            title,
            url: outcome.paste.url.clone(),
            problems,
        }
    }
}

/// Build the reply for a message, or `None` when nothing was uploaded.
///
/// Fields follow `Outcome::index`, whatever order the uploads finished in.
pub fn assemble(outcomes: &[Outcome], branding: &Branding, now: DateTime<Utc>) -> Option<Reply> {
    if outcomes.is_empty() {
        return None;
    }

    let mut sorted: Vec<&Outcome> = outcomes.iter().collect();
    sorted.sort_by_key(|o| o.index);
    let fields: Vec<ReplyField> = sorted.into_iter().map(ReplyField::from_outcome).collect();

    let n = fields.len();
    let description = if n == 1 {
        "Your log file was uploaded for easier reading:".to_string()
    } else {
        format!("Your {n} log files were uploaded for easier reading:")
    };

    Some(Reply {
        author: ReplyAuthor {
            name: "mclo.gs".to_string(),
            url: branding.site_url.clone(),
            icon_url: branding.icon_url.clone(),
        },
        title: if n == 1 {
            "Log uploaded".to_string()
        } else {
            format!("{n} logs uploaded")
        },
        description,
        color: ACCENT_COLOR,
        timestamp: now,
        fields,
        links: vec![
            ReplyLink {
                label: "mclo.gs".to_string(),
                url: branding.site_url.clone(),
            },
            ReplyLink {
                label: "API".to_string(),
                url: API_DOCS_URL.to_string(),
            },
        ],
    })
}
