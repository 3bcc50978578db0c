use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.mclo.gs";
pub const DEFAULT_SITE_URL: &str = "https://mclo.gs/";
pub const DEFAULT_MAX_ATTACHMENTS: usize = 5;
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024; // 10MiB
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Typed configuration for the bot, read from the environment (and `.env`, if present).
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,

    // Paste service
    pub mclogs_api_url: String,
    pub mclogs_site_url: String,
    pub http_timeout: Duration,

    // Attachment policy
    pub max_attachments: usize,
    pub max_attachment_bytes: u64,

    // Media groups
    pub media_group_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let mclogs_api_url = lookup("MCLOGS_API_URL")
            .and_then(non_empty)
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mclogs_site_url = lookup("MCLOGS_SITE_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());

        let http_timeout = parse_u64(lookup("HTTP_TIMEOUT_MS"))
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);

        let max_attachments = parse_u64(lookup("MAX_ATTACHMENTS"))
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_MAX_ATTACHMENTS);
        let max_attachment_bytes =
            parse_u64(lookup("MAX_ATTACHMENT_BYTES")).unwrap_or(DEFAULT_MAX_ATTACHMENT_BYTES);

        let media_group_timeout =
            Duration::from_millis(parse_u64(lookup("MEDIA_GROUP_TIMEOUT")).unwrap_or(1000));

        Ok(Self {
            telegram_bot_token,
            mclogs_api_url,
            mclogs_site_url,
            http_timeout,
            max_attachments,
            max_attachment_bytes,
            media_group_timeout,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_u64(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
