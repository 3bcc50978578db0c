//! Plain HTTP attachment downloads.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::{domain::Attachment, errors::Error, ports::AttachmentFetcher, Result};

/// Downloads attachments whose `url` is a plain HTTP(S) URL.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mclogs-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self { http })
    }

    /// GET `url`, reading the body chunk by chunk and giving up once it exceeds `max_bytes`.
    pub async fn fetch_url(&self, url: &str, max_bytes: u64) -> Result<Vec<u8>> {
        let mut resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(Error::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("GET returned {status}")));
        }

        if let Some(len) = resp.content_length() {
            if len > max_bytes {
                return Err(Error::SizeLimitExceeded {
                    size: len,
                    limit: max_bytes,
                });
            }
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(Error::from_reqwest)? {
            body.extend_from_slice(&chunk);
            if body.len() as u64 > max_bytes {
                return Err(Error::SizeLimitExceeded {
                    size: body.len() as u64,
                    limit: max_bytes,
                });
            }
        }

        debug!(bytes = body.len(), "download complete");
        Ok(body)
    }
}

#[async_trait]
impl AttachmentFetcher for HttpFetcher {
    async fn fetch(&self, attachment: &Attachment, max_bytes: u64) -> Result<Vec<u8>> {
        self.fetch_url(&attachment.url, max_bytes).await
    }
}
