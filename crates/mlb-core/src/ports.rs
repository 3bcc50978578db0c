use async_trait::async_trait;

use crate::{
    domain::Attachment,
    paste::{Insights, Limits, PasteResult},
    Result,
};

/// Hexagonal port for the log-hosting / analysis service.
///
/// The mclo.gs HTTP client implements this; tests plug in stubs. Implementations must be
/// safe to call concurrently from several pipeline tasks.
#[async_trait]
pub trait PasteService: Send + Sync {
    /// Store `content` and return where it lives.
    async fn submit(&self, content: &str) -> Result<PasteResult>;

    /// Raw text of a stored paste.
    async fn fetch_raw(&self, id: &str) -> Result<String>;

    /// Analysis of a stored paste.
    async fn fetch_insights(&self, id: &str) -> Result<Insights>;

    /// Analyse `content` without storing it.
    async fn analyse(&self, content: &str) -> Result<Insights>;

    async fn fetch_limits(&self) -> Result<Limits>;
}

/// Downloads attachment bodies.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    /// Fetch the full body of `attachment`.
    ///
    /// Implementations should stop early with `Error::SizeLimitExceeded` once more than
    /// `max_bytes` have been received; callers re-check the length regardless.
    async fn fetch(&self, attachment: &Attachment, max_bytes: u64) -> Result<Vec<u8>>;
}
