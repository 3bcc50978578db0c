//! mclo.gs adapter (paste + insights HTTP API).
//!
//! Implements the `mlb-core` `PasteService` port over `https://api.mclo.gs`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Response};
use serde::Deserialize;
use tracing::debug;

use mlb_core::{
    config::DEFAULT_API_URL,
    errors::Error,
    paste::{Insights, Limits, PasteResult},
    ports::PasteService,
    Result,
};

#[derive(Clone, Debug)]
pub struct McLogsClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct PasteResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    id: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    raw: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InsightsResponse {
    #[serde(flatten)]
    insights: Insights,
    #[serde(default)]
    error: Option<String>,
}

/// `{ "success": false, "error": "Log not found." }`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
}

impl McLogsClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mclogs-bot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            base_url: DEFAULT_API_URL.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/1/{path}", self.base_url)
    }

    fn id_endpoint(&self, prefix: &str, id: &str) -> Result<String> {
        if id.is_empty() || id.contains(['/', '?', '#']) {
            return Err(Error::Service(format!("invalid log id: {id:?}")));
        }
        Ok(self.endpoint(&format!("{prefix}/{id}")))
    }

    async fn post_content(&self, path: &str, content: &str) -> Result<Response> {
        self.http
            .post(self.endpoint(path))
            .form(&[("content", content)])
            .send()
            .await
            .map_err(Error::from_reqwest)
    }

    async fn get(&self, url: &str) -> Result<Response> {
        self.http.get(url).send().await.map_err(Error::from_reqwest)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T> {
    let body = resp.bytes().await.map_err(Error::from_reqwest)?;
    serde_json::from_slice(&body).map_err(|e| Error::Decoding(e.to_string()))
}

/// Turn a JSON `{success:false, error}` body into a `ServiceError`.
async fn service_error(resp: Response) -> Error {
    let status = resp.status();
    match decode::<ErrorEnvelope>(resp).await {
        Ok(ErrorEnvelope { error: Some(msg) }) if !msg.is_empty() => Error::Service(msg),
        Ok(_) => Error::Service(format!("request failed with status {status}")),
        Err(e) => e,
    }
}

/// Shared contract of `/insights/{id}` and `/analyse`.
async fn decode_insights(resp: Response) -> Result<Insights> {
    if !resp.status().is_success() {
        return Err(service_error(resp).await);
    }
    let decoded: InsightsResponse = decode(resp).await?;
    match decoded.error {
        Some(msg) if !msg.is_empty() => Err(Error::Service(msg)),
        _ => Ok(decoded.insights),
    }
}

#[async_trait]
impl PasteService for McLogsClient {
    async fn submit(&self, content: &str) -> Result<PasteResult> {
        let resp = self.post_content("log", content).await?;
        let pr: PasteResponse = decode(resp).await?;
        if !pr.success {
            return Err(Error::Service(
                pr.error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "paste was rejected".to_string()),
            ));
        }
        debug!(id = %pr.id, "paste created");
        Ok(PasteResult {
            id: pr.id,
            url: pr.url,
            raw_url: pr.raw,
        })
    }

    async fn fetch_raw(&self, id: &str) -> Result<String> {
        let resp = self.get(&self.id_endpoint("raw", id)?).await?;

        let is_text = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("text/plain"))
            .unwrap_or(false);
        if !is_text {
            return Err(service_error(resp).await);
        }

        resp.text().await.map_err(Error::from_reqwest)
    }

    async fn fetch_insights(&self, id: &str) -> Result<Insights> {
        let resp = self.get(&self.id_endpoint("insights", id)?).await?;
        decode_insights(resp).await
    }

    async fn analyse(&self, content: &str) -> Result<Insights> {
        let resp = self.post_content("analyse", content).await?;
        decode_insights(resp).await
    }

    async fn fetch_limits(&self) -> Result<Limits> {
        let resp = self.get(&self.endpoint("limits")).await?;
        decode(resp).await
    }
}
