//! Tailoring client. Forwards a job description and a résumé URL to the external
//! AI webhook and hands back whatever it returns.
//!
//! `tailor` expects JSON back (optionally wrapped in a markdown code fence).
//! `match_resume` expects free text that `match_report` knows how to split.
//! Failed calls are not retried.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod handlers;
pub mod match_report;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum TailorError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Webhook returned an empty response")]
    EmptyResponse,

    #[error("Webhook returned invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Body for the tailoring webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailorRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub file_url: String,
}

/// Body for the match/outreach webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub resume_link: String,
}

impl TailorRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_inputs(&self.job_description, &self.file_url)
    }
}

impl MatchRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_inputs(&self.job_description, &self.resume_link)
    }
}

fn validate_inputs(job_description: &str, url: &str) -> Result<(), String> {
    if job_description.trim().is_empty() || url.trim().is_empty() {
        return Err("Please provide both a job description and a resume URL".to_string());
    }
    let url = url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err("Please provide a valid URL starting with http:// or https://".to_string());
    }
    Ok(())
}

/// Seam between the HTTP handlers and the external webhook.
#[async_trait]
pub trait TailoringService: Send + Sync {
    /// Returns the tailored résumé JSON.
    async fn tailor(&self, request: &TailorRequest) -> Result<Value, TailorError>;

    /// Returns the raw match report text.
    async fn match_resume(&self, request: &MatchRequest) -> Result<String, TailorError>;
}

/// `TailoringService` backed by two webhook URLs. Either may be absent; calls to an
/// absent one fail with `NotConfigured`.
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    tailor_url: Option<String>,
    match_url: Option<String>,
}

impl WebhookClient {
    pub fn new(
        tailor_url: Option<String>,
        match_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TailorError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            tailor_url,
            match_url,
        })
    }

    async fn post_text<B: Serialize + Sync>(&self, url: &str, body: &B) -> Result<String, TailorError> {
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Webhook returned {}: {}", status, body);
            return Err(TailorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Err(TailorError::EmptyResponse);
        }
        debug!("Webhook call succeeded: {} bytes", text.len());
        Ok(text)
    }
}

#[async_trait]
impl TailoringService for WebhookClient {
    async fn tailor(&self, request: &TailorRequest) -> Result<Value, TailorError> {
        let url = self
            .tailor_url
            .as_deref()
            .ok_or(TailorError::NotConfigured("TAILOR_WEBHOOK_URL"))?;
        let text = self.post_text(url, request).await?;
        Ok(serde_json::from_str(strip_json_fences(&text))?)
    }

    async fn match_resume(&self, request: &MatchRequest) -> Result<String, TailorError> {
        let url = self
            .match_url
            .as_deref()
            .ok_or(TailorError::NotConfigured("MATCH_WEBHOOK_URL"))?;
        self.post_text(url, request).await
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from webhook output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
