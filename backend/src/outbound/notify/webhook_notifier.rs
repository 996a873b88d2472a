//! Reqwest-backed notification topic adapter.
//!
//! Owns transport details only: JSON serialisation of the notice, request
//! timeout and HTTP error mapping.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{Notifier, NotifierError};

const USER_AGENT: &str = concat!("bloodbridge/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct NoticePayload<'a> {
    subject: &'a str,
    message: &'a str,
}

/// Publishes notices by POSTing `{"subject", "message"}` to one endpoint.
pub struct WebhookNotifier {
    client: Client,
    endpoint: Url,
}

impl WebhookNotifier {
    /// Build a notifier whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, subject: &str, message: &str) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&NoticePayload { subject, message })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> NotifierError {
    if error.is_timeout() {
        NotifierError::delivery(format!("timed out: {error}"))
    } else {
        NotifierError::delivery(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> NotifierError {
    NotifierError::rejected(status.as_u16(), body_preview(body))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
