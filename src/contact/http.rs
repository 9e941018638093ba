//! `reqwest` form transport.

use std::time::Duration;

use reqwest::header::ACCEPT;

use super::{ContactError, FormTransport, TransportResponse};
use crate::config::ContactTimeouts;

pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`ContactError::HttpClientBuild`] if the client cannot be built.
    pub fn new(timeouts: ContactTimeouts) -> Result<Self, ContactError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ContactError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

impl FormTransport for ReqwestTransport {
    async fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<TransportResponse, ContactError> {
        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .form(fields)
            .send()
            .await
            .map_err(|e| ContactError::Transport(e.to_string()))?;

        let status = response.status();
        // A 2xx verdict stands even when its body cannot be read.
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                tracing::debug!(error = %e, status = status.as_u16(), "accepted response body unreadable");
                String::new()
            }
            Err(e) => return Err(ContactError::Transport(e.to_string())),
        };
        let status = status.as_u16();

        Ok(TransportResponse { status, body })
    }
}
