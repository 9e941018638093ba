//! Contact form submission.
//!
//! DESIGN
//! ======
//! The form posts its fields to a third-party endpoint and reports back
//! through two optional elements: a status line and a success indicator.
//! Submission is split into `begin` (show the interim status) and `finish`
//! (apply the endpoint's verdict) so a caller can render between them while
//! the request is in flight. `ContactClient::submit` runs both around the
//! transport call.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal and nothing is retried. A non-2xx response shows the
//! endpoint's `error` string when it sends one, else a fixed message; a
//! transport failure shows a fixed network message. In both cases the fields
//! are kept so the visitor can try again.

#[cfg(feature = "native")]
pub mod http;

use std::future::Future;

use serde::Deserialize;

use crate::config::ContactConfig;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

/// Errors produced by a form transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    /// Neither the configuration nor the form names an endpoint.
    #[error("no form endpoint configured")]
    MissingEndpoint,

    /// The request could not be sent or the response could not be read.
    #[error("form request failed: {0}")]
    Transport(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

/// Raw endpoint response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends URL-encoded form fields with `Accept: application/json`.
pub trait FormTransport {
    fn post_form(
        &self,
        url: &str,
        fields: &[(String, String)],
    ) -> impl Future<Output = Result<TransportResponse, ContactError>>;
}

// =============================================================================
// FORM STATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
    /// Value restored by a reset.
    pub default_value: String,
}

/// Contact form plus its optional status elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    action: String,
    fields: Vec<FormField>,
    status: Option<String>,
    success_visible: Option<bool>,
}

impl ContactForm {
    /// Form posting to `action` with empty fields named `names`. The status
    /// line and success indicator are absent until added.
    #[must_use]
    pub fn new(action: impl Into<String>, names: &[&str]) -> Self {
        let fields = names
            .iter()
            .map(|name| FormField { name: (*name).to_owned(), value: String::new(), default_value: String::new() })
            .collect();
        Self { action: action.into(), fields, status: None, success_visible: None }
    }

    #[must_use]
    pub fn from_fields(action: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self { action: action.into(), fields, status: None, success_visible: None }
    }

    #[must_use]
    pub fn with_status_line(mut self) -> Self {
        self.status = Some(String::new());
        self
    }

    #[must_use]
    pub fn with_success_indicator(mut self) -> Self {
        self.success_visible = Some(false);
        self
    }

    /// Set a field's value. Returns `false` when no field has that name.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Take the values the visitor entered. Names the form did not know yet
    /// are appended with an empty default.
    pub fn fill(&mut self, entries: Vec<(String, String)>) {
        for (name, value) in entries {
            if !self.set_field(&name, value.clone()) {
                self.fields.push(FormField { name, value, default_value: String::new() });
            }
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }

    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Status line text; `None` when the page has no status element.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Success indicator visibility; `None` when the page has no indicator.
    #[must_use]
    pub fn success_visible(&self) -> Option<bool> {
        self.success_visible
    }

    /// Name/value pairs in document order.
    #[must_use]
    pub fn payload(&self) -> Vec<(String, String)> {
        self.fields.iter().map(|f| (f.name.clone(), f.value.clone())).collect()
    }

    /// Restore every field to its default value.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clone_from(&field.default_value);
        }
    }

    fn set_status(&mut self, text: &str) {
        if let Some(status) = self.status.as_mut() {
            text.clone_into(status);
        }
    }

    fn set_success_visible(&mut self, visible: bool) {
        if let Some(success) = self.success_visible.as_mut() {
            *success = visible;
        }
    }
}

/// CSS selector matching the control named `name`, quoted so any name is a
/// valid selector.
#[must_use]
pub fn field_selector(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    for c in name.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\n' => quoted.push_str("\\a "),
            '\r' => quoted.push_str("\\d "),
            _ => quoted.push(c),
        }
    }
    format!("[name=\"{quoted}\"]")
}

/// Endpoint and fields captured when a submit starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub url: String,
    pub fields: Vec<(String, String)>,
}

// =============================================================================
// OUTCOME
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 2xx: success shown, fields reset.
    Sent,
    /// Non-2xx: `message` shown, fields kept.
    Rejected { status: u16, message: String },
    /// Transport failure: network message shown, fields kept.
    Failed { message: String },
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Message for a non-2xx response: the body's non-empty `error` string, or
/// `fallback` when the body is not JSON or carries no usable error.
#[must_use]
pub fn rejection_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { error: Some(serde_json::Value::String(msg)) }) if !msg.is_empty() => msg,
        _ => fallback.to_owned(),
    }
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug)]
pub struct ContactClient<T> {
    transport: T,
    config: ContactConfig,
}

impl<T: FormTransport> ContactClient<T> {
    pub fn new(transport: T, config: ContactConfig) -> Self {
        Self { transport, config }
    }

    /// Endpoint for `form`: the configured override, else the form action.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingEndpoint`] when both are empty.
    pub fn endpoint<'a>(&'a self, form: &'a ContactForm) -> Result<&'a str, ContactError> {
        let url = self.config.endpoint.as_deref().unwrap_or(form.action());
        if url.trim().is_empty() { Err(ContactError::MissingEndpoint) } else { Ok(url) }
    }

    /// Show the interim status and hide any previous success.
    pub fn begin(&self, form: &mut ContactForm) {
        form.set_status(&self.config.sending_message);
        form.set_success_visible(false);
    }

    /// Snapshot of what a submit of `form` would send.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::MissingEndpoint`] when no endpoint is known.
    pub fn request(&self, form: &ContactForm) -> Result<SubmitRequest, ContactError> {
        Ok(SubmitRequest { url: self.endpoint(form)?.to_owned(), fields: form.payload() })
    }

    /// Post a prepared request. Owns its input, so the form stays free for
    /// edits while the request is in flight.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError`] if the transport fails.
    pub async fn deliver(&self, request: SubmitRequest) -> Result<TransportResponse, ContactError> {
        self.transport.post_form(&request.url, &request.fields).await
    }

    /// Send the form's current fields.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError`] if no endpoint is known or the transport fails.
    pub async fn send(&self, form: &ContactForm) -> Result<TransportResponse, ContactError> {
        self.deliver(self.request(form)?).await
    }

    /// Apply the endpoint's verdict to the form.
    pub fn finish(&self, form: &mut ContactForm, result: Result<TransportResponse, ContactError>) -> SubmitOutcome {
        match result {
            Ok(response) if response.is_success() => {
                form.set_success_visible(true);
                form.set_status("");
                form.reset();
                tracing::info!(status = response.status, "contact form sent");
                SubmitOutcome::Sent
            }
            Ok(response) => {
                let message = rejection_message(&response.body, &self.config.fallback_message);
                form.set_status(&message);
                form.set_success_visible(false);
                tracing::warn!(status = response.status, %message, "contact form rejected");
                SubmitOutcome::Rejected { status: response.status, message }
            }
            Err(e) => {
                let message = self.config.network_message.clone();
                form.set_status(&message);
                form.set_success_visible(false);
                tracing::warn!(error = %e, "contact form request failed");
                SubmitOutcome::Failed { message }
            }
        }
    }

    /// `begin`, `send`, then `finish`.
    pub async fn submit(&self, form: &mut ContactForm) -> SubmitOutcome {
        self.begin(form);
        let result = self.send(form).await;
        self.finish(form, result)
    }

    #[must_use]
    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
