use std::time::Duration;

use thiserror::Error;

use crate::config::TransportConfig;
use crate::multipart::PhotoForm;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response: {0}")]
    Read(String),
}

/// Delivery seam for the controller; mockable in tests. `Ok(true)` means the
/// service acknowledged the alert, `Ok(false)` means it answered with a
/// non-success body, `Err` means the attempt never completed.
pub trait AlertTransport: Send {
    fn send(&self, caption: &str, recipient: &str, image: &[u8]) -> Result<bool, TransportError>;
}

impl AlertTransport for Box<dyn AlertTransport> {
    fn send(&self, caption: &str, recipient: &str, image: &[u8]) -> Result<bool, TransportError> {
        (**self).send(caption, recipient, image)
    }
}

/// Success iff the body contains the literal `"ok":true`. A well-formed
/// JSON error object is a failure like any other content.
pub fn is_success_body(body: &str) -> bool {
    body.contains("\"ok\":true")
}

/// Best-effort extraction of the service's error description, for the log
/// line only - never for the success decision.
pub fn error_description(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("description").and_then(|d| d.as_str()).map(str::to_owned))
}

/// Telegram `sendPhoto` over TLS. The multipart body is assembled by hand
/// (`PhotoForm`) and posted as a single outbound stream with an exact
/// Content-Length; no chunked transfer.
pub struct TelegramNotifier {
    client: reqwest::blocking::Client,
    send_photo_url: String,
}

impl TelegramNotifier {
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        if config.insecure_tls {
            tracing::warn!(
                "TLS certificate validation is DISABLED (insecure_tls = true); \
                 the transport will accept any certificate"
            );
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.response_timeout_secs))
            .danger_accept_invalid_certs(config.insecure_tls)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            send_photo_url: format!(
                "https://{}/bot{}/sendPhoto",
                config.api_host, config.bot_token
            ),
        })
    }
}

impl AlertTransport for TelegramNotifier {
    fn send(&self, caption: &str, recipient: &str, image: &[u8]) -> Result<bool, TransportError> {
        let form = PhotoForm::new(recipient, caption);
        let body = form.encode(image);
        debug_assert_eq!(body.len(), form.content_length(image.len()));

        tracing::debug!(content_length = body.len(), "Posting alert photo");

        // Error strings are stripped of the URL: it embeds the bot token.
        let response = self
            .client
            .post(&self.send_photo_url)
            .header(reqwest::header::CONTENT_TYPE, form.content_type())
            .body(body)
            .send()
            .map_err(|e| TransportError::Request(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| TransportError::Read(e.without_url().to_string()))?;

        let ok = is_success_body(&text);
        if ok {
            tracing::info!("Notification service acknowledged the alert");
        } else {
            tracing::warn!(
                status = %status,
                description = error_description(&text).as_deref().unwrap_or("<none>"),
                "Notification service rejected the alert"
            );
        }
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_is_the_literal_ok_true() {
        assert!(is_success_body(
            r#"{"ok":true,"result":{"message_id":77}}"#
        ));
        assert!(!is_success_body(
            r#"{"ok":false,"description":"Bad Request: chat not found"}"#
        ));
    }

    #[test]
    fn whitespace_variants_do_not_count_as_success() {
        // The check is a literal substring, so a pretty-printed body is
        // (correctly) a failure.
        assert!(!is_success_body(r#"{"ok": true}"#));
        assert!(!is_success_body(""));
    }

    #[test]
    fn description_is_extracted_for_logging() {
        assert_eq!(
            error_description(r#"{"ok":false,"description":"Unauthorized"}"#).as_deref(),
            Some("Unauthorized")
        );
        assert_eq!(error_description("not json at all"), None);
        assert_eq!(error_description(r#"{"ok":false}"#), None);
    }

    #[test]
    fn notifier_builds_with_validation_on_by_default() {
        let cfg = TransportConfig {
            bot_token: "123:abc".into(),
            ..Default::default()
        };
        let notifier = TelegramNotifier::new(&cfg).unwrap();
        assert!(notifier.send_photo_url.ends_with("/bot123:abc/sendPhoto"));
        assert!(notifier.send_photo_url.starts_with("https://api.telegram.org/"));
    }
}
