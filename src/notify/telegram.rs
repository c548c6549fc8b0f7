//! Telegram Bot API notifier.

use super::Notifier;
use crate::error::{Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::info;

/// Public Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Sends messages to one chat through `sendMessage`.
///
/// # Examples
///
/// ```rust,no_run
/// use padel_watch::notify::{Notifier, TelegramNotifier};
/// use std::time::Duration;
///
/// # async fn example() -> padel_watch::error::Result<()> {
/// let telegram = TelegramNotifier::new("123456:ABC", "-1001234567", Duration::from_secs(30))?;
/// telegram.send("Court A is free").await?;
/// # Ok(())
/// # }
/// ```
pub struct TelegramNotifier {
    client: Client,
    api_url: String,
    token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
    result: Option<SentMessage>,
}

#[derive(Deserialize)]
struct SentMessage {
    message_id: i64,
}

impl TelegramNotifier {
    /// Create a notifier for `chat_id` using the bot `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    /// Point the notifier at a different Bot API server.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Destination chat.
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id: &self.chat_id,
            text,
        };

        // reqwest errors embed the request URL, which contains the token.
        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|e| WatchError::Notify(e.without_url().to_string()))?;

        let status = response.status();
        let body: ApiResponse = response.json().await.map_err(|e| {
            WatchError::Notify(format!(
                "unreadable Bot API response (HTTP {}): {}",
                status.as_u16(),
                e.without_url()
            ))
        })?;

        if !status.is_success() || !body.ok {
            return Err(WatchError::Notify(format!(
                "Bot API returned HTTP {}: {}",
                status.as_u16(),
                body.description.as_deref().unwrap_or("no description")
            )));
        }

        let message_id = body.result.map(|m| m.message_id);
        info!(chat_id = %self.chat_id, ?message_id, "Message sent");
        Ok(())
    }

    fn name(&self) -> String {
        format!("telegram:{}", self.chat_id)
    }
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> TelegramNotifier {
        TelegramNotifier::new("123:secret", "-100200", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            notifier().endpoint(),
            "https://api.telegram.org/bot123:secret/sendMessage"
        );
        assert_eq!(
            notifier().with_api_url("http://localhost:8081/").endpoint(),
            "http://localhost:8081/bot123:secret/sendMessage"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let text = format!("{:?}", notifier());
        assert!(!text.contains("secret"));
        assert!(text.contains("-100200"));
    }

    #[test]
    fn test_payload_shape() {
        let payload = SendMessage {
            chat_id: "-100200",
            text: "hello",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"chat_id": "-100200", "text": "hello"}));
    }

    #[test]
    fn test_error_response_parses() {
        let body: ApiResponse = serde_json::from_str(
            r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#,
        )
        .unwrap();
        assert!(!body.ok);
        assert_eq!(body.description.as_deref(), Some("Bad Request: chat not found"));
    }
}
