use std::time::Duration;

use deckgen_common::{Config, SlideOutline};
use tracing::{debug, warn};

use crate::error::OutlineError;
use crate::fallback::fallback_outline;
use crate::prompt::{build_outline_prompt, CONNECTION_TEST_ECHO, CONNECTION_TEST_PROMPT};
use crate::recover::recover_outline;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 3000;

/// Model latency is unbounded; a ten-minute ceiling with no retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Chat-completion client for outline generation.
///
/// `generate_outline` never fails: credential, transport, HTTP and parse
/// errors all degrade to the deterministic fallback outline, so callers
/// do not handle outline errors at all.
pub struct OutlineClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OutlineClient {
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    pub async fn generate_outline(&self, topic: &str, num_pages: usize) -> SlideOutline {
        let prompt = build_outline_prompt(topic, num_pages);
        debug!(topic, num_pages, prompt_preview = %preview(&prompt), "requesting outline");

        match self.fetch(&prompt).await {
            Ok(raw) => {
                debug!(response_preview = %preview(&raw), "model responded");
                recover_outline(&raw, num_pages)
            }
            Err(err) => {
                warn!(%err, topic, "outline request failed, using fallback content");
                fallback_outline(topic, num_pages)
            }
        }
    }

    /// One POST to `{base_url}/chat/completions`, returning the first
    /// choice's message content.
    async fn fetch(&self, prompt: &str) -> Result<String, OutlineError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(OutlineError::MissingApiKey)?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "chat completion responded");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OutlineError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = response.json().await?;
        value["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(OutlineError::MalformedResponse)
    }

    /// Explicit diagnostic action: sends a fixed prompt and checks for the
    /// echo phrase. This is the one place a connection problem is shown to
    /// the user instead of being papered over with fallback content.
    pub async fn test_connection(&self) -> bool {
        match self.fetch(CONNECTION_TEST_PROMPT).await {
            Ok(text) => text.to_lowercase().contains(CONNECTION_TEST_ECHO),
            Err(err) => {
                warn!(%err, "connection test failed");
                false
            }
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_common::Config;

    fn config_for(server: &mockito::ServerGuard) -> Config {
        Config {
            api_key: Some("test-key".to_string()),
            base_url: server.url(),
            model: "test-model".to_string(),
        }
    }

    fn completion_body(content: &str) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    fn three_slides() -> String {
        serde_json::json!([
            {"title": "A", "summary": "sa", "points": []},
            {"title": "B", "summary": "sb", "points": []},
            {"title": "C", "summary": "sc", "points": []}
        ])
        .to_string()
    }

    #[tokio::test]
    async fn valid_response_with_matching_count_is_returned_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(&three_slides()))
            .create_async()
            .await;

        let client = OutlineClient::new(&config_for(&server));
        let outline = client.generate_outline("Test", 3).await;
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[0].title, "A");
        assert_eq!(outline[2].title, "C");
    }

    #[tokio::test]
    async fn http_error_degrades_to_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = OutlineClient::new(&config_for(&server));
        let outline = client.generate_outline("Test", 2).await;
        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].title, "Test - Introduction");
        assert_eq!(outline[1].title, "Test - Summary");
    }

    #[tokio::test]
    async fn missing_content_field_degrades_to_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let client = OutlineClient::new(&config_for(&server));
        let outline = client.generate_outline("Test", 3).await;
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[0].title, "Test - Introduction");
    }

    #[tokio::test]
    async fn missing_api_key_yields_intro_only_for_single_page() {
        let config = Config {
            api_key: None,
            ..Config::default()
        };
        let client = OutlineClient::new(&config);
        let outline = client.generate_outline("Test", 1).await;
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].title, "Test - Introduction");
    }

    #[tokio::test]
    async fn connection_test_checks_echo_phrase() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body("connection ok"))
            .create_async()
            .await;

        let client = OutlineClient::new(&config_for(&server));
        assert!(client.test_connection().await);

        let no_key = OutlineClient::new(&Config {
            api_key: None,
            ..Config::default()
        });
        assert!(!no_key.test_connection().await);
    }
}
