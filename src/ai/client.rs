use super::stream::{self, ReplyStream};
use super::GenerateService;
use crate::models::{Config, GenerateRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.9;

/// Timeout for the reachability probe. Generate requests carry no timeout:
/// generations may legitimately run for minutes.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Self {
        Self::new_with_client(config, reqwest::Client::new())
    }

    pub fn new_with_client(config: &Config, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    fn full_prompt(prompt: &str, context: &str) -> String {
        if context.is_empty() {
            prompt.to_string()
        } else {
            format!("{}\n\n{}", context, prompt)
        }
    }
}

#[async_trait]
impl GenerateService for OllamaClient {
    async fn stream_generate(&self, prompt: &str, context: &str) -> ReplyStream {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: Self::full_prompt(prompt, context),
            stream: true,
            temperature: TEMPERATURE,
            top_p: TOP_P,
        };

        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!("Sending generate request to {}", url);

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                tracing::warn!("Generation backend unreachable: {}", e);
                return stream::once(Err(Error::BackendUnreachable(e.to_string())));
            }
            Err(e) => {
                tracing::error!("Failed to send generate request: {}", e);
                return stream::once(Err(Error::Backend(e.to_string())));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend error (status {}): {}", status, body);
            return stream::once(Err(Error::Backend(format!(
                "status {}: {}",
                status, body
            ))));
        }

        stream::fragments(response)
    }

    async fn check_backend(&self) -> Result<()> {
        self.client
            .get(&self.base_url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::BackendUnreachable(e.to_string()))?;
        Ok(())
    }
}
