use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Config for a llama.cpp-style `POST /completion` endpoint.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Full endpoint URL, e.g. `http://127.0.0.1:8080/completion`.
    pub endpoint: String,
    /// Stop sequences sent with every request.
    pub stop: Vec<String>,
    /// Whole-request timeout. The upstream protocol has none; an unreachable
    /// service would otherwise hang the loop forever.
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/completion".to_string(),
            stop: default_stop_sequences(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Stop sequences that keep the model from continuing past its own turn.
pub fn default_stop_sequences() -> Vec<String> {
    ["</s>", "User:", "State:", "Entry:"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    stop: &'a [String],
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

/// Sends a prompt to the completion endpoint and returns the raw reply text.
pub async fn query_completion(prompt: &str, cfg: &CompletionConfig) -> anyhow::Result<String> {
    let client = Client::builder()
        .timeout(cfg.timeout)
        .build()
        .context("completion client build failed")?;
    let request = CompletionRequest {
        prompt,
        stop: &cfg.stop,
    };

    let res = client
        .post(&cfg.endpoint)
        .json(&request)
        .send()
        .await
        .context("completion request failed")?
        .error_for_status()
        .context("completion non-2xx response")?
        .json::<CompletionResponse>()
        .await
        .context("completion response decode failed")?;

    Ok(res.content)
}
