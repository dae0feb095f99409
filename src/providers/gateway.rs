//! Gateway/inference backend.
//!
//! Calls an intermediary inference endpoint that fronts several deployed
//! models. The gateway can embed an `error` object in the body even on
//! HTTP 200, so the payload is decoded defensively: a reported error
//! becomes `ProviderError::Upstream`, and a body without
//! `choices[0].message.content` becomes `MalformedPayload` carrying a
//! bounded snippet of the raw bytes.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::traits::provider::{ChatMessage, ChatModel, CompletionOptions};

/// Provider for the gateway/inference backend.
#[derive(Clone)]
pub struct GatewayProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    deployment: String,
}

impl GatewayProvider {
    /// Create a provider for a deployed model behind the gateway.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            deployment: deployment.into(),
        }
    }

    /// Deployment name sent in the request body.
    pub fn deployment(&self) -> &str {
        &self.deployment
    }
}

#[async_trait]
impl ChatModel for GatewayProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> ProviderResult<String> {
        let request = GatewayRequest {
            model: self.deployment.clone(),
            messages: messages.to_vec(),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!(
            model = %self.model,
            deployment = %self.deployment,
            "gateway completion request"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Upstream {
                message: format!("HTTP {status}: {body}"),
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(Box::new(e)))?;

        decode_gateway_payload(&raw)
    }
}

/// Decode a gateway response body into reply text.
///
/// HTTP success is not enough: the gateway reports upstream failures inside
/// the body, and some deployments return envelopes with no content at all.
pub(crate) fn decode_gateway_payload(raw: &str) -> ProviderResult<String> {
    let payload: GatewayResponse = serde_json::from_str(raw)
        .map_err(|e| ProviderError::malformed(format!("not a completion envelope: {e}"), raw))?;

    if let Some(error) = payload.error {
        return Err(ProviderError::Upstream {
            message: error.message,
        });
    }

    payload
        .choices
        .into_iter()
        .flatten()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ProviderError::malformed("missing choices[0].message.content", raw))
}

#[derive(Serialize)]
struct GatewayRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct GatewayResponse {
    choices: Option<Vec<GatewayChoice>>,
    error: Option<GatewayError>,
}

#[derive(Deserialize)]
struct GatewayChoice {
    message: Option<GatewayMessage>,
}

#[derive(Deserialize)]
struct GatewayMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct GatewayError {
    message: String,
}
