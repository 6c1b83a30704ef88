use serde::Serialize;

use super::types::{GatewayRequest, GatewayResponse, ModelGateway, ResponseFormat};
use super::SynthesisError;
use crate::config::GatewayConfig;

/// Longest error body kept from a non-success gateway reply.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct OpenAiGateway {
    base_url: String,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl OpenAiGateway {
    /// Build a gateway from settings. A missing API key is not an error
    /// here; it is reported on the first call.
    pub fn new(config: &GatewayConfig) -> Result<Self, SynthesisError> {
        let builder = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs));
        Self::with_client_builder(config, builder)
    }

    fn with_client_builder(
        config: &GatewayConfig,
        builder: reqwest::blocking::ClientBuilder,
    ) -> Result<Self, SynthesisError> {
        let client = builder
            .build()
            .map_err(|e| SynthesisError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
            api_key: config.api_key.clone(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormatBody {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Request body for `/chat/completions`.
#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormatBody,
    temperature: f32,
}

fn completion_body<'a>(model: &'a str, temperature: f32, request: &'a GatewayRequest) -> CompletionRequest<'a> {
    let kind = match request.response_format {
        ResponseFormat::StructuredJson => "json_object",
    };
    CompletionRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: &request.system_directive,
            },
            ChatMessage {
                role: "user",
                content: &request.user_payload,
            },
        ],
        response_format: ResponseFormatBody { kind },
        temperature,
    }
}

/// Pull `choices[0].message.content` out of a completion envelope.
fn extract_content(envelope: &serde_json::Value) -> Result<String, SynthesisError> {
    envelope
        .pointer("/choices/0/message/content")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            SynthesisError::MalformedResponse("completion carried no message content".into())
        })
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

impl ModelGateway for OpenAiGateway {
    fn invoke(&self, request: &GatewayRequest) -> Result<GatewayResponse, SynthesisError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SynthesisError::NotConfigured(
                "OPENAI_API_KEY is not set".into(),
            ));
        };

        let body = completion_body(&self.model, self.temperature, request);
        let started = std::time::Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    SynthesisError::Unreachable(self.base_url.clone())
                } else {
                    SynthesisError::Unreachable(format!("{} ({e})", self.base_url))
                }
            })?;

        let status = response.status();
        let text = response.text().map_err(|e| {
            if e.is_timeout() {
                SynthesisError::Timeout(self.timeout_secs)
            } else {
                SynthesisError::Unreachable(format!("{} ({e})", self.base_url))
            }
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Model gateway returned error status");
            return Err(SynthesisError::GatewayStatus {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        let envelope: serde_json::Value =
            serde_json::from_str(&text).map_err(|_| SynthesisError::GatewayStatus {
                status: status.as_u16(),
                body: "undecodable completion envelope".into(),
            })?;

        tracing::debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model gateway call completed"
        );

        let content = extract_content(&envelope)?;
        Ok(GatewayResponse {
            content,
            raw_audit_record: envelope,
        })
    }
}
