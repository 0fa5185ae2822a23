/// LLM Client — the single point of entry for all model calls in the job-matching API.
///
/// ARCHITECTURAL RULE: No other module may call the model provider directly.
/// Extraction, résumé analysis and matching all go through a `ModelGateway`.
///
/// Model: Qwen/Qwen2.5-72B-Instruct-128K (hardcoded — injected on every call)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.siliconflow.cn/v1";
/// The only capability/operation pair the gateway routes.
pub const CAPABILITY: &str = "siliconflow";
pub const OPERATION: &str = "json_mode";
/// The model used for all LLM calls. Overrides anything the caller supplies.
pub const MODEL: &str = "Qwen/Qwen2.5-72B-Instruct-128K";
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Unsupported tool: {capability}/{operation}")]
    UnsupportedTool {
        capability: String,
        operation: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Completion response had no choices")]
    EmptyChoices,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Arguments forwarded to the chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatArguments {
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ChatArguments {
    /// System instruction + user payload, JSON-object decoding at the fixed temperature.
    pub fn json_mode(system: &str, user: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            response_format: ResponseFormat::json_object(),
            temperature: TEMPERATURE,
            model: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl ChatCompletion {
    fn into_text(self) -> Result<String, GatewayError> {
        self.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(GatewayError::EmptyChoices)
    }
}

/// A remote text-generation capability. Carried in `AppState` as `Arc<dyn ModelGateway>`,
/// chosen once at startup.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn invoke(
        &self,
        capability: &str,
        operation: &str,
        arguments: ChatArguments,
    ) -> Result<String, GatewayError>;
}

/// Sends a JSON-mode request through the supported capability pair.
pub async fn invoke_json_mode(
    gateway: &dyn ModelGateway,
    system: &str,
    user: impl Into<String>,
) -> Result<String, GatewayError> {
    gateway
        .invoke(CAPABILITY, OPERATION, ChatArguments::json_mode(system, user))
        .await
}

pub(crate) fn ensure_supported(capability: &str, operation: &str) -> Result<(), GatewayError> {
    if capability != CAPABILITY || operation != OPERATION {
        return Err(GatewayError::UnsupportedTool {
            capability: capability.to_string(),
            operation: operation.to_string(),
        });
    }
    Ok(())
}

/// Validates the pair and pins the model, whatever the caller supplied.
pub(crate) fn prepare(
    capability: &str,
    operation: &str,
    mut arguments: ChatArguments,
) -> Result<ChatArguments, GatewayError> {
    ensure_supported(capability, operation)?;
    arguments.model = Some(MODEL.to_string());
    Ok(arguments)
}

/// Gateway backed by the SiliconFlow OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct SiliconFlowClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SiliconFlowClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    pub fn with_client(client: Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send(&self, arguments: &ChatArguments) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(arguments)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        completion.into_text()
    }
}

#[async_trait]
impl ModelGateway for SiliconFlowClient {
    async fn invoke(
        &self,
        capability: &str,
        operation: &str,
        arguments: ChatArguments,
    ) -> Result<String, GatewayError> {
        let arguments = prepare(capability, operation, arguments)?;

        match self.send(&arguments).await {
            Ok(text) => {
                debug!("SiliconFlow call succeeded: {} chars", text.len());
                Ok(text)
            }
            Err(e) => {
                error!("SiliconFlow API error: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays canned completions and records every invocation.
    #[derive(Default)]
    pub struct StubGateway {
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        pub calls: Mutex<Vec<(String, String, ChatArguments)>>,
    }

    impl StubGateway {
        pub fn replying(text: &str) -> Self {
            let stub = Self::default();
            stub.replies.lock().unwrap().push_back(Ok(text.to_string()));
            stub
        }

        pub fn failing(error: GatewayError) -> Self {
            let stub = Self::default();
            stub.replies.lock().unwrap().push_back(Err(error));
            stub
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last_arguments(&self) -> ChatArguments {
            self.calls.lock().unwrap().last().unwrap().2.clone()
        }
    }

    #[async_trait]
    impl ModelGateway for StubGateway {
        async fn invoke(
            &self,
            capability: &str,
            operation: &str,
            arguments: ChatArguments,
        ) -> Result<String, GatewayError> {
            self.calls.lock().unwrap().push((
                capability.to_string(),
                operation.to_string(),
                arguments,
            ));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }
}
