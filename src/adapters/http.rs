use crate::core::{ConfigProvider, GenerationService, Result};
use crate::domain::model::GenerationRequest;
use crate::utils::error::AdvisorError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const VISION_API_KEY_VAR: &str = "GLM_4_1V_API_KEY";
pub const REASONING_API_KEY_VAR: &str = "GLM_4_5_AIR_API_KEY";

const TEMPERATURE: f64 = 0.9;
const TOP_K: u32 = 4;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f64,
    top_k: u32,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    #[serde(default)]
    message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completion client for one model behind the configured base URL.
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    service: &'static str,
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl ChatCompletionClient {
    /// Client for menu recognition. Refuses to build without its API key.
    pub fn vision<C: ConfigProvider>(config: &C) -> Result<Self> {
        let api_key = config
            .vision_api_key()
            .ok_or_else(|| AdvisorError::MissingConfigError {
                field: VISION_API_KEY_VAR.to_string(),
            })?;
        Self::build("vision", config, Some(api_key), config.vision_model())
    }

    /// Client for nutrition, ranking and summary calls. A missing key is only a warning.
    pub fn reasoning<C: ConfigProvider>(config: &C) -> Result<Self> {
        let api_key = config.reasoning_api_key();
        if api_key.is_none() {
            tracing::warn!("{} not set, reasoning calls will be unauthenticated", REASONING_API_KEY_VAR);
        }
        Self::build("reasoning", config, api_key, config.reasoning_model())
    }

    fn build<C: ConfigProvider>(
        service: &'static str,
        config: &C,
        api_key: Option<&str>,
        model: &str,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds()))
            .build()?;

        Ok(Self {
            service,
            base_url: config.api_base_url().to_string(),
            api_key: api_key.map(str::to_string),
            model: model.to_string(),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages(request: GenerationRequest) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: MessageContent::Text(system),
            });
        }

        let content = match request.image_base64 {
            Some(image) => MessageContent::Parts(vec![
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/jpeg;base64,{}", image),
                    },
                },
                ContentPart::Text {
                    text: request.prompt,
                },
            ]),
            None => MessageContent::Text(request.prompt),
        };
        messages.push(ChatMessage {
            role: "user",
            content,
        });
        messages
    }
}

#[async_trait]
impl GenerationService for ChatCompletionClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            top_k: TOP_K,
            max_tokens: request.max_tokens,
            messages: Self::messages(request),
        };

        tracing::info!("Calling {} model {}", self.service, self.model);
        let mut builder = self.client.post(&self.base_url).json(&payload);
        // 沒有金鑰時不帶 Authorization 標頭
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("{} request failed: {}", self.service, e);
            AdvisorError::ApiError(e)
        })?;

        // 非 2xx 視為服務錯誤，不重試
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("{} service error: {} - {}", self.service, status, body);
            return Err(AdvisorError::GenerationServiceError {
                service: self.service.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        // 只取第一個 choice，沒有內容時回傳空字串
        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        tracing::debug!("{} returned {} chars", self.service, content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_request_uses_content_parts() {
        let messages = ChatCompletionClient::messages(GenerationRequest {
            system: None,
            prompt: "识别菜单".to_string(),
            image_base64: Some("QUJD".to_string()),
            max_tokens: 1024,
        });
        let value = serde_json::to_value(&messages).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{
                "role": "user",
                "content": [
                    {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}},
                    {"type": "text", "text": "识别菜单"}
                ]
            }])
        );
    }

    #[test]
    fn test_text_request_puts_system_first() {
        let messages = ChatCompletionClient::messages(GenerationRequest {
            system: Some("你是营养师".to_string()),
            prompt: "分析".to_string(),
            image_base64: None,
            max_tokens: 1000,
        });
        let value = serde_json::to_value(&messages).unwrap();

        assert_eq!(value[0]["role"], "system");
        assert_eq!(value[0]["content"], "你是营养师");
        assert_eq!(value[1]["content"], "分析");
    }
}
