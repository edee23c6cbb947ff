//! LLM 客户端
//!
//! 提供两种实现：
//! - [`CompletionsClient`]: 直接调用传统 completions 接口（gpt-3.5-turbo-instruct）
//! - [`ChatClient`]: 使用 async-openai 调用 chat completions 接口

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::TextGenerator;
use crate::errors::{AppError, Result};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// completions 接口客户端
#[derive(Clone)]
pub struct CompletionsClient {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl CompletionsClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextGenerator for CompletionsClient {
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
        let req = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens,
            temperature,
        };

        debug!(model = %self.model, max_tokens, "requesting completion");

        let res = self
            .http
            .post(format!("{}/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(AppError::upstream(format!("{}: {}", status, message)));
        }

        let res: CompletionResponse = res
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("failed to parse completion response: {}", e)))?;

        res.choices
            .into_iter()
            .next()
            .map(|c| c.text.unwrap_or_default())
            .ok_or_else(|| AppError::upstream("empty response from openai"))
    }
}

/// chat completions 接口客户端
#[derive(Clone)]
pub struct ChatClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl ChatClient {
    pub fn new_with_base_url(api_key: String, model: String, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();

        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);

        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl TextGenerator for ChatClient {
    async fn complete(&self, prompt: &str, max_tokens: u32, temperature: f32) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.to_string())
            .build()
            .map(ChatCompletionRequestMessage::User)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message])
            .max_completion_tokens(max_tokens)
            .temperature(temperature)
            .build()?;

        debug!(model = %self.model, max_tokens, "requesting chat completion");

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| AppError::upstream("empty response from openai"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CompletionsClient::new(
            "test-key".to_string(),
            "gpt-3.5-turbo-instruct".to_string(),
            "https://api.openai.com/v1/".to_string(),
        );

        assert_eq!(client.model, "gpt-3.5-turbo-instruct");
        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_completion_request_serialization() {
        let req = CompletionRequest {
            model: "gpt-3.5-turbo-instruct",
            prompt: "space exploration",
            max_tokens: 280,
            temperature: 0.7,
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo-instruct");
        assert_eq!(value["prompt"], "space exploration");
        assert_eq!(value["max_tokens"], 280);
    }

    #[test]
    fn test_completion_response_deserialization() {
        let json_str = r#"{
            "id": "cmpl-1",
            "object": "text_completion",
            "choices": [{"text": "\n\nTo the stars!", "index": 0, "finish_reason": "stop"}]
        }"#;

        let resp: CompletionResponse = serde_json::from_str(json_str).unwrap();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].text.as_deref(), Some("\n\nTo the stars!"));
    }

    #[test]
    fn test_error_body_deserialization() {
        let json_str = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let body: ApiErrorBody = serde_json::from_str(json_str).unwrap();
        assert_eq!(body.error.message, "Incorrect API key provided");
    }

    #[test]
    fn test_chat_client_creation() {
        let client = ChatClient::new_with_base_url(
            "test-key".to_string(),
            "gpt-4o-mini".to_string(),
            "https://api.openai.com/v1".to_string(),
        );

        assert_eq!(client.model, "gpt-4o-mini");
    }
}
