use crate::constants::{defaults, endpoints};
use crate::error::DevAgentError;
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};

pub struct OpenAIClient {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            model: defaults::MODEL.to_string(),
            base_url: endpoints::OPENAI_BASE_URL.to_string(),
            temperature: defaults::TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Reasoning models only accept their default temperature, so this is
    /// configured once rather than per request.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request<'a>(&'a self, messages: &'a [Message]) -> OpenAIRequest<'a> {
        OpenAIRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

/// Pull the reply text out of a raw chat-completions response body.
fn parse_response(body: &str) -> Result<String, DevAgentError> {
    let api_response: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| DevAgentError::Completion(format!("Failed to parse response: {e}")))?;

    let choice = api_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| DevAgentError::Completion("No response from API".into()))?;

    choice
        .message
        .content
        .ok_or_else(|| DevAgentError::Completion("Response contained no text content".into()))
}

impl CompletionClient for OpenAIClient {
    fn complete(&self, messages: &[Message]) -> Result<String, DevAgentError> {
        let url = self.endpoint();
        let request_body = self.build_request(messages);

        tracing::debug!(
            "POST {} (model={}, messages={})",
            url,
            self.model,
            messages.len()
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .map_err(|e| DevAgentError::Completion(format!("Request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| DevAgentError::Completion(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(DevAgentError::Completion(format!(
                "OpenAI API error ({}): {}",
                status, response_text
            )));
        }

        parse_response(&response_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let client = OpenAIClient::new("sk-test")
            .with_model("o1-mini-2024-09-12")
            .with_temperature(1.0);
        let messages = vec![Message::developer("prime"), Message::user("Hello")];

        let body = serde_json::to_value(client.build_request(&messages)).unwrap();

        assert_eq!(body["model"], "o1-mini-2024-09-12");
        assert_eq!(body["temperature"], 1.0);
        assert_eq!(body["messages"][0]["role"], "developer");
        assert_eq!(body["messages"][0]["content"], "prime");
        assert_eq!(body["messages"][1]["role"], "user");
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = OpenAIClient::new("k").with_base_url("http://localhost:8080/");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_parse_response_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hi!"}},{"message":{"content":"other"}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Hi!");
    }

    #[test]
    fn test_parse_response_no_choices() {
        let err = parse_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, DevAgentError::Completion(_)));
    }

    #[test]
    fn test_parse_response_null_content() {
        let err = parse_response(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(err.to_string().contains("no text content"));
    }

    #[test]
    fn test_parse_response_malformed() {
        let err = parse_response("<html>bad gateway</html>").unwrap_err();
        assert!(err.to_string().contains("Failed to parse response"));
    }

    #[test]
    fn test_unreachable_endpoint_is_completion_error() {
        let client = OpenAIClient::new("k").with_base_url("http://127.0.0.1:1");
        let err = client.complete(&[Message::user("hi")]).unwrap_err();
        assert!(matches!(err, DevAgentError::Completion(_)));
    }
}
