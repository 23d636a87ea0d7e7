//! OpenAI Provider Implementation
//!
//! Sends one chat-completion request per analysis to an OpenAI-compatible
//! endpoint and parses the first choice into an `AnalysisResult`.

use crate::ai::{ChatMessage, RemoteAnalyzer, build_messages, parse_reply};
use crate::credential::Credential;
use async_trait::async_trait;
use explainer_shared::{
    AnalysisRequest, AnalysisResult, ExplainerError, RemoteConfig, RemoteError, Result,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI chat-completion provider
pub struct OpenAIProvider {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

/// Request payload for the chat-completion API
#[derive(Serialize, Debug)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat-completion API
#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIProvider {
    /// Create a provider from the remote section of the configuration
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .build()
            .map_err(|e| ExplainerError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        credential: &Credential,
    ) -> std::result::Result<String, RemoteError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let text = response.text().await.map_err(map_transport_error)?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RemoteError::Malformed("response has no message content".to_string()))
    }
}

fn map_transport_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::Timeout
    } else {
        RemoteError::Network(error.to_string())
    }
}

#[async_trait]
impl RemoteAnalyzer for OpenAIProvider {
    #[instrument(skip_all, fields(model = %self.model, file_type = %request.file_type))]
    async fn analyze_remote(
        &self,
        request: &AnalysisRequest,
        credential: &Credential,
    ) -> std::result::Result<AnalysisResult, RemoteError> {
        let content = self.complete(build_messages(request), credential).await?;
        debug!("Received {} characters from remote model", content.len());

        Ok(parse_reply(&content, &request.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::parse::{NO_BUGS_NOTE, stub_improvement};
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    const TEST_KEY: &str = "sk-test-0123456789abcdef";

    fn provider_for(server: &ServerGuard) -> OpenAIProvider {
        let config = RemoteConfig {
            endpoint: format!("{}/v1/chat/completions", server.url()),
            ..RemoteConfig::default()
        };
        OpenAIProvider::new(&config).unwrap()
    }

    fn request() -> AnalysisRequest {
        AnalysisRequest::new("def add(a, b): return a + b", "Python", "Total files: 1", "")
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let mut server = Server::new_async().await;
        let reply = "Adds two numbers.\n\n### Potential Bugs\n- No type checks";
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", format!("Bearer {}", TEST_KEY).as_str())
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 1500
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "choices": [{ "message": { "role": "assistant", "content": reply } }] })
                    .to_string(),
            )
            .create_async()
            .await;

        let provider = provider_for(&server);
        let credential = Credential::parse(TEST_KEY).unwrap();
        let result = provider.analyze_remote(&request(), &credential).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.explanation, "Adds two numbers.");
        assert_eq!(result.improvements, vec![stub_improvement("def add(a, b): return a + b")]);
        assert_eq!(result.potential_bugs, vec!["No type checks".to_string()]);
        assert_ne!(result.potential_bugs[0], NO_BUGS_NOTE);
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let credential = Credential::parse(TEST_KEY).unwrap();
        let error = provider.analyze_remote(&request(), &credential).await.unwrap_err();

        assert_eq!(error, RemoteError::Status(500));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let credential = Credential::parse(TEST_KEY).unwrap();
        let error = provider.analyze_remote(&request(), &credential).await.unwrap_err();

        assert!(matches!(error, RemoteError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let credential = Credential::parse(TEST_KEY).unwrap();
        let error = provider.analyze_remote(&request(), &credential).await.unwrap_err();

        assert!(matches!(error, RemoteError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // accept and hold connections without ever answering
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = RemoteConfig {
            endpoint: format!("http://{}/v1/chat/completions", addr),
            read_timeout_secs: 1,
            ..RemoteConfig::default()
        };
        let provider = OpenAIProvider::new(&config).unwrap();
        let credential = Credential::parse(TEST_KEY).unwrap();
        let error = provider.analyze_remote(&request(), &credential).await.unwrap_err();

        server.abort();
        assert_eq!(error, RemoteError::Timeout);
    }

    #[test]
    fn test_provider_uses_config() {
        let provider = OpenAIProvider::new(&RemoteConfig::default()).unwrap();
        assert_eq!(provider.model(), "gpt-3.5-turbo");
        assert_eq!(provider.endpoint(), "https://api.openai.com/v1/chat/completions");
    }
}
