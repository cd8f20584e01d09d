use std::time::Duration;

use serde::{Deserialize, Serialize};
use serenity::async_trait;
use thiserror::Error;

use crate::config;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("no completion API key configured")]
    MissingApiKey,
    #[error("request to the completion API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed completion response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Request {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}
impl Request {
    pub fn new(params: &config::Completion, prompt: String) -> Self {
        Self {
            model: params.model.clone(),
            prompt,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            presence_penalty: params.presence_penalty,
            frequency_penalty: params.frequency_penalty,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Response {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    pub text: String,
}

/// Anything that can turn a [Request] into candidate completions.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn create(&self, request: &Request) -> Result<Response, CompletionError>;
}

/// Client for an OpenAI-compatible `/v1/completions` endpoint.
pub struct OpenAi {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}
impl OpenAi {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CompletionError> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/completions", self.base_url.trim_end_matches('/'))
    }
}
#[async_trait]
impl CompletionApi for OpenAi {
    async fn create(&self, request: &Request) -> Result<Response, CompletionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingApiKey)?;

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request(prompt: &str) -> Request {
        Request::new(&config::Completion::default(), prompt.to_string())
    }

    fn client(server: &MockServer, api_key: Option<&str>) -> OpenAi {
        OpenAi::new(
            server.base_url(),
            api_key.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn request_serializes_the_wire_fields() {
        let value = serde_json::to_value(request("Question: hi\nlisbun:")).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-3.5-turbo-instruct",
                "prompt": "Question: hi\nlisbun:",
                "max_tokens": 2500,
                "temperature": 0.3,
                "top_p": 0.3,
                "presence_penalty": 0.0,
                "frequency_penalty": 0.5,
            })
        );
    }

    #[test]
    fn response_without_choices_is_empty() {
        let response: Response = serde_json::from_str(r#"{"id":"cmpl-1"}"#).unwrap();
        assert!(response.choices.is_empty());
    }

    #[tokio::test]
    async fn posts_request_and_decodes_choices() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/completions")
                    .header("authorization", "Bearer sk-test")
                    .json_body(json!({
                        "model": "gpt-3.5-turbo-instruct",
                        "prompt": "Question: What is 2+2?\nlisbun:",
                        "max_tokens": 2500,
                        "temperature": 0.3,
                        "top_p": 0.3,
                        "presence_penalty": 0.0,
                        "frequency_penalty": 0.5,
                    }));
                then.status(200).json_body(json!({
                    "id": "cmpl-1",
                    "object": "text_completion",
                    "choices": [
                        { "text": " 4", "index": 0, "finish_reason": "stop" },
                        { "text": " four", "index": 1, "finish_reason": "stop" }
                    ]
                }));
            })
            .await;

        let response = client(&server, Some("sk-test"))
            .create(&request("Question: What is 2+2?\nlisbun:"))
            .await
            .unwrap();

        mock.assert_async().await;
        let texts: Vec<_> = response.choices.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, [" 4", " four"]);
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url_is_tolerated() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let client = OpenAi::new(
            format!("{}/", server.base_url()),
            Some("sk-test".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let response = client.create(&request("p")).await.unwrap();

        mock.assert_async().await;
        assert!(response.choices.is_empty());
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_a_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let err = client(&server, None).create(&request("p")).await.unwrap_err();

        assert!(matches!(err, CompletionError::MissingApiKey));
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn error_status_keeps_the_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/completions");
                then.status(429)
                    .json_body(json!({ "error": { "message": "Rate limit reached" } }));
            })
            .await;

        let err = client(&server, Some("sk-test"))
            .create(&request("p"))
            .await
            .unwrap_err();

        match err {
            CompletionError::Status { status, body } => {
                assert_eq!(status.as_u16(), 429);
                assert!(body.contains("Rate limit reached"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/completions");
                then.status(200).body("<html>bad gateway</html>");
            })
            .await;

        let err = client(&server, Some("sk-test"))
            .create(&request("p"))
            .await
            .unwrap_err();

        assert!(matches!(err, CompletionError::Decode(_)));
    }
}
