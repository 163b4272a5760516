use std::time::Duration;

use reqwest::{StatusCode, blocking::Client};
use serde::{Deserialize, Serialize};

use super::{ApiErrorBody, Provider, build_http_client, decode, send};
use crate::{
   config::Config,
   error::{AigitError, Result},
};

const NAME: &str = "OpenAI";

/// Client for OpenAI and any server speaking the chat completions API
pub struct OpenAIClient {
   http:     Client,
   api_key:  String,
   model:    String,
   base_url: String,
}

impl OpenAIClient {
   pub fn new(config: &Config) -> Result<Self> {
      Ok(Self {
         http:     build_http_client()?,
         api_key:  config.api_key.clone(),
         model:    config.effective_model(),
         base_url: config.effective_base_url(),
      })
   }
}

impl Provider for OpenAIClient {
   fn name(&self) -> &'static str {
      NAME
   }

   fn model(&self) -> &str {
      &self.model
   }

   fn base_url(&self) -> &str {
      &self.base_url
   }

   fn call(&self, system_prompt: &str, user_prompt: &str, timeout: Duration) -> Result<String> {
      let url = format!("{}/chat/completions", self.base_url);
      tracing::debug!(%url, model = %self.model, "sending chat completion request");

      let request = self
         .http
         .post(url)
         .header("Authorization", format!("Bearer {}", self.api_key))
         .json(&ChatRequest::new(&self.model, system_prompt, user_prompt));

      let (status, body) = send(request, timeout)?;
      parse_chat_response(NAME, status, &body)
   }
}

#[derive(Debug, Serialize)]
pub(super) struct ChatRequest<'a> {
   model:    &'a str,
   messages: [ChatMessage<'a>; 2],
}

impl<'a> ChatRequest<'a> {
   pub(super) const fn new(model: &'a str, system_prompt: &'a str, user_prompt: &'a str) -> Self {
      Self {
         model,
         messages: [
            ChatMessage { role: "system", content: system_prompt },
            ChatMessage { role: "user", content: user_prompt },
         ],
      }
   }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
   role:    &'static str,
   content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
   #[serde(default)]
   choices: Vec<Choice>,
   #[serde(default)]
   error:   Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
   message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
   #[serde(default)]
   content: Option<String>,
}

/// Extract the first choice's text from a chat completions envelope
pub(super) fn parse_chat_response(
   provider: &'static str,
   status: StatusCode,
   body: &str,
) -> Result<String> {
   let response: ChatResponse = decode(status, body)?;

   if let Some(error) = response.error {
      return Err(error.into_error(provider));
   }

   response
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .ok_or(AigitError::EmptyResponse { provider })
}

#[cfg(test)]
mod tests {
   use super::*;

   fn parse(body: &str) -> Result<String> {
      parse_chat_response(NAME, StatusCode::OK, body)
   }

   #[test]
   fn test_defaults() {
      let config = Config { api_key: "key".to_string(), ..Config::default() };
      let client = OpenAIClient::new(&config).unwrap();
      assert_eq!(client.model(), "gpt-4o");
      assert_eq!(client.base_url(), "https://api.openai.com/v1");
   }

   #[test]
   fn test_request_shape() {
      let request = ChatRequest::new("gpt-4o", "be terse", "diff --git a/x b/x");
      let json = serde_json::to_value(&request).unwrap();
      assert_eq!(
         json,
         serde_json::json!({
            "model": "gpt-4o",
            "messages": [
               {"role": "system", "content": "be terse"},
               {"role": "user", "content": "diff --git a/x b/x"}
            ]
         })
      );
   }

   #[test]
   fn test_first_choice_text() {
      let body = r#"{
         "id": "chatcmpl-1",
         "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "fix(api): handle nil body"}},
            {"index": 1, "message": {"role": "assistant", "content": "second"}}
         ]
      }"#;
      assert_eq!(parse(body).unwrap(), "fix(api): handle nil body");
   }

   #[test]
   fn test_error_envelope() {
      let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
      match parse_chat_response(NAME, StatusCode::UNAUTHORIZED, body).unwrap_err() {
         AigitError::ProviderError { provider, message } => {
            assert_eq!(provider, "OpenAI");
            assert_eq!(message, "Incorrect API key provided");
         },
         other => panic!("unexpected error: {other}"),
      }
   }

   #[test]
   fn test_null_error_is_ignored() {
      let body = r#"{"choices": [{"message": {"content": "docs: update readme"}}], "error": null}"#;
      assert_eq!(parse(body).unwrap(), "docs: update readme");
   }

   #[test]
   fn test_empty_choices() {
      assert!(matches!(
         parse(r#"{"choices": []}"#).unwrap_err(),
         AigitError::EmptyResponse { provider: "OpenAI" }
      ));
   }

   #[test]
   fn test_null_content_is_empty_response() {
      let body = r#"{"choices": [{"message": {"content": null}}]}"#;
      assert!(matches!(parse(body).unwrap_err(), AigitError::EmptyResponse { .. }));
   }

   #[test]
   fn test_malformed_json_is_not_provider_error() {
      assert!(matches!(parse("{\"choices\": [").unwrap_err(), AigitError::JsonError(_)));
   }
}
