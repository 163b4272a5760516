use std::time::Duration;

use reqwest::{StatusCode, blocking::Client};
use serde::{Deserialize, Serialize};

use super::{ApiErrorBody, Provider, build_http_client, decode, send};
use crate::{
   config::Config,
   error::{AigitError, Result},
};

const NAME: &str = "Claude";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Client for the Anthropic messages API
pub struct ClaudeClient {
   http:     Client,
   api_key:  String,
   model:    String,
   base_url: String,
}

impl ClaudeClient {
   pub fn new(config: &Config) -> Result<Self> {
      Ok(Self {
         http:     build_http_client()?,
         api_key:  config.api_key.clone(),
         model:    config.effective_model(),
         base_url: config.effective_base_url(),
      })
   }
}

impl Provider for ClaudeClient {
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
      let url = format!("{}/messages", self.base_url);
      tracing::debug!(%url, model = %self.model, "sending Claude messages request");

      let request = self
         .http
         .post(url)
         .header("x-api-key", &self.api_key)
         .header("anthropic-version", ANTHROPIC_VERSION)
         .json(&MessagesRequest::new(&self.model, system_prompt, user_prompt));

      let (status, body) = send(request, timeout)?;
      parse_response(status, &body)
   }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
   model:      &'a str,
   max_tokens: u32,
   system:     &'a str,
   messages:   [Message<'a>; 1],
}

impl<'a> MessagesRequest<'a> {
   const fn new(model: &'a str, system_prompt: &'a str, user_prompt: &'a str) -> Self {
      Self {
         model,
         max_tokens: MAX_TOKENS,
         system: system_prompt,
         messages: [Message { role: "user", content: user_prompt }],
      }
   }
}

#[derive(Debug, Serialize)]
struct Message<'a> {
   role:    &'static str,
   content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
   #[serde(default)]
   content: Vec<ContentBlock>,
   #[serde(default)]
   error:   Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
   #[serde(default)]
   text: String,
}

/// Extract the first content block's text
fn parse_response(status: StatusCode, body: &str) -> Result<String> {
   let response: MessagesResponse = decode(status, body)?;

   if let Some(error) = response.error {
      return Err(error.into_error(NAME));
   }

   response
      .content
      .into_iter()
      .next()
      .map(|block| block.text)
      .ok_or(AigitError::EmptyResponse { provider: NAME })
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::config::Provider as ProviderKind;

   fn parse(body: &str) -> Result<String> {
      parse_response(StatusCode::OK, body)
   }

   #[test]
   fn test_defaults() {
      let config =
         Config { provider: ProviderKind::Claude, api_key: "key".to_string(), ..Config::default() };
      let client = ClaudeClient::new(&config).unwrap();
      assert_eq!(client.model(), "claude-sonnet-4-20250514");
      assert_eq!(client.base_url(), "https://api.anthropic.com/v1");
   }

   #[test]
   fn test_request_shape() {
      let request =
         MessagesRequest::new("claude-sonnet-4-20250514", "review this", "+fn main() {}");
      let json = serde_json::to_value(&request).unwrap();
      assert_eq!(
         json,
         serde_json::json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 4096,
            "system": "review this",
            "messages": [{"role": "user", "content": "+fn main() {}"}]
         })
      );
   }

   #[test]
   fn test_first_content_block() {
      assert_eq!(parse(r#"{"content":[{"text":"feat: add login"}]}"#).unwrap(), "feat: add login");
   }

   #[test]
   fn test_full_envelope() {
      let body = r#"{
         "id": "msg_01",
         "type": "message",
         "role": "assistant",
         "content": [{"type": "text", "text": "fix(db): close pool on shutdown"}],
         "stop_reason": "end_turn"
      }"#;
      assert_eq!(parse(body).unwrap(), "fix(db): close pool on shutdown");
   }

   #[test]
   fn test_error_envelope() {
      let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
      match parse_response(StatusCode::from_u16(529).unwrap(), body).unwrap_err() {
         AigitError::ProviderError { provider, message } => {
            assert_eq!(provider, "Claude");
            assert_eq!(message, "Overloaded");
         },
         other => panic!("unexpected error: {other}"),
      }
   }

   #[test]
   fn test_empty_content() {
      assert!(matches!(
         parse(r#"{"content":[]}"#).unwrap_err(),
         AigitError::EmptyResponse { provider: "Claude" }
      ));
   }

   #[test]
   fn test_malformed_json_is_not_provider_error() {
      assert!(matches!(parse("{\"content\": [{\"text\"").unwrap_err(), AigitError::JsonError(_)));
   }
}
