//! AI provider clients.
//!
//! Every backend implements [`Provider::call`]; commit message generation and
//! code review are provided on top of it and differ only in the system prompt.

mod claude;
mod google;
mod openai;
mod openrouter;

use std::time::Duration;

use reqwest::{
   StatusCode,
   blocking::{Client, RequestBuilder},
};
use serde::{Deserialize, de::DeserializeOwned};

pub use self::{
   claude::ClaudeClient, google::GoogleClient, openai::OpenAIClient,
   openrouter::OpenRouterClient,
};
use crate::{
   config::{Config, Provider as ProviderKind},
   error::{AigitError, Result},
   prompts,
};

/// HTTP connection timeout; the overall deadline is chosen per call
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Longest non-JSON error body kept in [`AigitError::ApiError`]
const MAX_ERROR_BODY_CHARS: usize = 500;

pub trait Provider {
   /// Display name used in error messages
   fn name(&self) -> &'static str;

   fn model(&self) -> &str;

   fn base_url(&self) -> &str;

   /// Send one system prompt + user message and return the first text reply.
   /// A single attempt, aborted with [`AigitError::Timeout`] after `timeout`.
   fn call(&self, system_prompt: &str, user_prompt: &str, timeout: Duration) -> Result<String>;

   fn generate_commit_message(
      &self,
      diff: &str,
      language: &str,
      timeout: Duration,
   ) -> Result<String> {
      let system_prompt = prompts::commit_prompt(language)?;
      self.call(&system_prompt, diff, timeout)
   }

   fn review_code(&self, diff: &str, language: &str, timeout: Duration) -> Result<String> {
      let system_prompt = prompts::review_prompt(language)?;
      self.call(&system_prompt, diff, timeout)
   }
}

/// Build the client for the configured provider
pub fn new_client(config: &Config) -> Result<Box<dyn Provider>> {
   let client: Box<dyn Provider> = match config.provider {
      ProviderKind::OpenAI => Box::new(OpenAIClient::new(config)?),
      ProviderKind::Claude => Box::new(ClaudeClient::new(config)?),
      ProviderKind::Google => Box::new(GoogleClient::new(config)?),
      ProviderKind::OpenRouter => Box::new(OpenRouterClient::new(config)?),
   };
   tracing::debug!(
      provider = client.name(),
      model = client.model(),
      base_url = client.base_url(),
      "created provider client"
   );
   Ok(client)
}

/// Build the blocking HTTP client shared by all backends
fn build_http_client() -> Result<Client> {
   Client::builder()
      .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
      .build()
      .map_err(AigitError::HttpError)
}

/// Send a prepared request and read the whole body
fn send(request: RequestBuilder, timeout: Duration) -> Result<(StatusCode, String)> {
   let response = request
      .header("content-type", "application/json")
      .timeout(timeout)
      .send()
      .map_err(|e| request_error(e, timeout))?;

   let status = response.status();
   let body = response.text().map_err(|e| request_error(e, timeout))?;
   tracing::debug!(status = status.as_u16(), bytes = body.len(), "received provider response");
   Ok((status, body))
}

fn request_error(e: reqwest::Error, timeout: Duration) -> AigitError {
   if e.is_timeout() {
      AigitError::Timeout { secs: timeout.as_secs() }
   } else {
      // The Gemini key is part of the URL
      AigitError::HttpError(e.without_url())
   }
}

/// Decode a response envelope. A body that is not valid JSON stays a JSON
/// error, unless the HTTP status already says the request failed.
fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
   match serde_json::from_str(body) {
      Ok(envelope) => Ok(envelope),
      Err(_) if !status.is_success() => Err(AigitError::ApiError {
         status: status.as_u16(),
         body:   body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
      }),
      Err(e) => Err(AigitError::JsonError(e)),
   }
}

/// The `error` member shared by all backend envelopes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
   Detailed {
      #[serde(default)]
      message: String,
   },
   Plain(String),
}

impl ApiErrorBody {
   fn into_error(self, provider: &'static str) -> AigitError {
      let message = match self {
         Self::Detailed { message } | Self::Plain(message) => message,
      };
      let message = if message.is_empty() { "unknown error".to_string() } else { message };
      AigitError::ProviderError { provider, message }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   fn config_for(provider: ProviderKind) -> Config {
      Config { provider, api_key: "test-key-123456".to_string(), ..Config::default() }
   }

   #[test]
   fn test_new_client_selects_backend() {
      let cases = [
         (ProviderKind::OpenAI, "OpenAI"),
         (ProviderKind::Claude, "Claude"),
         (ProviderKind::Google, "Google"),
         (ProviderKind::OpenRouter, "OpenRouter"),
      ];
      for (kind, name) in cases {
         let client = new_client(&config_for(kind)).unwrap();
         assert_eq!(client.name(), name);
         assert_eq!(client.model(), kind.default_model());
         assert_eq!(client.base_url(), kind.default_base_url());
      }
   }

   #[test]
   fn test_unknown_provider_in_file_builds_openai_client() {
      let config: Config =
         serde_json::from_str(r#"{"provider":"cohere","api_key":"abc"}"#).unwrap();
      let client = new_client(&config).unwrap();
      assert_eq!(client.name(), "OpenAI");
   }

   #[test]
   fn test_overrides_are_respected() {
      let config = Config {
         model: "my-model".to_string(),
         base_url: Some("http://localhost:11434/v1/".to_string()),
         ..config_for(ProviderKind::OpenAI)
      };
      let client = new_client(&config).unwrap();
      assert_eq!(client.model(), "my-model");
      assert_eq!(client.base_url(), "http://localhost:11434/v1");
   }

   #[test]
   fn test_decode_non_json_failure_status_is_api_error() {
      let err = decode::<serde_json::Value>(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>")
         .unwrap_err();
      match err {
         AigitError::ApiError { status, body } => {
            assert_eq!(status, 502);
            assert!(body.contains("bad gateway"));
         },
         other => panic!("unexpected error: {other}"),
      }
   }

   #[test]
   fn test_decode_non_json_success_is_json_error() {
      let err = decode::<serde_json::Value>(StatusCode::OK, "not json").unwrap_err();
      assert!(matches!(err, AigitError::JsonError(_)));
   }

   #[test]
   fn test_error_body_variants() {
      let detailed: ApiErrorBody = serde_json::from_str(r#"{"message":"quota"}"#).unwrap();
      let plain: ApiErrorBody = serde_json::from_str(r#""rate limited""#).unwrap();
      let empty: ApiErrorBody = serde_json::from_str("{}").unwrap();

      assert_eq!(detailed.into_error("OpenAI").to_string(), "OpenAI API error: quota");
      assert_eq!(plain.into_error("Google").to_string(), "Google API error: rate limited");
      assert_eq!(empty.into_error("Claude").to_string(), "Claude API error: unknown error");
   }

   #[test]
   fn test_unanswered_request_times_out() {
      // A proxy would answer on the listener's behalf
      if ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]
         .iter()
         .any(|var| std::env::var(var).is_ok_and(|v| !v.is_empty()))
      {
         return;
      }
      // Connections queue in the backlog and never get a reply
      let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
      let addr = listener.local_addr().unwrap();
      let config =
         Config { base_url: Some(format!("http://{addr}/v1")), ..config_for(ProviderKind::OpenAI) };
      let client = new_client(&config).unwrap();

      let err = client.call("system", "diff", Duration::from_secs(1)).unwrap_err();
      assert!(matches!(err, AigitError::Timeout { secs: 1 }), "unexpected error: {err}");
      drop(listener);
   }
}
