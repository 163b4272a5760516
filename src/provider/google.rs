use std::time::Duration;

use reqwest::{StatusCode, Url, blocking::Client};
use serde::{Deserialize, Serialize};

use super::{ApiErrorBody, Provider, build_http_client, decode, send};
use crate::{
   config::Config,
   error::{AigitError, Result},
};

const NAME: &str = "Google";

/// Client for the Gemini `generateContent` API. The key travels as a query
/// parameter, so the full URL must never be logged.
pub struct GoogleClient {
   http:     Client,
   api_key:  String,
   model:    String,
   base_url: String,
}

impl GoogleClient {
   pub fn new(config: &Config) -> Result<Self> {
      Ok(Self {
         http:     build_http_client()?,
         api_key:  config.api_key.clone(),
         model:    config.effective_model(),
         base_url: config.effective_base_url(),
      })
   }

   fn endpoint(&self) -> String {
      format!("{}/models/{}:generateContent", self.base_url, self.model)
   }

   /// Endpoint with the URL-encoded key appended
   fn request_url(&self) -> Result<Url> {
      Url::parse_with_params(&self.endpoint(), [("key", self.api_key.as_str())])
         .map_err(|e| AigitError::ConfigInvalid(format!("invalid Gemini base URL: {e}")))
   }
}

impl Provider for GoogleClient {
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
      tracing::debug!(url = %self.endpoint(), "sending Gemini generateContent request");

      let request = self
         .http
         .post(self.request_url()?)
         .json(&GenerateRequest::new(system_prompt, user_prompt));

      let (status, body) = send(request, timeout)?;
      parse_response(status, &body)
   }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
   contents:           [Content<'a>; 1],
   #[serde(skip_serializing_if = "Option::is_none")]
   system_instruction: Option<Content<'a>>,
}

impl<'a> GenerateRequest<'a> {
   fn new(system_prompt: &'a str, user_prompt: &'a str) -> Self {
      let user = Content { role: Some("user"), parts: vec![Part { text: user_prompt }] };
      let system = Content { role: None, parts: vec![Part { text: system_prompt }] };
      Self { contents: [user], system_instruction: Some(system) }
   }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
   parts: Vec<Part<'a>>,
   #[serde(skip_serializing_if = "Option::is_none")]
   role:  Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
   text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
   #[serde(default)]
   candidates: Vec<Candidate>,
   #[serde(default)]
   error:      Option<ApiErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
   #[serde(default)]
   content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
   #[serde(default)]
   parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
   #[serde(default)]
   text: String,
}

/// Extract the first candidate's first part text
fn parse_response(status: StatusCode, body: &str) -> Result<String> {
   let response: GenerateResponse = decode(status, body)?;

   if let Some(error) = response.error {
      return Err(error.into_error(NAME));
   }

   response
      .candidates
      .into_iter()
      .next()
      .and_then(|candidate| candidate.content.parts.into_iter().next())
      .map(|part| part.text)
      .ok_or(AigitError::EmptyResponse { provider: NAME })
}
