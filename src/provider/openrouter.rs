use std::time::Duration;

use reqwest::blocking::Client;

use super::{
   Provider, build_http_client,
   openai::{ChatRequest, parse_chat_response},
   send,
};
use crate::{config::Config, error::Result};

const NAME: &str = "OpenRouter";

/// Attribution headers OpenRouter uses to identify the calling app
const APP_REFERER: &str = env!("CARGO_PKG_REPOSITORY");
const APP_TITLE: &str = "aigit";

/// OpenRouter speaks the chat completions format with extra attribution
/// headers
pub struct OpenRouterClient {
   http:     Client,
   api_key:  String,
   model:    String,
   base_url: String,
}

impl OpenRouterClient {
   pub fn new(config: &Config) -> Result<Self> {
      Ok(Self {
         http:     build_http_client()?,
         api_key:  config.api_key.clone(),
         model:    config.effective_model(),
         base_url: config.effective_base_url(),
      })
   }
}

impl Provider for OpenRouterClient {
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
      tracing::debug!(%url, model = %self.model, "sending OpenRouter request");

      let request = self
         .http
         .post(url)
         .header("Authorization", format!("Bearer {}", self.api_key))
         .header("HTTP-Referer", APP_REFERER)
         .header("X-Title", APP_TITLE)
         .json(&ChatRequest::new(&self.model, system_prompt, user_prompt));

      let (status, body) = send(request, timeout)?;
      parse_chat_response(NAME, status, &body)
   }
}
