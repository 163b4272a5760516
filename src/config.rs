use std::{
   fmt,
   path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AigitError, Result};

/// AI backend selected in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
   #[default]
   OpenAI,
   Claude,
   Google,
   OpenRouter,
}

impl Provider {
   pub const ALL: [Self; 4] = [Self::OpenAI, Self::Claude, Self::Google, Self::OpenRouter];

   pub fn from_name(name: &str) -> Option<Self> {
      match name.trim().to_lowercase().as_str() {
         "openai" => Some(Self::OpenAI),
         "claude" => Some(Self::Claude),
         "google" => Some(Self::Google),
         "openrouter" => Some(Self::OpenRouter),
         _ => None,
      }
   }

   pub const fn as_str(self) -> &'static str {
      match self {
         Self::OpenAI => "openai",
         Self::Claude => "claude",
         Self::Google => "google",
         Self::OpenRouter => "openrouter",
      }
   }

   /// Human-readable label used in the setup menu
   pub const fn label(self) -> &'static str {
      match self {
         Self::OpenAI => "OpenAI (GPT-4)",
         Self::Claude => "Claude (Anthropic)",
         Self::Google => "Google (Gemini)",
         Self::OpenRouter => "OpenRouter",
      }
   }

   pub const fn default_model(self) -> &'static str {
      match self {
         Self::OpenAI => "gpt-4o",
         Self::Claude => "claude-sonnet-4-20250514",
         Self::Google => "gemini-1.5-pro",
         Self::OpenRouter => "openai/gpt-4o",
      }
   }

   pub const fn default_base_url(self) -> &'static str {
      match self {
         Self::OpenAI => "https://api.openai.com/v1",
         Self::Claude => "https://api.anthropic.com/v1",
         Self::Google => "https://generativelanguage.googleapis.com/v1beta",
         Self::OpenRouter => "https://openrouter.ai/api/v1",
      }
   }
}

impl fmt::Display for Provider {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str(self.as_str())
   }
}

// Unknown names fall back to the OpenAI-compatible client instead of failing the load.
impl<'de> Deserialize<'de> for Provider {
   fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
   where
      D: Deserializer<'de>,
   {
      let name = String::deserialize(deserializer)?;
      Ok(Self::from_name(&name).unwrap_or_else(|| {
         if !name.is_empty() {
            tracing::warn!(provider = %name, "unknown provider in config, using openai");
         }
         Self::OpenAI
      }))
   }
}

/// Languages with dedicated prompt templates
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "zh"];

/// Keys accepted by `aigit config <key> <value>`
pub const CONFIG_KEYS: &[&str] = &["provider", "api_key", "model", "language", "base_url"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
   pub provider: Provider,
   pub api_key:  String,
   pub model:    String,

   /// Output language for prompts ("en" or "zh")
   pub language: String,

   #[serde(skip_serializing_if = "Option::is_none")]
   pub base_url: Option<String>,
}

impl Default for Config {
   fn default() -> Self {
      Self {
         provider: Provider::OpenAI,
         api_key:  String::new(),
         model:    String::new(),
         language: "en".to_string(),
         base_url: None,
      }
   }
}

impl Config {
   /// Load config from the default location (~/.aigit/config.json)
   ///
   /// `AIGIT_CONFIG` overrides the path and `AIGIT_API_KEY` overrides the
   /// stored key.
   pub fn load() -> Result<Self> {
      Self::load_from(&Self::config_path()?)
   }

   /// Load config from a specific file, requiring an API key
   pub fn load_from(path: &Path) -> Result<Self> {
      Self::load_with_key_override(path, std::env::var("AIGIT_API_KEY").ok())
   }

   fn load_with_key_override(path: &Path, key_override: Option<String>) -> Result<Self> {
      let mut config = Self::read_from(path)?;
      if let Some(api_key) = key_override
         && !api_key.is_empty()
      {
         config.api_key = api_key;
      }

      if config.api_key.trim().is_empty() {
         return Err(AigitError::ConfigMissing(
            "api_key is required, run 'aigit config' to set it".to_string(),
         ));
      }

      tracing::debug!(path = %path.display(), provider = %config.provider, "loaded config");
      Ok(config)
   }

   /// Parse the stored file as is: no environment overrides, no required keys
   pub fn read_from(path: &Path) -> Result<Self> {
      let contents = match std::fs::read_to_string(path) {
         Ok(contents) => contents,
         Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AigitError::ConfigMissing(
               "config not found, please run 'aigit config' first".to_string(),
            ));
         },
         Err(e) => return Err(AigitError::IoError(e)),
      };
      Ok(serde_json::from_str(&contents)?)
   }

   /// Load the stored config for editing. Only a missing file starts fresh;
   /// a malformed one is an error rather than being overwritten.
   pub fn load_or_default() -> Result<Self> {
      Self::load_or_default_from(&Self::config_path()?)
   }

   pub fn load_or_default_from(path: &Path) -> Result<Self> {
      match Self::read_from(path) {
         Err(AigitError::ConfigMissing(_)) => {
            tracing::debug!(path = %path.display(), "no config yet, starting from defaults");
            Ok(Self::default())
         },
         other => other,
      }
   }

   pub fn save(&self) -> Result<()> {
      self.save_to(&Self::config_path()?)
   }

   /// Write config as indented JSON, readable only by the owner
   pub fn save_to(&self, path: &Path) -> Result<()> {
      if let Some(parent) = path.parent()
         && !parent.as_os_str().is_empty()
      {
         std::fs::create_dir_all(parent)?;
      }

      let data = serde_json::to_string_pretty(self)?;
      std::fs::write(path, data)?;

      #[cfg(unix)]
      {
         use std::os::unix::fs::PermissionsExt;
         std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
      }

      tracing::debug!(path = %path.display(), "saved config");
      Ok(())
   }

   /// Get config path (platform-safe)
   /// `AIGIT_CONFIG` wins, then HOME (Unix/macOS), then USERPROFILE (Windows)
   pub fn config_path() -> Result<PathBuf> {
      if let Ok(custom_path) = std::env::var("AIGIT_CONFIG") {
         return Ok(PathBuf::from(custom_path));
      }

      std::env::var("HOME")
         .or_else(|_| std::env::var("USERPROFILE"))
         .map(|home| PathBuf::from(home).join(".aigit").join("config.json"))
         .map_err(|_| {
            AigitError::Other("No home directory found (tried HOME and USERPROFILE)".to_string())
         })
   }

   /// Set a single key, validating enum-like values
   pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
      match key {
         "provider" => {
            self.provider = Provider::from_name(value).ok_or_else(|| {
               AigitError::ConfigInvalid(format!(
                  "invalid provider: {value} (use: openai, claude, google, openrouter)"
               ))
            })?;
         },
         "api_key" => self.api_key = value.to_string(),
         "model" => self.model = value.to_string(),
         "language" => {
            if !SUPPORTED_LANGUAGES.contains(&value) {
               return Err(AigitError::ConfigInvalid(format!(
                  "invalid language: {value} (use: en, zh)"
               )));
            }
            self.language = value.to_string();
         },
         "base_url" => {
            self.base_url = if value.trim().is_empty() { None } else { Some(value.to_string()) };
         },
         _ => {
            return Err(AigitError::ConfigInvalid(format!(
               "unknown config key: {key} (use: {})",
               CONFIG_KEYS.join(", ")
            )));
         },
      }
      Ok(())
   }

   /// Configured model, or the provider default when unset
   pub fn effective_model(&self) -> String {
      let model = self.model.trim();
      if model.is_empty() {
         self.provider.default_model().to_string()
      } else {
         model.to_string()
      }
   }

   /// Configured base URL without trailing slash, or the provider default
   pub fn effective_base_url(&self) -> String {
      match self.base_url.as_deref().map(str::trim) {
         Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
         _ => self.provider.default_base_url().to_string(),
      }
   }
}

/// Mask an API key for display: first and last four characters survive when
/// the key is longer than eight characters.
pub fn mask_api_key(key: &str) -> String {
   let chars: Vec<char> = key.chars().collect();
   if chars.len() <= 8 {
      return "****".to_string();
   }
   let head: String = chars[..4].iter().collect();
   let tail: String = chars[chars.len() - 4..].iter().collect();
   format!("{head}****{tail}")
}
