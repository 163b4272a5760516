//! The `config` command: show, set a single key, or interactive setup.

use std::io::{self, BufRead};

use crate::{
   config::{Config, Provider, mask_api_key},
   error::{AigitError, Result},
   style,
};

pub fn run_config(key: Option<&str>, value: Option<&str>, show: bool) -> Result<()> {
   if show {
      return show_config();
   }

   match (key, value) {
      (Some(key), Some(value)) => set_value(key, value),
      (Some(key), None) => Err(AigitError::ConfigInvalid(format!("missing value for key '{key}'"))),
      _ => {
         let stdin = io::stdin();
         let config = interactive_setup(Config::load_or_default()?, &mut stdin.lock())?;
         config.save()?;
         println!("\n{} Configuration saved successfully!", style::success(style::icons::SUCCESS));
         Ok(())
      },
   }
}

/// Rows printed by `config --show`
pub fn describe(config: &Config) -> Vec<(&'static str, String)> {
   let mut rows = vec![
      ("provider", config.provider.to_string()),
      ("api_key", mask_api_key(&config.api_key)),
      ("model", config.effective_model()),
      ("language", config.language.clone()),
   ];
   if let Some(base_url) = &config.base_url {
      rows.push(("base_url", base_url.clone()));
   }
   rows
}

fn show_config() -> Result<()> {
   let config = Config::load()?;
   println!("{}", style::section_header("Current Configuration", style::term_width()));
   for (key, value) in describe(&config) {
      println!("{:<10}{}", format!("{key}:"), value);
   }
   Ok(())
}

fn set_value(key: &str, value: &str) -> Result<()> {
   let mut config = Config::load_or_default()?;
   config.set(key, value)?;
   config.save()?;

   let shown = if key == "api_key" { mask_api_key(value) } else { value.to_string() };
   println!("{} Set {key} = {shown}", style::success(style::icons::SUCCESS));
   Ok(())
}

/// Walk through provider, key, model, language and base URL. Empty answers
/// keep the current value.
pub fn interactive_setup(mut config: Config, input: &mut impl BufRead) -> Result<Config> {
   println!("{}", style::section_header("aigit Configuration", style::term_width()));
   println!("\nSelect AI provider:");
   for (idx, provider) in Provider::ALL.iter().enumerate() {
      println!("  {}. {}", idx + 1, provider.label());
   }

   let current = Provider::ALL
      .iter()
      .position(|p| *p == config.provider)
      .map_or(1, |idx| idx + 1);
   let choice = style::prompt_line(input, &format!("Enter choice [{current}]: "))?;
   let previous_provider = config.provider;
   config.provider = match choice.parse::<usize>() {
      Ok(n) if (1..=Provider::ALL.len()).contains(&n) => Provider::ALL[n - 1],
      _ if choice.is_empty() => config.provider,
      _ => Provider::OpenAI,
   };
   if config.provider != previous_provider {
      // The old model name almost never exists on another provider
      config.model.clear();
   }

   let api_key = style::prompt_line(
      input,
      &format!("\nEnter API key for {} [{}]: ", config.provider, mask_api_key(&config.api_key)),
   )?;
   if !api_key.is_empty() {
      config.api_key = api_key;
   }
   if config.api_key.is_empty() {
      return Err(AigitError::ConfigMissing("API key is required".to_string()));
   }

   let model =
      style::prompt_line(input, &format!("\nEnter model name [{}]: ", config.effective_model()))?;
   config.model = if model.is_empty() { config.effective_model() } else { model };

   println!("\nSelect language for commit messages:");
   println!("  1. English");
   println!("  2. Chinese (中文)");
   let current_lang = if config.language == "zh" { "2" } else { "1" };
   let lang = style::prompt_line(input, &format!("Enter choice [{current_lang}]: "))?;
   let lang = if lang.is_empty() { current_lang } else { lang.as_str() };
   config.language = if lang == "2" { "zh" } else { "en" }.to_string();

   let current_url = config.base_url.clone().unwrap_or_else(|| "default".to_string());
   let base_url = style::prompt_line(input, &format!("\nEnter custom base URL [{current_url}]: "))?;
   if !base_url.is_empty() && base_url != "default" {
      config.base_url = Some(base_url);
   }

   Ok(config)
}

#[cfg(test)]
mod tests {
   use std::io::Cursor;

   use super::*;

   #[test]
   fn test_interactive_setup_from_scratch() {
      let mut input = Cursor::new("2\nsk-ant-api03-abcdefgh\n\n2\n\n");
      let config = interactive_setup(Config::default(), &mut input).unwrap();

      assert_eq!(config.provider, Provider::Claude);
      assert_eq!(config.api_key, "sk-ant-api03-abcdefgh");
      assert_eq!(config.model, "claude-sonnet-4-20250514");
      assert_eq!(config.language, "zh");
      assert!(config.base_url.is_none());
   }

   #[test]
   fn test_interactive_setup_keeps_existing_values() {
      let existing = Config {
         provider: Provider::OpenRouter,
         api_key:  "sk-or-v1-1234567890".to_string(),
         model:    "anthropic/claude-3.5-sonnet".to_string(),
         language: "zh".to_string(),
         base_url: Some("https://proxy.local/api/v1".to_string()),
      };
      let mut input = Cursor::new("\n\n\n\n\n");
      let config = interactive_setup(existing.clone(), &mut input).unwrap();
      assert_eq!(config, existing);
   }

   #[test]
   fn test_interactive_setup_requires_api_key() {
      let mut input = Cursor::new("1\n\n");
      let err = interactive_setup(Config::default(), &mut input).unwrap_err();
      assert!(matches!(err, AigitError::ConfigMissing(_)));
   }

   #[test]
   fn test_interactive_setup_switching_provider_resets_model() {
      let existing = Config {
         api_key: "sk-1234567890".to_string(),
         model: "gpt-4o-mini".to_string(),
         ..Config::default()
      };
      let mut input = Cursor::new("3\n\n\n1\nhttps://gemini.proxy/v1beta\n");
      let config = interactive_setup(existing, &mut input).unwrap();

      assert_eq!(config.provider, Provider::Google);
      assert_eq!(config.model, "gemini-1.5-pro");
      assert_eq!(config.language, "en");
      assert_eq!(config.base_url.as_deref(), Some("https://gemini.proxy/v1beta"));
   }

   #[test]
   fn test_describe_masks_key() {
      let config = Config {
         api_key: "sk-proj-abcdef123456".to_string(),
         base_url: Some("http://localhost:4000".to_string()),
         ..Config::default()
      };
      let rows = describe(&config);
      assert_eq!(rows[0], ("provider", "openai".to_string()));
      assert_eq!(rows[1], ("api_key", "sk-p****3456".to_string()));
      assert_eq!(rows[2], ("model", "gpt-4o".to_string()));
      assert_eq!(rows[4], ("base_url", "http://localhost:4000".to_string()));
   }

   #[test]
   fn test_describe_omits_unset_base_url() {
      let rows = describe(&Config { api_key: "k".to_string(), ..Config::default() });
      assert_eq!(rows.len(), 4);
   }
}
