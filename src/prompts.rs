//! System prompts, embedded into the binary and selected by language.

use rust_embed::RustEmbed;

use crate::error::{AigitError, Result};

/// Embedded prompts folder (compiled into binary)
#[derive(RustEmbed)]
#[folder = "prompts/"]
struct Prompts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
   CommitMessage,
   Review,
}

impl PromptKind {
   const fn category(self) -> &'static str {
      match self {
         Self::CommitMessage => "commit",
         Self::Review => "review",
      }
   }
}

/// Template language for a configured language code. Only "zh" has its own
/// template; everything else gets English.
pub fn template_language(language: &str) -> &'static str {
   if language == "zh" { "zh" } else { "en" }
}

/// Path of the embedded template for a prompt kind and language code
pub fn template_path(kind: PromptKind, language: &str) -> String {
   format!("{}/{}.md", kind.category(), template_language(language))
}

/// Load the system prompt for a prompt kind and language code
pub fn system_prompt(kind: PromptKind, language: &str) -> Result<String> {
   let path = template_path(kind, language);
   let file = Prompts::get(&path)
      .ok_or_else(|| AigitError::Other(format!("Embedded prompt {path} not found")))?;

   std::str::from_utf8(file.data.as_ref())
      .map(|s| s.trim_end().to_string())
      .map_err(|e| AigitError::Other(format!("Embedded prompt {path} is not valid UTF-8: {e}")))
}

pub fn commit_prompt(language: &str) -> Result<String> {
   system_prompt(PromptKind::CommitMessage, language)
}

pub fn review_prompt(language: &str) -> Result<String> {
   system_prompt(PromptKind::Review, language)
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_template_language_is_total() {
      assert_eq!(template_language("zh"), "zh");
      for other in ["en", "", "ZH", "zh-CN", "fr", " zh"] {
         assert_eq!(template_language(other), "en", "language {other:?}");
      }
   }

   #[test]
   fn test_template_paths() {
      assert_eq!(template_path(PromptKind::CommitMessage, "zh"), "commit/zh.md");
      assert_eq!(template_path(PromptKind::CommitMessage, "de"), "commit/en.md");
      assert_eq!(template_path(PromptKind::Review, "zh"), "review/zh.md");
      assert_eq!(template_path(PromptKind::Review, ""), "review/en.md");
   }

   #[test]
   fn test_commit_prompts() {
      let en = commit_prompt("en").unwrap();
      assert!(en.contains("conventional commit format"));
      assert!(en.contains("Output ONLY the commit message"));

      let zh = commit_prompt("zh").unwrap();
      assert!(zh.contains("约定式提交格式"));
      assert_eq!(commit_prompt("").unwrap(), en);
   }

   #[test]
   fn test_review_prompts() {
      let en = review_prompt("en").unwrap();
      assert!(en.contains("HIGH/MEDIUM/LOW"));

      let zh = review_prompt("zh").unwrap();
      assert!(zh.contains("高/中/低"));
      assert_eq!(review_prompt("ja").unwrap(), en);
   }
}
