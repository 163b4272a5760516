use std::{path::Path, time::Duration};

use crate::{
   config::Config,
   error::{AigitError, Result},
   git, provider, style,
};

/// Deadline for a single review request
pub const REVIEW_TIMEOUT: Duration = Duration::from_secs(120);

// Clean markers are checked first so "No critical issues found." is not read
// as critical.
const CLEAN_MARKERS: &[&str] =
   &["NO CRITICAL", "NO ISSUE", "NO SIGNIFICANT", "LOOKS GOOD", "NO PROBLEM", "未发现"];
const SEVERITY_LABEL: &str = "严重程度";

/// Severity class of one line of review output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
   High,
   Medium,
   Low,
   Clean,
   Plain,
}

fn word_severity(word: &str) -> Option<Severity> {
   match word {
      "HIGH" | "CRITICAL" => Some(Severity::High),
      "MEDIUM" | "WARN" | "WARNING" => Some(Severity::Medium),
      "LOW" | "INFO" => Some(Severity::Low),
      _ => None,
   }
}

const fn level_severity(level: char) -> Option<Severity> {
   match level {
      '高' => Some(Severity::High),
      '中' => Some(Severity::Medium),
      '低' => Some(Severity::Low),
      _ => None,
   }
}

/// `严重程度：高` style label
fn labelled_level(line: &str) -> Option<Severity> {
   let (_, rest) = line.split_once(SEVERITY_LABEL)?;
   rest
      .chars()
      .find(|c| !matches!(c, ':' | '：' | '(' | '（' | '[' | '【' | ' '))
      .and_then(level_severity)
}

/// First whole severity word, so "highly" or "slow" never match
fn tagged_word(upper: &str) -> Option<Severity> {
   upper.split(|c: char| !c.is_ascii_alphanumeric()).find_map(word_severity)
}

/// `[高]`, `【中】` or `（低）` anywhere in the line
fn bracketed_level(line: &str) -> Option<Severity> {
   let chars: Vec<char> = line.chars().collect();
   chars.windows(3).find_map(|w| match (w[0], w[2]) {
      ('[', ']') | ('【', '】') | ('(', ')') | ('（', '）') => level_severity(w[1]),
      _ => None,
   })
}

pub fn classify_line(line: &str) -> Severity {
   let upper = line.to_uppercase();
   if CLEAN_MARKERS.iter().any(|marker| upper.contains(marker)) {
      return Severity::Clean;
   }
   labelled_level(line)
      .or_else(|| tagged_word(&upper))
      .or_else(|| bracketed_level(line))
      .unwrap_or(Severity::Plain)
}

/// Whether any line of the review reports a high severity issue
pub fn has_high_severity(review: &str) -> bool {
   review.lines().any(|line| classify_line(line) == Severity::High)
}

pub fn colorize_line(line: &str) -> String {
   match classify_line(line) {
      Severity::High => style::severity_high(line),
      Severity::Medium => style::severity_medium(line),
      Severity::Low => style::severity_low(line),
      Severity::Clean => style::success(line),
      Severity::Plain => line.to_string(),
   }
}

/// Review staged changes, or everything uncommitted. In hook mode a high
/// severity finding fails the command so the pre-commit hook aborts.
pub fn run_review(dir: &Path, staged: bool, hook: bool) -> Result<()> {
   git::ensure_git_repo(dir)?;
   let config = Config::load()?;

   let diff = if staged {
      let diff = git::staged_diff(dir)?;
      if diff.trim().is_empty() {
         return Err(AigitError::NoChanges { what: "staged".to_string() });
      }
      diff
   } else {
      let diff = git::all_diff(dir)?;
      if diff.trim().is_empty() {
         println!("No changes to review.");
         return Ok(());
      }
      diff
   };

   let client = provider::new_client(&config)?;
   let message = if staged { "Reviewing staged changes..." } else { "Reviewing all changes..." };
   let review = style::with_spinner_result(message, || {
      client.review_code(&diff, &config.language, REVIEW_TIMEOUT)
   })?;

   let width = style::term_width();
   println!("\n{}", style::section_header("Code Review Results", width));
   for line in review.lines() {
      println!("{}", colorize_line(line));
   }
   println!("{}", style::separator(width));

   if hook && has_high_severity(&review) {
      return Err(AigitError::ReviewBlocked);
   }
   Ok(())
}
