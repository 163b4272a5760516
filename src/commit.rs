use std::{io, path::Path, time::Duration};

use crate::{
   config::Config,
   error::{AigitError, Result},
   git, provider, style,
};

/// Deadline for a single commit message request
pub const COMMIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Answer to the "Commit with this message?" prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
   Accept,
   Edit,
   Abort,
}

/// Parse the confirmation answer; an empty answer accepts
pub fn parse_choice(answer: &str) -> Choice {
   match answer.trim().to_lowercase().as_str() {
      "" | "y" | "yes" => Choice::Accept,
      "e" | "edit" => Choice::Edit,
      _ => Choice::Abort,
   }
}

/// Strip surrounding whitespace and a wrapping markdown code fence
pub fn clean_message(raw: &str) -> String {
   let trimmed = raw.trim();
   if trimmed.starts_with("```") && trimmed.ends_with("```") {
      let lines: Vec<&str> = trimmed.lines().collect();
      if lines.len() >= 3 {
         return lines[1..lines.len() - 1].join("\n").trim().to_string();
      }
   }
   trimmed.to_string()
}

fn do_commit(message: &str, dir: &Path) -> Result<()> {
   git::commit(message, dir)?;
   println!("{} Committed successfully!", style::success(style::icons::SUCCESS));
   Ok(())
}

/// Generate a message for the staged changes and commit it, after
/// confirmation unless `yes` is set
pub fn run_commit(dir: &Path, yes: bool, all: bool) -> Result<()> {
   git::ensure_git_repo(dir)?;
   let config = Config::load()?;

   if all {
      git::stage_all(dir)?;
      println!("{} Staged all changes", style::success(style::icons::SUCCESS));
   }

   let diff = git::staged_diff(dir)?;
   if diff.trim().is_empty() {
      return Err(AigitError::NoChanges { what: "staged".to_string() });
   }

   match git::staged_files(dir) {
      Ok(files) if !files.is_empty() => {
         println!("Staged files:");
         for file in files {
            println!("  {} {}", style::icons::BULLET, style::dim(&file));
         }
         println!();
      },
      Ok(_) => {},
      Err(e) => tracing::warn!("could not list staged files: {e}"),
   }

   let client = provider::new_client(&config)?;
   let raw = style::with_spinner_result("Generating commit message...", || {
      client.generate_commit_message(&diff, &config.language, COMMIT_TIMEOUT)
   })?;
   let message = clean_message(&raw);
   if message.is_empty() {
      return Err(AigitError::EmptyResponse { provider: client.name() });
   }

   let width = style::term_width();
   println!("\n{}", style::section_header("Generated Commit Message", width));
   println!("{message}");
   println!("{}", style::separator(width));

   if yes {
      return do_commit(&message, dir);
   }

   let stdin = io::stdin();
   let mut input = stdin.lock();
   let answer = style::prompt_line(&mut input, "\nCommit with this message? [Y/n/e(dit)]: ")?;

   match parse_choice(&answer) {
      Choice::Accept => do_commit(&message, dir),
      Choice::Edit => {
         let edited = style::prompt_line(&mut input, "Enter new message: ")?;
         if edited.is_empty() {
            println!("Empty message, commit aborted.");
            Ok(())
         } else {
            do_commit(&edited, dir)
         }
      },
      Choice::Abort => {
         println!("Commit aborted.");
         Ok(())
      },
   }
}
