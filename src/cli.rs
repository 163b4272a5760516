use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
   name = "aigit",
   author,
   version,
   about = "AI-powered git commit message generator and code reviewer",
   long_about = None
)]
pub struct Cli {
   /// Repository to operate on
   #[arg(long, global = true, default_value = ".")]
   pub dir: PathBuf,

   /// Debug logging to stderr (overridden by `RUST_LOG`)
   #[arg(long, short = 'v', global = true)]
   pub verbose: bool,

   #[command(subcommand)]
   pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
   /// Configure provider, API key, model and language
   Config {
      /// Config key to set (provider, api_key, model, language, base_url)
      key:   Option<String>,
      /// Value for the key
      value: Option<String>,

      /// Print the current configuration
      #[arg(long)]
      show: bool,
   },

   /// Generate a commit message for staged changes and commit
   Commit {
      /// Commit without asking for confirmation
      #[arg(long, short = 'y')]
      yes: bool,

      /// Stage all changes first
      #[arg(long, short = 'a')]
      all: bool,
   },

   /// Review uncommitted changes
   Review {
      /// Only review staged changes
      #[arg(long, short = 's')]
      staged: bool,

      /// Exit non-zero on high severity findings (used by the pre-commit hook)
      #[arg(long)]
      hook: bool,
   },

   /// Manage the pre-commit review hook
   Hooks {
      #[command(subcommand)]
      action: HookAction,
   },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
   /// Install the pre-commit hook
   Install,
   /// Remove the pre-commit hook and restore any backup
   Uninstall,
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_parse_config_set() {
      let cli = Cli::try_parse_from(["aigit", "config", "provider", "claude"]).unwrap();
      assert_eq!(cli.command, Command::Config {
         key:   Some("provider".to_string()),
         value: Some("claude".to_string()),
         show:  false,
      });
      assert_eq!(cli.dir, PathBuf::from("."));
      assert!(!cli.verbose);
   }

   #[test]
   fn test_parse_config_show() {
      let cli = Cli::try_parse_from(["aigit", "config", "--show"]).unwrap();
      assert_eq!(cli.command, Command::Config { key: None, value: None, show: true });
   }

   #[test]
   fn test_parse_commit_flags() {
      let cli = Cli::try_parse_from(["aigit", "commit", "-y", "-a"]).unwrap();
      assert_eq!(cli.command, Command::Commit { yes: true, all: true });

      let cli = Cli::try_parse_from(["aigit", "commit"]).unwrap();
      assert_eq!(cli.command, Command::Commit { yes: false, all: false });
   }

   #[test]
   fn test_parse_review_hook_mode() {
      let cli = Cli::try_parse_from(["aigit", "review", "--staged", "--hook"]).unwrap();
      assert_eq!(cli.command, Command::Review { staged: true, hook: true });
   }

   #[test]
   fn test_global_flags_after_subcommand() {
      let cli = Cli::try_parse_from(["aigit", "review", "--dir", "/tmp/repo", "-v"]).unwrap();
      assert_eq!(cli.dir, PathBuf::from("/tmp/repo"));
      assert!(cli.verbose);
   }

   #[test]
   fn test_parse_hooks() {
      let cli = Cli::try_parse_from(["aigit", "hooks", "install"]).unwrap();
      assert_eq!(cli.command, Command::Hooks { action: HookAction::Install });
      assert!(Cli::try_parse_from(["aigit", "hooks"]).is_err());
      assert!(Cli::try_parse_from(["aigit"]).is_err());
   }

   #[test]
   fn test_cli_definition_is_consistent() {
      use clap::CommandFactory;
      Cli::command().debug_assert();
   }
}
