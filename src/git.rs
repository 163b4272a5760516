use std::{
   path::{Path, PathBuf},
   process::{Command, Output},
};

use crate::error::{AigitError, Result};

/// Run git with the given args in `dir`, failing on spawn errors and non-zero
/// exit codes
fn run_git(args: &[&str], dir: &Path) -> Result<Output> {
   tracing::debug!(?args, dir = %dir.display(), "running git");

   let output = Command::new("git")
      .args(args)
      .current_dir(dir)
      .output()
      .map_err(|e| AigitError::GitError(format!("Failed to run git {}: {e}", args.join(" "))))?;

   if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(AigitError::GitError(format!(
         "git {} failed: {}",
         args.join(" "),
         stderr.trim()
      )));
   }

   Ok(output)
}

fn git_stdout(args: &[&str], dir: &Path) -> Result<String> {
   let output = run_git(args, dir)?;
   Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Whether `dir` is inside a git work tree
pub fn is_git_repo(dir: &Path) -> bool {
   Command::new("git")
      .args(["rev-parse", "--is-inside-work-tree"])
      .current_dir(dir)
      .output()
      .is_ok_and(|output| output.status.success())
}

/// Fail with a git error unless `dir` is inside a repository
pub fn ensure_git_repo(dir: &Path) -> Result<()> {
   if is_git_repo(dir) {
      Ok(())
   } else {
      Err(AigitError::GitError("not a git repository".to_string()))
   }
}

/// Diff of the index against HEAD
pub fn staged_diff(dir: &Path) -> Result<String> {
   git_stdout(&["diff", "--cached"], dir)
}

/// Diff of the work tree against the index
pub fn unstaged_diff(dir: &Path) -> Result<String> {
   git_stdout(&["diff"], dir)
}

/// Staged and unstaged changes under section headers, empty when the tree is
/// clean
pub fn all_diff(dir: &Path) -> Result<String> {
   let staged = staged_diff(dir)?;
   let unstaged = unstaged_diff(dir)?;
   Ok(combine_diffs(&staged, &unstaged))
}

fn combine_diffs(staged: &str, unstaged: &str) -> String {
   let mut result = String::new();
   if !staged.is_empty() {
      result.push_str("=== Staged Changes ===\n");
      result.push_str(staged);
   }
   if !unstaged.is_empty() {
      if !staged.is_empty() {
         result.push('\n');
      }
      result.push_str("=== Unstaged Changes ===\n");
      result.push_str(unstaged);
   }
   result
}

/// Paths with staged changes
pub fn staged_files(dir: &Path) -> Result<Vec<String>> {
   let stdout = git_stdout(&["diff", "--cached", "--name-only"], dir)?;
   Ok(stdout
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .map(ToString::to_string)
      .collect())
}

/// Stage every change in the work tree, including untracked files
pub fn stage_all(dir: &Path) -> Result<()> {
   run_git(&["add", "-A"], dir).map(|_| ())
}

/// Execute git commit with the given message
pub fn commit(message: &str, dir: &Path) -> Result<()> {
   let output = Command::new("git")
      .args(["commit", "-m", message])
      .current_dir(dir)
      .output()
      .map_err(|e| AigitError::GitError(format!("Failed to run git commit: {e}")))?;

   if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let stdout = String::from_utf8_lossy(&output.stdout);
      return Err(AigitError::GitError(format!(
         "Git commit failed:\nstderr: {stderr}\nstdout: {stdout}"
      )));
   }

   Ok(())
}

/// Absolute location of the repository's git dir
pub fn git_dir(dir: &Path) -> Result<PathBuf> {
   let stdout = run_git(&["rev-parse", "--absolute-git-dir"], dir)
      .map_err(|_| AigitError::GitError("not a git repository".to_string()))?
      .stdout;
   Ok(PathBuf::from(String::from_utf8_lossy(&stdout).trim()))
}
