//! Pre-commit hook that runs `aigit review` before every commit.

use std::path::{Path, PathBuf};

use crate::{
   error::{AigitError, Result},
   git, style,
};

pub const PRE_COMMIT_HOOK: &str = r#"#!/bin/sh
# aigit pre-commit hook - auto review code before commit

echo "Running aigit code review..."
aigit review --staged --hook

if [ $? -ne 0 ]; then
    echo ""
    echo "Code review found issues. Commit aborted."
    echo "Use 'git commit --no-verify' to skip this check."
    exit 1
fi
"#;

const HOOK_NAME: &str = "pre-commit";
const BACKUP_SUFFIX: &str = ".backup";

#[derive(Debug, PartialEq, Eq)]
pub struct Installed {
   pub hook_path: PathBuf,
   /// Where a pre-existing hook was moved, if there was one
   pub backup:    Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Uninstalled {
   NotInstalled,
   Removed { restored_backup: bool },
}

fn backup_path(hook_path: &Path) -> PathBuf {
   let mut name = hook_path.as_os_str().to_owned();
   name.push(BACKUP_SUFFIX);
   PathBuf::from(name)
}

/// Write the hook into `hooks_dir`, moving any existing hook aside
pub fn install(hooks_dir: &Path) -> Result<Installed> {
   std::fs::create_dir_all(hooks_dir)?;
   let hook_path = hooks_dir.join(HOOK_NAME);

   let backup = if hook_path.exists() {
      let backup = backup_path(&hook_path);
      std::fs::rename(&hook_path, &backup)?;
      Some(backup)
   } else {
      None
   };

   std::fs::write(&hook_path, PRE_COMMIT_HOOK)?;

   #[cfg(unix)]
   {
      use std::os::unix::fs::PermissionsExt;
      std::fs::set_permissions(&hook_path, std::fs::Permissions::from_mode(0o755))?;
   }

   tracing::debug!(path = %hook_path.display(), "installed pre-commit hook");
   Ok(Installed { hook_path, backup })
}

/// Remove the hook if it is still byte-identical to ours, then restore any
/// backup. A modified hook is left untouched.
pub fn uninstall(hooks_dir: &Path) -> Result<Uninstalled> {
   let hook_path = hooks_dir.join(HOOK_NAME);

   let content = match std::fs::read(&hook_path) {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Uninstalled::NotInstalled),
      Err(e) => return Err(e.into()),
   };

   if content != PRE_COMMIT_HOOK.as_bytes() {
      return Err(AigitError::HookModified { path: hook_path.display().to_string() });
   }

   std::fs::remove_file(&hook_path)?;

   let backup = backup_path(&hook_path);
   let restored_backup = if backup.exists() {
      match std::fs::rename(&backup, &hook_path) {
         Ok(()) => true,
         Err(e) => {
            style::warn(&format!("failed to restore backup hook: {e}"));
            false
         },
      }
   } else {
      false
   };

   Ok(Uninstalled::Removed { restored_backup })
}

fn hooks_dir(dir: &Path) -> Result<PathBuf> {
   Ok(git::git_dir(dir)?.join("hooks"))
}

pub fn run_install(dir: &Path) -> Result<()> {
   let installed = install(&hooks_dir(dir)?)?;

   if let Some(backup) = installed.backup {
      let backup = backup.display().to_string();
      println!("Existing pre-commit hook backed up to: {}", style::dim(&backup));
   }
   println!("{} Pre-commit hook installed successfully!", style::success(style::icons::SUCCESS));
   println!("  Code will be reviewed automatically before each commit.");
   println!("  Use 'git commit --no-verify' to skip the review.");
   Ok(())
}

pub fn run_uninstall(dir: &Path) -> Result<()> {
   match uninstall(&hooks_dir(dir)?)? {
      Uninstalled::NotInstalled => println!("No pre-commit hook found."),
      Uninstalled::Removed { restored_backup } => {
         if restored_backup {
            println!("Restored previous pre-commit hook from backup.");
         }
         println!(
            "{} Pre-commit hook uninstalled successfully!",
            style::success(style::icons::SUCCESS)
         );
      },
   }
   Ok(())
}
