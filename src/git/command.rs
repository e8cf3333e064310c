//! Invocation of the external `git` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::SquashError;

/// Runs `git` subcommands inside a working tree.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Creates a runner rooted at `workdir`.
    pub fn new<P: Into<PathBuf>>(workdir: P) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Directory git is run from.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.workdir).args(args);
        cmd
    }

    /// Runs git with captured output, whatever the exit status.
    pub fn output(&self, args: &[&str]) -> Result<Output> {
        debug!("git {}", args.join(" "));
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute git {}", args.join(" ")))
    }

    /// Runs git and returns its trimmed stdout, failing on a non-zero exit.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;

        if !output.status.success() {
            return Err(SquashError::GitCommandFailed {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Runs git and reports whether it exited successfully.
    pub fn succeeds(&self, args: &[&str]) -> Result<bool> {
        let output = self.output(args)?;
        if !output.status.success() {
            debug!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output.status.success())
    }

    /// Runs git attached to the terminal, for commands that talk to the user
    /// (editors, merge output, push progress).
    pub fn run_interactive(&self, args: &[&str]) -> Result<bool> {
        debug!("git {} (interactive)", args.join(" "));
        let status = self
            .command(args)
            .status()
            .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;
        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_reports_failures_as_git_command_failed() {
        let temp_dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(temp_dir.path());

        // Not a repository, so rev-parse fails.
        let err = git.run(&["rev-parse", "HEAD"]).unwrap_err();
        let squash_err = err.downcast_ref::<SquashError>().unwrap();
        assert!(matches!(
            squash_err,
            SquashError::GitCommandFailed { command, .. } if command == "rev-parse HEAD"
        ));
    }

    #[test]
    fn run_returns_trimmed_stdout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(temp_dir.path());

        let version = git.run(&["--version"]).unwrap();
        assert!(version.starts_with("git version"));
        assert!(!version.ends_with('\n'));
    }
}
