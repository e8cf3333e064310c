//! Prepare-commit-msg command: the hook entry point.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

/// Arguments git passes to the prepare-commit-msg hook.
#[derive(Parser)]
pub struct PrepareCommitMsgCommand {
    /// File holding the proposed commit message.
    #[arg(value_name = "MSG_FILE")]
    pub message_file: PathBuf,

    /// Source of the message (message, template, merge, squash or commit).
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,

    /// Commit object name, for amended commits.
    #[arg(value_name = "SHA")]
    pub sha: Option<String>,
}

impl PrepareCommitMsgCommand {
    /// Executes the prepare-commit-msg command.
    pub fn execute(self) -> Result<()> {
        use crate::git::{GitRepository, MessagePreparer};

        debug!(
            "prepare-commit-msg {} source={:?} sha={:?}",
            self.message_file.display(),
            self.source,
            self.sha
        );

        let repo = GitRepository::open()?;
        let outcome = MessagePreparer::new(repo)?.prepare(&self.message_file)?;
        debug!("Message preparation: {:?}", outcome);
        Ok(())
    }
}
