//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{BranchType, ErrorCode, Repository, Status, StatusOptions};

use crate::error::SquashError;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

/// Working directory status
#[derive(Debug)]
pub struct WorkingDirectoryStatus {
    /// Whether tracked files are free of uncommitted changes
    pub clean: bool,
    /// List of tracked files with uncommitted changes
    pub uncommitted_changes: Vec<FileStatus>,
}

impl WorkingDirectoryStatus {
    /// One `XY path` line per changed file.
    pub fn describe(&self) -> String {
        self.uncommitted_changes
            .iter()
            .map(|change| format!("  {} {}", change.status, change.file))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// File status information
#[derive(Debug)]
pub struct FileStatus {
    /// Git status flags (e.g., "M ", " M", "D ")
    pub status: String,
    /// Path to the file relative to repository root
    pub file: String,
}

impl GitRepository {
    /// Opens the repository git is pointed at, honouring `GIT_DIR` the way
    /// hooks see it and otherwise searching upwards from the current directory
    pub fn open() -> Result<Self> {
        let repo = Repository::open_from_env().context("Not in a git repository")?;

        Ok(Self { repo })
    }

    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Returns the status of tracked files; untracked and ignored files are not
    /// considered uncommitted changes.
    pub fn get_working_directory_status(&self) -> Result<WorkingDirectoryStatus> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .context("Failed to get repository status")?;

        let mut uncommitted_changes = Vec::new();

        for entry in statuses.iter() {
            if let Some(path) = entry.path() {
                let status_flags = entry.status();
                if status_flags.is_ignored() || status_flags == Status::CURRENT {
                    continue;
                }

                uncommitted_changes.push(FileStatus {
                    status: format_status_flags(status_flags),
                    file: path.to_string(),
                });
            }
        }

        let clean = uncommitted_changes.is_empty();

        Ok(WorkingDirectoryStatus {
            clean,
            uncommitted_changes,
        })
    }

    /// Check if working directory is clean
    pub fn is_working_directory_clean(&self) -> Result<bool> {
        let status = self.get_working_directory_status()?;
        Ok(status.clean)
    }

    /// Path of the `.git` directory
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Working tree root; bare repositories have none.
    pub fn workdir(&self) -> Result<&Path> {
        self.repo
            .workdir()
            .context("Repository has no working directory")
    }

    /// Get access to the underlying git2::Repository
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Get current branch name
    pub fn get_current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD reference")?;

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(name.to_string());
            }
        }

        Err(SquashError::DetachedHead.into())
    }

    /// Check if a local branch exists
    pub fn branch_exists(&self, branch_name: &str) -> bool {
        self.repo.find_branch(branch_name, BranchType::Local).is_ok()
    }

    /// Reads a string from the repository's layered configuration.
    pub fn config_string(&self, key: &str) -> Result<Option<String>> {
        let config = self
            .repo
            .config()
            .context("Failed to open git configuration")?;

        match config.get_string(key) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read git config {}", key)),
        }
    }

    /// Writes a string into the repository-local configuration.
    pub fn set_config_string(&self, key: &str, value: &str) -> Result<()> {
        let mut config = self
            .repo
            .config()
            .context("Failed to open git configuration")?;
        config
            .set_str(key, value)
            .with_context(|| format!("Failed to write git config {}", key))
    }
}

/// Format git status flags into string representation
fn format_status_flags(flags: Status) -> String {
    let mut status = String::new();

    if flags.contains(Status::INDEX_NEW) {
        status.push('A');
    } else if flags.contains(Status::INDEX_MODIFIED) {
        status.push('M');
    } else if flags.contains(Status::INDEX_DELETED) {
        status.push('D');
    } else if flags.contains(Status::INDEX_RENAMED) {
        status.push('R');
    } else if flags.contains(Status::INDEX_TYPECHANGE) {
        status.push('T');
    } else {
        status.push(' ');
    }

    if flags.contains(Status::WT_MODIFIED) {
        status.push('M');
    } else if flags.contains(Status::WT_DELETED) {
        status.push('D');
    } else if flags.contains(Status::WT_TYPECHANGE) {
        status.push('T');
    } else if flags.contains(Status::WT_RENAMED) {
        status.push('R');
    } else if flags.contains(Status::CONFLICTED) {
        status.push('U');
    } else {
        status.push(' ');
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use std::fs;

    fn init_repo_with_commit() -> (tempfile::TempDir, GitRepository) {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(temp_dir.path()).unwrap();

        fs::write(temp_dir.path().join("tracked.txt"), "one\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("tracked.txt")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = Signature::now("Test User", "test@example.com").unwrap();
        repo.commit(Some("HEAD"), &signature, &signature, "Initial", &tree, &[])
            .unwrap();
        drop(tree);

        (temp_dir, GitRepository { repo })
    }

    #[test]
    fn untracked_files_do_not_dirty_the_tree() {
        let (temp_dir, repo) = init_repo_with_commit();
        fs::write(temp_dir.path().join("scratch.txt"), "notes").unwrap();

        assert!(repo.is_working_directory_clean().unwrap());
    }

    #[test]
    fn modified_tracked_file_dirties_the_tree() {
        let (temp_dir, repo) = init_repo_with_commit();
        fs::write(temp_dir.path().join("tracked.txt"), "two\n").unwrap();

        let status = repo.get_working_directory_status().unwrap();
        assert!(!status.clean);
        assert_eq!(status.describe(), "   M tracked.txt");
    }

    #[test]
    fn detached_head_is_reported() {
        let (_temp_dir, repo) = init_repo_with_commit();
        let head = repo.repo.head().unwrap().target().unwrap();
        repo.repo.set_head_detached(head).unwrap();

        let err = repo.get_current_branch().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SquashError>(),
            Some(SquashError::DetachedHead)
        ));
    }

    #[test]
    fn config_round_trip() {
        let (_temp_dir, repo) = init_repo_with_commit();
        assert_eq!(repo.config_string("gerrit-squash.url").unwrap(), None);

        repo.set_config_string("gerrit-squash.url", "https://review.example.com")
            .unwrap();
        assert_eq!(
            repo.config_string("gerrit-squash.url").unwrap().as_deref(),
            Some("https://review.example.com")
        );
    }
}
