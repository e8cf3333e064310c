//! Git remote operations

use anyhow::{Context, Result};
use git2::{ErrorCode, Repository};
use url::Url;

/// Remote repository information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteInfo {
    /// Name of the remote (e.g., "origin", "gerrit")
    pub name: String,
    /// URI of the remote repository
    pub uri: String,
}

impl RemoteInfo {
    /// Looks up a remote by name.
    pub fn find(repo: &Repository, name: &str) -> Result<Option<Self>> {
        match repo.find_remote(name) {
            Ok(remote) => Ok(Some(Self {
                name: name.to_string(),
                uri: remote.url().unwrap_or("").to_string(),
            })),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to look up remote {}", name)),
        }
    }

    /// Points `name` at `uri`, deleting any remote already using that name.
    pub fn replace(repo: &Repository, name: &str, uri: &str) -> Result<Self> {
        if Self::find(repo, name)?.is_some() {
            repo.remote_delete(name)
                .with_context(|| format!("Failed to remove existing remote {}", name))?;
        }

        repo.remote(name, uri)
            .with_context(|| format!("Failed to add remote {} -> {}", name, uri))?;

        Ok(Self {
            name: name.to_string(),
            uri: uri.to_string(),
        })
    }

    /// Project name derived from the last path component of the URI.
    pub fn project_name(&self) -> Option<String> {
        project_name_from_uri(&self.uri)
    }
}

/// Extracts a project name from a remote URI.
///
/// Handles URL-style (`https://host/group/name.git`), scp-style
/// (`git@host:group/name.git`) and plain local paths.
pub fn project_name_from_uri(uri: &str) -> Option<String> {
    let trimmed = uri.trim().trim_end_matches('/');

    // scp-style and local paths are not URLs; use them as they are
    let path = match Url::parse(trimmed) {
        Ok(url) => url.path().to_string(),
        Err(_) => trimmed.to_string(),
    };

    let basename = path.trim_end_matches('/').rsplit(['/', ':']).next()?;
    let name = basename.strip_suffix(".git").unwrap_or(basename);

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Joins the review server base URL and the project name.
pub fn review_url(base: &str, project: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        project.trim().trim_start_matches('/')
    )
}
