//! Review remote and hook installation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::SquashError;
use crate::git::remote::{project_name_from_uri, review_url};
use crate::git::{GitCli, GitRepository, RemoteInfo, CONFIG_URL_KEY, REVIEW_REMOTE};
use crate::utils::resolve_review_url;

/// Name of the hook git runs before opening the commit editor.
pub const HOOK_NAME: &str = "prepare-commit-msg";

/// Remote the project name is derived from.
const ORIGIN_REMOTE: &str = "origin";

/// What `init` configured.
#[derive(Debug)]
pub struct SetupReport {
    /// The review remote as added.
    pub remote: RemoteInfo,
    /// Where the hook was written.
    pub hook_path: PathBuf,
}

/// Sets up the review remote and the commit message hook.
pub struct SetupHandler {
    repo: GitRepository,
    git: GitCli,
}

impl SetupHandler {
    /// Creates a setup handler for an opened repository.
    pub fn new(repo: GitRepository) -> Result<Self> {
        let git = GitCli::new(repo.workdir()?);
        Ok(Self { repo, git })
    }

    /// Configures the review remote from the resolved URL and project, then
    /// installs the hook forwarding to `exe`.
    pub fn run(&self, url: Option<&str>, project: Option<&str>, exe: &Path) -> Result<SetupReport> {
        let base_url = resolve_review_url(&self.repo, url)?.ok_or(SquashError::NoReviewUrl)?;
        let project = self.resolve_project(project)?;

        // Remember an explicitly given URL for later re-inits
        if let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) {
            self.repo.set_config_string(CONFIG_URL_KEY, url)?;
        }

        let remote_url = review_url(&base_url, &project);
        let remote = RemoteInfo::replace(self.repo.repository(), REVIEW_REMOTE, &remote_url)?;
        info!("Remote {} -> {}", remote.name, remote.uri);

        let hook_path = self.install_hook(exe)?;

        Ok(SetupReport { remote, hook_path })
    }

    /// Explicit project name, else the basename of the origin remote.
    fn resolve_project(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(project) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
            return Ok(project.to_string());
        }

        let origin = RemoteInfo::find(self.repo.repository(), ORIGIN_REMOTE)?;
        debug!("Origin remote: {:?}", origin);

        origin
            .and_then(|remote| remote.project_name())
            .ok_or_else(|| SquashError::NoProjectName.into())
    }

    /// Writes the hook into git's hooks directory and makes it executable.
    pub fn install_hook(&self, exe: &Path) -> Result<PathBuf> {
        let hooks_dir = self.hooks_dir()?;
        fs::create_dir_all(&hooks_dir).with_context(|| {
            format!("Failed to create hooks directory: {}", hooks_dir.display())
        })?;

        let hook_path = hooks_dir.join(HOOK_NAME);
        fs::write(&hook_path, hook_script(exe))
            .with_context(|| format!("Failed to write hook: {}", hook_path.display()))?;
        make_executable(&hook_path)?;

        info!("Installed {}", hook_path.display());
        Ok(hook_path)
    }

    /// Hooks directory as git resolves it, so `core.hooksPath` is honoured.
    fn hooks_dir(&self) -> Result<PathBuf> {
        let dir = PathBuf::from(self.git.run(&["rev-parse", "--git-path", "hooks"])?);
        if dir.is_absolute() {
            Ok(dir)
        } else {
            Ok(self.git.workdir().join(dir))
        }
    }
}

/// Content of the installed hook.
pub fn hook_script(exe: &Path) -> String {
    format!(
        "#!/bin/sh\n\
         # Installed by gerrit-squash; forwards to the message preparation step.\n\
         exec {} {} \"$@\"\n",
        shell_quote(&exe.to_string_lossy()),
        HOOK_NAME
    )
}

/// Single-quotes a string for POSIX sh.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to make {} executable", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_script_forwards_all_arguments() {
        insta::assert_snapshot!(hook_script(Path::new("/usr/local/bin/gerrit-squash")), @r#"
        #!/bin/sh
        # Installed by gerrit-squash; forwards to the message preparation step.
        exec '/usr/local/bin/gerrit-squash' prepare-commit-msg "$@"
        "#);
    }

    #[test]
    fn hook_script_quotes_awkward_paths() {
        let script = hook_script(Path::new("/opt/it's here/gerrit-squash"));
        assert!(script.contains(r"exec '/opt/it'\''s here/gerrit-squash' prepare-commit-msg"));
    }

    #[test]
    fn install_hook_writes_executable_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();
        let handler =
            SetupHandler::new(GitRepository::open_at(temp_dir.path()).unwrap()).unwrap();

        let hook_path = handler
            .install_hook(Path::new("/usr/local/bin/gerrit-squash"))
            .unwrap();

        assert!(hook_path.ends_with(".git/hooks/prepare-commit-msg"));
        let content = fs::read_to_string(&hook_path).unwrap();
        assert!(content.starts_with("#!/bin/sh\n"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&hook_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn project_defaults_to_origin_basename() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = git2::Repository::init(temp_dir.path()).unwrap();
        repo.remote("origin", "git@github.com:acme/widgets.git")
            .unwrap();
        let handler =
            SetupHandler::new(GitRepository::open_at(temp_dir.path()).unwrap()).unwrap();

        assert_eq!(handler.resolve_project(None).unwrap(), "widgets");
        assert_eq!(handler.resolve_project(Some("gadgets")).unwrap(), "gadgets");
    }

    #[test]
    fn missing_origin_and_project_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        git2::Repository::init(temp_dir.path()).unwrap();
        let handler =
            SetupHandler::new(GitRepository::open_at(temp_dir.path()).unwrap()).unwrap();

        let err = handler.resolve_project(None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SquashError>(),
            Some(SquashError::NoProjectName)
        ));
    }
}
