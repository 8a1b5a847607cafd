use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info};

use crate::curriculum::tools::error::{Result, ToolError};

/// Result of trying to switch to a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkout {
    Switched,
    /// Neither a local branch nor a branch on the remote has that name.
    NotFound,
}

/// Wrapper around the git CLI for the working tree the lesson lives in.
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
    remote: String,
    ssh_identity: Option<PathBuf>,
}

impl GitRepo {
    /// Opens the working tree at `path`. Fails when `path` is not inside a
    /// git repository.
    pub fn open(path: &Path, remote: impl Into<String>) -> Result<Self> {
        let repo = Self {
            path: path.to_path_buf(),
            remote: remote.into(),
            ssh_identity: None,
        };
        repo.run(&["rev-parse", "--git-dir"])?;
        Ok(repo)
    }

    /// Runs every subsequent git command with `ssh -i <identity>`.
    pub fn with_ssh_identity(mut self, identity: Option<PathBuf>) -> Self {
        self.ssh_identity = identity;
        self
    }

    /// Returns true when a local branch, or a branch on the configured remote,
    /// is called `branch`.
    pub fn branch_exists(&self, branch: &str) -> Result<bool> {
        let local = format!("refs/heads/{branch}");
        let remote = format!("refs/remotes/{}/{branch}", self.remote);
        Ok(self.succeeds(&["show-ref", "--verify", "--quiet", &local])?
            || self.succeeds(&["show-ref", "--verify", "--quiet", &remote])?)
    }

    /// Switches the working tree to `branch`.
    pub fn checkout(&self, branch: &str) -> Result<Checkout> {
        if !self.branch_exists(branch)? {
            debug!(branch, "branch not found");
            return Ok(Checkout::NotFound);
        }
        self.run(&["checkout", branch])?;
        Ok(Checkout::Switched)
    }

    /// Replaces the tracked files of the working tree with those of `branch`,
    /// without switching branches.
    pub fn restore_tree_from(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch, "--", "."])?;
        Ok(())
    }

    /// Name of the checked out branch.
    pub fn current_branch(&self) -> Result<String> {
        Ok(self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?.trim().to_string())
    }

    /// Message of the commit at HEAD.
    pub fn head_commit_message(&self) -> Result<String> {
        Ok(self.run(&["log", "-1", "--format=%B"])?.trim_end().to_string())
    }

    /// Stages every change in the working tree, deletions included.
    pub fn add_all(&self) -> Result<()> {
        self.run(&["add", "--all", "."])?;
        Ok(())
    }

    /// Commit staged changes. Returns `false` if there was nothing to commit.
    pub fn commit(&self, message: &str) -> Result<bool> {
        // `diff --quiet` exits non-zero when there are differences.
        if self.succeeds(&["diff", "--cached", "--quiet"])? {
            info!("nothing to commit");
            return Ok(false);
        }
        self.run(&["commit", "-m", message])?;
        Ok(true)
    }

    /// Pushes `branch` to the configured remote.
    pub fn push(&self, branch: &str) -> Result<()> {
        info!(remote = %self.remote, branch, "pushing");
        self.run(&["push", &self.remote, branch])?;
        Ok(())
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new("git");
        command.args(args).current_dir(&self.path);
        if let Some(identity) = &self.ssh_identity {
            command.env("GIT_SSH_COMMAND", ssh_command(identity));
        }
        command
    }

    fn output(&self, args: &[&str]) -> Result<Output> {
        debug!(cwd = %self.path.display(), ?args, "running git command");
        self.command(args).output().map_err(|err| ToolError::Git {
            message: format!("failed to execute git: {err}"),
            stderr: String::new(),
        })
    }

    /// Runs a git command whose exit status is the answer to a question.
    fn succeeds(&self, args: &[&str]) -> Result<bool> {
        Ok(self.output(args)?.status.success())
    }

    /// Execute a git command and return stdout.
    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args)?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(ToolError::Git {
                message: format!(
                    "git {} failed with exit code {:?}: {}",
                    args.join(" "),
                    output.status.code(),
                    stderr.trim()
                ),
                stderr,
            });
        }

        if !stderr.is_empty() {
            debug!(stderr = %stderr, "git stderr (non-fatal)");
        }

        Ok(stdout)
    }
}

/// `GIT_SSH_COMMAND` value for `identity`. Git runs it through a shell, so the
/// path is single-quoted.
fn ssh_command(identity: &Path) -> String {
    let path = identity.display().to_string().replace('\'', r"'\''");
    format!("ssh -i '{path}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_with_identity(identity: Option<PathBuf>) -> GitRepo {
        GitRepo {
            path: PathBuf::from("."),
            remote: "origin".into(),
            ssh_identity: None,
        }
        .with_ssh_identity(identity)
    }

    fn ssh_env(repo: &GitRepo) -> Option<String> {
        repo.command(&["push"])
            .get_envs()
            .find(|(key, _)| *key == "GIT_SSH_COMMAND")
            .and_then(|(_, value)| value)
            .map(|value| value.to_string_lossy().into_owned())
    }

    #[test]
    fn ssh_identity_is_passed_to_git() {
        let repo = repo_with_identity(Some(PathBuf::from("/keys/deploy key")));
        assert_eq!(ssh_env(&repo).as_deref(), Some("ssh -i '/keys/deploy key'"));
    }

    #[test]
    fn no_identity_leaves_ssh_alone() {
        assert_eq!(ssh_env(&repo_with_identity(None)), None);
    }

    #[test]
    fn quotes_in_identity_are_escaped() {
        assert_eq!(
            ssh_command(Path::new("/keys/it's")),
            r"ssh -i '/keys/it'\''s'"
        );
    }
}
