//! Run configuration for the curriculum sync.
//!
//! Branch names and paths are resolved once, before any git work starts, and
//! then passed by reference to everything that needs them.

use std::path::{Path, PathBuf};

/// Notebook holding the authoring copy of the lesson.
pub const DEFAULT_NOTEBOOK: &str = "index.ipynb";
/// Rendered markdown published next to the notebook.
pub const DEFAULT_README: &str = "README.md";
/// Branch the lesson is authored on.
pub const CURRICULUM_BRANCH: &str = "curriculum";
/// Preferred name of the student-facing branch.
pub const MAIN_BRANCH: &str = "main";
/// Fallback name of the student-facing branch in older repositories.
pub const MASTER_BRANCH: &str = "master";
/// Branch holding the worked solutions.
pub const SOLUTION_BRANCH: &str = "solution";
/// Remote every branch is pushed to.
pub const DEFAULT_REMOTE: &str = "origin";
/// Program used to render notebooks.
pub const DEFAULT_JUPYTER: &str = "jupyter";
/// SSH key used for pushes when none is given, relative to the home directory.
pub const DEFAULT_SSH_IDENTITY: &str = ".ssh/id_rsa";

/// Names of the three branches a sync touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branches {
    pub curriculum: String,
    pub master: String,
    pub solution: String,
}

/// Everything a sync run needs to know.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Working tree of the repository.
    pub repo: PathBuf,
    /// Notebook path relative to `repo`.
    pub notebook: PathBuf,
    /// Rendered document path relative to `repo`.
    pub readme: PathBuf,
    pub branches: Branches,
    pub remote: String,
    /// Commit message override; the curriculum HEAD message is used otherwise.
    pub message: Option<String>,
    pub push: bool,
}

impl SyncConfig {
    /// Absolute (or `repo`-relative) location of the notebook.
    pub fn notebook_path(&self) -> PathBuf {
        self.repo.join(&self.notebook)
    }

    /// Location of the rendered document.
    pub fn readme_path(&self) -> PathBuf {
        self.repo.join(&self.readme)
    }

    /// Directory nbconvert writes extracted images to, `<stem>_files`.
    pub fn assets_dir(&self) -> PathBuf {
        assets_dir_for(&self.notebook_path())
    }
}

/// Returns the `<stem>_files` directory next to `notebook`.
pub fn assets_dir_for(notebook: &Path) -> PathBuf {
    let stem = notebook
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    notebook.with_file_name(format!("{stem}_files"))
}

/// Picks the student-facing branch name: an explicit choice wins, otherwise
/// `main` when that branch exists and `master` when it does not.
pub fn resolve_master_branch(explicit: Option<String>, main_exists: bool) -> String {
    match explicit {
        Some(name) => name,
        None if main_exists => MAIN_BRANCH.to_string(),
        None => MASTER_BRANCH.to_string(),
    }
}

/// Picks the SSH key for git: an explicit path wins, otherwise the default key
/// under `home` when it exists.
pub fn resolve_ssh_identity(explicit: Option<PathBuf>, home: Option<&Path>) -> Option<PathBuf> {
    explicit.or_else(|| {
        home.map(|home| home.join(DEFAULT_SSH_IDENTITY))
            .filter(|path| path.exists())
    })
}
