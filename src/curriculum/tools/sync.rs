use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::curriculum::tools::config::SyncConfig;
use crate::curriculum::tools::error::{Result, ToolError};
use crate::curriculum::tools::git::{Checkout, GitRepo};
use crate::curriculum::tools::io::notebook::{load_notebook, write_notebook};
use crate::curriculum::tools::model::Notebook;
use crate::curriculum::tools::render::Render;
use crate::curriculum::tools::split::{build_master_notebook, build_solution_notebook};

/// What happened to one of the published branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    /// The branch was rebuilt. `committed` is false when the rebuild produced
    /// no changes.
    Synced { committed: bool },
    /// The branch does not exist and was left alone.
    Skipped,
}

/// Summary of a full sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub message: String,
    pub curriculum_committed: bool,
    pub master: BranchOutcome,
    pub solution: BranchOutcome,
}

/// Cell counts of a local split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSummary {
    pub source_cells: usize,
    pub master_cells: usize,
    pub solution_cells: usize,
}

/// Splits the notebook at `input` and writes both variants to disk without
/// touching git.
#[instrument(
    level = "info",
    skip_all,
    fields(
        input = %input.display(),
        master = %master_output.display(),
        solution = %solution_output.display()
    )
)]
pub fn split_files(
    input: &Path,
    master_output: &Path,
    solution_output: &Path,
) -> Result<SplitSummary> {
    let source = load_notebook(input)?;
    let master = build_master_notebook(&source);
    let solution = build_solution_notebook(&source);
    write_notebook(master_output, &master)?;
    write_notebook(solution_output, &solution)?;

    let summary = SplitSummary {
        source_cells: source.cells.len(),
        master_cells: master.cells.len(),
        solution_cells: solution.cells.len(),
    };
    info!(?summary, "notebook split");
    Ok(summary)
}

/// Publishes the curriculum notebook: renders and pushes the curriculum
/// branch, then rebuilds the master and solution branches from it and leaves
/// the working tree on the curriculum branch.
#[instrument(level = "info", skip_all, fields(repo = %config.repo.display()))]
pub fn sync_curriculum(
    config: &SyncConfig,
    repo: &GitRepo,
    renderer: &dyn Render,
) -> Result<SyncReport> {
    let curriculum = &config.branches.curriculum;
    if repo.checkout(curriculum)? == Checkout::NotFound {
        return Err(ToolError::MissingBranch(curriculum.clone()));
    }

    let message = match &config.message {
        Some(message) => message.clone(),
        None => repo.head_commit_message()?,
    };
    debug!(%message, "resolved commit message");

    renderer.render(&config.notebook_path(), &config.readme_path())?;
    let curriculum_committed = commit_and_push(config, repo, curriculum, &message)?;

    let source = load_notebook(&config.notebook_path())?;
    info!(cell_count = source.cells.len(), "loaded curriculum notebook");
    let master = build_master_notebook(&source);
    let solution = build_solution_notebook(&source);

    let master_outcome =
        sync_branch(config, repo, renderer, &config.branches.master, &master, &message)?;
    let solution_outcome =
        sync_branch(config, repo, renderer, &config.branches.solution, &solution, &message)?;

    repo.checkout(curriculum)?;

    let report = SyncReport {
        message,
        curriculum_committed,
        master: master_outcome,
        solution: solution_outcome,
    };
    info!(master = ?report.master, solution = ?report.solution, "sync finished");
    Ok(report)
}

/// Rebuilds `branch` from the curriculum branch with `notebook` in place of
/// the curriculum notebook.
#[instrument(
    level = "info",
    skip(config, repo, renderer, notebook, message),
    fields(cell_count = notebook.cells.len())
)]
pub fn sync_branch(
    config: &SyncConfig,
    repo: &GitRepo,
    renderer: &dyn Render,
    branch: &str,
    notebook: &Notebook,
    message: &str,
) -> Result<BranchOutcome> {
    if repo.checkout(branch)? == Checkout::NotFound {
        warn!(branch, "branch does not exist, skipping");
        return Ok(BranchOutcome::Skipped);
    }

    repo.restore_tree_from(&config.branches.curriculum)?;

    // Images are regenerated by the renderer.
    let assets = config.assets_dir();
    if assets.exists() {
        debug!(path = %assets.display(), "removing rendered assets");
        fs::remove_dir_all(&assets)?;
    }

    write_notebook(&config.notebook_path(), notebook)?;
    renderer.render(&config.notebook_path(), &config.readme_path())?;

    let committed = commit_and_push(config, repo, branch, message)?;
    Ok(BranchOutcome::Synced { committed })
}

fn commit_and_push(
    config: &SyncConfig,
    repo: &GitRepo,
    branch: &str,
    message: &str,
) -> Result<bool> {
    repo.add_all()?;
    let committed = repo.commit(message)?;
    if config.push {
        repo.push(branch)?;
    } else {
        info!(branch, "git push disabled by configuration");
    }
    Ok(committed)
}
