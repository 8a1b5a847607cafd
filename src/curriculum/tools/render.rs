use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, instrument};

use crate::curriculum::tools::error::{Result, ToolError};

/// Turns a notebook on disk into a human readable document.
pub trait Render {
    /// Renders `notebook` and leaves the result at `output`.
    fn render(&self, notebook: &Path, output: &Path) -> Result<()>;
}

/// Renders markdown with `jupyter nbconvert`.
#[derive(Debug, Clone)]
pub struct Nbconvert {
    program: PathBuf,
}

impl Nbconvert {
    /// Creates a renderer running `program` (usually `jupyter`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Render for Nbconvert {
    #[instrument(
        level = "info",
        skip_all,
        fields(notebook = %notebook.display(), output = %output.display())
    )]
    fn render(&self, notebook: &Path, output: &Path) -> Result<()> {
        let result = Command::new(&self.program)
            .arg("nbconvert")
            .arg(notebook)
            .args(["--to", "markdown"])
            .output()
            .map_err(|err| ToolError::Render {
                message: format!("failed to execute {}: {err}", self.program.display()),
                stderr: String::new(),
            })?;

        let stderr = String::from_utf8_lossy(&result.stderr).to_string();
        if !result.status.success() {
            return Err(ToolError::Render {
                message: format!(
                    "nbconvert exited with code {:?}: {}",
                    result.status.code(),
                    stderr.trim()
                ),
                stderr,
            });
        }
        debug!(stderr = %stderr, "nbconvert finished");

        // nbconvert always writes `<stem>.md` next to the notebook.
        let converted = notebook.with_extension("md");
        if converted != output {
            fs::rename(&converted, output)?;
        }
        Ok(())
    }
}
