use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::curriculum::tools::error::{Result, ToolError};
use crate::curriculum::tools::model::Notebook;

/// Reads and parses the notebook at `path`.
pub fn load_notebook(path: &Path) -> Result<Notebook> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

/// Serialises `notebook` the way Jupyter does: one-space indentation and a
/// trailing newline.
pub fn notebook_to_string(notebook: &Notebook) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b" ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    notebook.serialize(&mut serializer)?;
    buffer.push(b'\n');
    String::from_utf8(buffer)
        .map_err(|err| ToolError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))
}

/// Writes `notebook` to `path`, replacing whatever was there.
pub fn write_notebook(path: &Path, notebook: &Notebook) -> Result<()> {
    fs::write(path, notebook_to_string(notebook)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("absent.ipynb");
        match load_notebook(&path) {
            Err(ToolError::MissingInput(missing)) => assert_eq!(missing, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("broken.ipynb");
        fs::write(&path, "{ \"cells\": [").expect("file written");
        assert!(matches!(load_notebook(&path), Err(ToolError::Json(_))));
    }

    #[test]
    fn output_uses_single_space_indent() {
        let notebook = Notebook::new(Vec::new());
        let text = notebook_to_string(&notebook).expect("serialised");
        assert_eq!(text, "{\n \"cells\": []\n}\n");
    }
}
