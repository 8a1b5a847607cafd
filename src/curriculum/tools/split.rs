//! Splitting of an authoring notebook into its published variants.
//!
//! Code cells containing a line with the [`SOLUTION_TAG`] token are solution
//! cells. The master variant drops them; the solution variant keeps only them
//! (minus the tag lines). Markdown cells go to both variants unchanged.

use crate::curriculum::tools::model::{Cell, Notebook};

/// Token marking a code cell as solution-only.
pub const SOLUTION_TAG: &str = "__SOLUTION__";

/// How a cell is treated when splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    Markdown,
    CodeTagged,
    /// Code cells without a tag line, and any cell that is neither markdown
    /// nor code.
    CodeUntagged,
}

/// Returns true when one of the whitespace separated words of `line` is the
/// tag, either bare or directly prefixed with `#`.
pub fn contains_tag(line: &str) -> bool {
    line.split_whitespace()
        .any(|word| word.strip_prefix('#').unwrap_or(word) == SOLUTION_TAG)
}

/// Classifies a single cell.
pub fn classify_cell(cell: &Cell) -> CellClass {
    if cell.is_markdown() {
        CellClass::Markdown
    } else if cell.is_code() && cell.source.lines().any(contains_tag) {
        CellClass::CodeTagged
    } else {
        CellClass::CodeUntagged
    }
}

/// Returns a copy of `cell` with every tag line removed. Non-code cells are
/// returned unchanged.
pub fn strip_tag_lines(cell: &Cell) -> Cell {
    if !cell.is_code() {
        return cell.clone();
    }

    Cell {
        cell_type: cell.cell_type.clone(),
        source: cell.source.retain_lines(|line| !contains_tag(line)),
        extra: cell.extra.clone(),
    }
}

/// Builds the master variant: markdown cells and untagged cells, unmodified.
pub fn build_master_notebook(notebook: &Notebook) -> Notebook {
    let cells = notebook
        .cells
        .iter()
        .filter(|cell| classify_cell(cell) != CellClass::CodeTagged)
        .cloned()
        .collect();
    notebook.with_cells(cells)
}

/// Builds the solution variant: markdown cells and tagged code cells, the
/// latter with their tag lines stripped.
pub fn build_solution_notebook(notebook: &Notebook) -> Notebook {
    let cells = notebook
        .cells
        .iter()
        .filter_map(|cell| match classify_cell(cell) {
            CellClass::Markdown => Some(cell.clone()),
            CellClass::CodeTagged => Some(strip_tag_lines(cell)),
            CellClass::CodeUntagged => None,
        })
        .collect();
    notebook.with_cells(cells)
}
