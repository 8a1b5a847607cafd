use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A Jupyter notebook as read from disk.
///
/// Only `cells` is interpreted; every other top-level field (`metadata`,
/// `nbformat`, `nbformat_minor`, ...) is carried through untouched so the
/// derived notebooks stay valid for Jupyter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Ordered cells of the notebook.
    pub cells: Vec<Cell>,
    /// Remaining top-level fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// Creates a notebook holding the given cells and no other fields.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            extra: Map::new(),
        }
    }

    /// Returns a notebook sharing this notebook's top-level fields but holding
    /// `cells` instead.
    pub fn with_cells(&self, cells: Vec<Cell>) -> Self {
        Self {
            cells,
            extra: self.extra.clone(),
        }
    }
}

/// The `cell_type` of a notebook cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CellType {
    Markdown,
    Code,
    /// Any other type, typically `raw`.
    Other(String),
}

impl From<String> for CellType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "markdown" => CellType::Markdown,
            "code" => CellType::Code,
            _ => CellType::Other(value),
        }
    }
}

impl From<CellType> for String {
    fn from(value: CellType) -> Self {
        match value {
            CellType::Markdown => "markdown".to_string(),
            CellType::Code => "code".to_string(),
            CellType::Other(other) => other,
        }
    }
}

/// Cell source text. nbformat allows either a list of lines or a single
/// string; the shape read is the shape written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Lines(Vec<String>),
    Text(String),
}

impl Source {
    /// Iterates over the lines of the source. Line terminators are kept, as in
    /// the list form of nbformat.
    pub fn lines(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Source::Lines(lines) => Box::new(lines.iter().map(String::as_str)),
            Source::Text(text) => Box::new(text.split_inclusive('\n')),
        }
    }

    /// Keeps only the lines for which `keep` returns true, preserving order
    /// and the source shape.
    pub fn retain_lines(&self, mut keep: impl FnMut(&str) -> bool) -> Source {
        match self {
            Source::Lines(lines) => Source::Lines(
                lines
                    .iter()
                    .filter(|line| keep(line.as_str()))
                    .cloned()
                    .collect(),
            ),
            Source::Text(text) => Source::Text(
                text.split_inclusive('\n')
                    .filter(|line| keep(*line))
                    .collect(),
            ),
        }
    }
}

impl From<Vec<&str>> for Source {
    fn from(lines: Vec<&str>) -> Self {
        Source::Lines(lines.into_iter().map(str::to_string).collect())
    }
}

/// A single notebook cell.
///
/// Fields are written in sorted key order, as Jupyter writes them, so that
/// republished notebooks diff cleanly against hand-saved ones.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    pub source: Source,
    /// Remaining cell fields such as `metadata`, `outputs` or `id`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Creates a markdown cell.
    pub fn markdown(source: impl Into<Source>) -> Self {
        Self::new(CellType::Markdown, source)
    }

    /// Creates a code cell.
    pub fn code(source: impl Into<Source>) -> Self {
        Self::new(CellType::Code, source)
    }

    /// Creates a cell of the given type with no extra fields.
    pub fn new(cell_type: CellType, source: impl Into<Source>) -> Self {
        Self {
            cell_type,
            source: source.into(),
            extra: Map::new(),
        }
    }

    /// True for `markdown` cells.
    pub fn is_markdown(&self) -> bool {
        self.cell_type == CellType::Markdown
    }

    /// True for `code` cells.
    pub fn is_code(&self) -> bool {
        self.cell_type == CellType::Code
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum CellField<'a> {
    CellType(&'a CellType),
    Source(&'a Source),
    Extra(&'a Value),
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields: BTreeMap<&str, CellField<'_>> = self
            .extra
            .iter()
            .map(|(key, value)| (key.as_str(), CellField::Extra(value)))
            .collect();
        fields.insert("cell_type", CellField::CellType(&self.cell_type));
        fields.insert("source", CellField::Source(&self.source));
        fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_cell_types_survive_a_roundtrip() {
        let json = serde_json::json!({
            "cell_type": "raw",
            "metadata": {},
            "source": ["plain text"]
        });
        let cell: Cell = serde_json::from_value(json.clone()).expect("cell parsed");
        assert_eq!(cell.cell_type, CellType::Other("raw".into()));
        assert_eq!(serde_json::to_value(&cell).expect("cell serialised"), json);
    }

    #[test]
    fn text_source_keeps_its_shape() {
        let json = serde_json::json!({
            "cell_type": "code",
            "source": "a = 1\nb = 2"
        });
        let cell: Cell = serde_json::from_value(json).expect("cell parsed");
        assert_eq!(cell.source.lines().collect::<Vec<_>>(), vec!["a = 1\n", "b = 2"]);

        let kept = cell.source.retain_lines(|line| !line.starts_with('a'));
        assert_eq!(kept, Source::Text("b = 2".into()));
    }

    #[test]
    fn cell_keys_are_written_in_sorted_order() {
        let json = serde_json::json!({
            "cell_type": "code",
            "source": ["x = 1"],
            "metadata": {},
            "outputs": [],
            "execution_count": null,
            "id": "a1"
        });
        let cell: Cell = serde_json::from_value(json).expect("cell parsed");

        assert_eq!(
            serde_json::to_string(&cell).expect("cell serialised"),
            concat!(
                r#"{"cell_type":"code","execution_count":null,"id":"a1","#,
                r#""metadata":{},"outputs":[],"source":["x = 1"]}"#
            )
        );
    }

    #[test]
    fn missing_source_is_rejected() {
        let json = serde_json::json!({ "cell_type": "code" });
        assert!(serde_json::from_value::<Cell>(json).is_err());
    }
}
