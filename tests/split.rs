use curriculum_splitter::io::notebook::{load_notebook, write_notebook};
use curriculum_splitter::split::{build_master_notebook, build_solution_notebook};
use curriculum_splitter::sync;
use std::fs;
use tempfile::tempdir;

fn lesson() -> serde_json::Value {
    serde_json::json!({
        "cells": [
            {
                "cell_type": "markdown",
                "id": "cell-1",
                "metadata": {},
                "source": ["# Lists\n", "Build a list of squares."]
            },
            {
                "cell_type": "code",
                "id": "cell-2",
                "execution_count": 1,
                "metadata": {},
                "outputs": [],
                "source": ["# __SOLUTION__\n", "squares = [n * n for n in range(10)]"]
            },
            {
                "cell_type": "code",
                "id": "cell-3",
                "execution_count": null,
                "metadata": {},
                "outputs": [],
                "source": ["squares = None  # your code here"]
            },
            {
                "cell_type": "raw",
                "id": "cell-4",
                "metadata": {},
                "source": "raw notes"
            },
            {
                "cell_type": "code",
                "id": "cell-5",
                "execution_count": null,
                "metadata": {},
                "outputs": [],
                "source": "#__SOLUTION__\nassert len(squares) == 10\n"
            }
        ],
        "metadata": {
            "kernelspec": { "display_name": "Python 3", "language": "python", "name": "python3" }
        },
        "nbformat": 4,
        "nbformat_minor": 5
    })
}

#[test]
fn split_files_writes_both_variants() {
    let dir = tempdir().expect("temporary directory");
    let input = dir.path().join("index.ipynb");
    let master_path = dir.path().join("master.ipynb");
    let solution_path = dir.path().join("solution.ipynb");
    fs::write(&input, serde_json::to_string(&lesson()).expect("fixture serialised"))
        .expect("input written");

    let summary = sync::split_files(&input, &master_path, &solution_path).expect("split");
    assert_eq!(summary.source_cells, 5);
    assert_eq!(summary.master_cells, 3);
    assert_eq!(summary.solution_cells, 3);

    let master: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&master_path).expect("master read"))
            .expect("master parsed");
    let cells = master["cells"].as_array().expect("cells array");
    assert_eq!(cells[0]["cell_type"], "markdown");
    assert_eq!(
        cells[1]["source"],
        serde_json::json!(["squares = None  # your code here"])
    );
    assert_eq!(cells[2]["cell_type"], "raw");
    assert_eq!(master["metadata"], lesson()["metadata"]);
    assert_eq!(master["nbformat"], 4);

    let solution: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&solution_path).expect("solution read"))
            .expect("solution parsed");
    let cells = solution["cells"].as_array().expect("cells array");
    assert_eq!(cells[0], lesson()["cells"][0]);
    assert_eq!(
        cells[1]["source"],
        serde_json::json!(["squares = [n * n for n in range(10)]"])
    );
    assert_eq!(cells[1]["execution_count"], 1);
    assert_eq!(cells[2]["source"], "assert len(squares) == 10\n");
}

#[test]
fn written_notebook_reloads_unchanged() {
    let dir = tempdir().expect("temporary directory");
    let input = dir.path().join("index.ipynb");
    fs::write(&input, serde_json::to_string(&lesson()).expect("fixture serialised"))
        .expect("input written");

    let source = load_notebook(&input).expect("notebook loaded");
    let output = dir.path().join("copy.ipynb");
    write_notebook(&output, &source).expect("notebook written");
    let reloaded = load_notebook(&output).expect("notebook reloaded");

    assert_eq!(source, reloaded);
}

#[test]
fn variants_keep_source_order() {
    let dir = tempdir().expect("temporary directory");
    let input = dir.path().join("index.ipynb");
    fs::write(&input, serde_json::to_string(&lesson()).expect("fixture serialised"))
        .expect("input written");
    let source = load_notebook(&input).expect("notebook loaded");

    for variant in [build_master_notebook(&source), build_solution_notebook(&source)] {
        let mut positions = variant.cells.iter().map(|cell| {
            source
                .cells
                .iter()
                .position(|candidate| candidate.extra.get("id") == cell.extra.get("id"))
                .expect("cell comes from the source")
        });
        let mut last = positions.next();
        for position in positions {
            assert!(Some(position) > last);
            last = Some(position);
        }
    }
}
