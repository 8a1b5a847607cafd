//! Core library for the curriculum-splitter command line application.
//!
//! An authoring notebook on the curriculum branch holds both the lesson and
//! its solutions. The library splits it into a master variant (solutions
//! removed) and a solution variant (solutions kept, tag lines removed) and
//! publishes each to its own branch. The splitting rules live in
//! [`curriculum::tools::split`], notebook reading and writing under
//! [`curriculum::tools::io`], the git and renderer collaborators in
//! [`curriculum::tools::git`] and [`curriculum::tools::render`], and the
//! end-to-end run in [`curriculum::tools::sync`].

pub mod curriculum;

pub use curriculum::tools::{Result, ToolError, config, error, git, io, model, render, split, sync};
