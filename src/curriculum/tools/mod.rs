pub mod config;
pub mod error;
pub mod git;
pub mod io;
pub mod model;
pub mod render;
pub mod split;
pub mod sync;

pub use error::{Result, ToolError};
