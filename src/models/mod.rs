//! Core data models

pub mod file_set;
pub mod manifest;
pub mod history;
pub mod assets;

pub use file_set::*;
pub use manifest::*;
pub use history::*;
pub use assets::*;
