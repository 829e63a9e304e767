//! Shared utilities

pub mod file_kind;
pub mod helpers;
pub mod path;

pub use file_kind::FileKind;
pub use path::PathResolver;
