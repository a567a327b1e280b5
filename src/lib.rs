//! Turns a textual directory tree, in `├── name` glyph notation or plain indentation,
//! into directories and empty files on disk.

// Public API
pub mod api;
pub mod builder;
pub mod config;
pub mod errors;
pub mod parser;
mod preview;
pub mod source;
pub mod utils;
pub mod vfs;
