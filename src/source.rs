use crate::{
    errors::{FileOperation, IoError},
    parser::TREE_GLYPHS,
};
use miette::Diagnostic;
use regex::Regex;
use std::{fmt, fs, path::Path};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum SourceError {
    #[error("I/O error within source domain")]
    #[diagnostic(code(mks::source::io))]
    Io(#[from] IoError),

    #[error("unable to read the clipboard: {source}")]
    #[diagnostic(
        code(mks::source::clipboard),
        help("Pass the tree as a file argument instead")
    )]
    Clipboard {
        #[source]
        source: arboard::Error,
    },

    #[error("clipboard is empty")]
    #[diagnostic(
        code(mks::source::empty_clipboard),
        help("Copy a directory tree first, or pass it as a file argument")
    )]
    EmptyClipboard,

    #[error("clipboard content does not look like a directory tree")]
    #[diagnostic(
        code(mks::source::not_a_tree),
        help("Expected '├── name' connectors or at least two indented lines")
    )]
    NotATree,
}

/// Where the input text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    File,
    Clipboard,
}
impl Origin {
    fn as_str(&self) -> &str {
        match self {
            Self::File => "file",
            Self::Clipboard => "clipboard",
        }
    }
}
impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw lines of a tree listing, in document order.
#[derive(Debug, Clone)]
pub struct Input {
    pub lines: Vec<String>,
    pub origin: Origin,
}
impl Input {
    pub fn from_text(text: &str, origin: Origin) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            origin,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();

        log::debug!("reading tree from file: {}", path.display());

        let content = fs::read_to_string(path)
            .map_err(|error| IoError::new(FileOperation::Read, path.to_path_buf(), error))?;

        Ok(Self::from_text(&content, Origin::File))
    }

    pub fn from_clipboard() -> Result<Self, SourceError> {
        log::debug!("reading tree from clipboard");

        let mut clipboard =
            arboard::Clipboard::new().map_err(|source| SourceError::Clipboard { source })?;

        let content = match clipboard.get_text() {
            Ok(text) => text,
            Err(arboard::Error::ContentNotAvailable) => return Err(SourceError::EmptyClipboard),
            Err(source) => return Err(SourceError::Clipboard { source }),
        };

        Self::from_clipboard_text(&content)
    }

    fn from_clipboard_text(content: &str) -> Result<Self, SourceError> {
        if content.trim().is_empty() {
            return Err(SourceError::EmptyClipboard);
        }
        if !looks_like_tree(content) {
            return Err(SourceError::NotATree);
        }

        Ok(Self::from_text(content, Origin::Clipboard))
    }

    /// Reads `path` when given, the clipboard otherwise.
    pub fn acquire(path: Option<&Path>) -> Result<Self, SourceError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::from_clipboard(),
        }
    }
}

/// Cheap check that clipboard text resembles a tree listing: box-drawing glyphs over
/// more than one line, or at least two indented lines.
pub fn looks_like_tree(text: &str) -> bool {
    lazy_static::lazy_static! {
        static ref INDENTED_LINE_REGEX: Regex =
            Regex::new(r"(?m)^[ \t]+\S").expect("a valid regex pattern");
    }

    if text.contains(TREE_GLYPHS) && text.contains('\n') {
        return true;
    }

    INDENTED_LINE_REGEX.find_iter(text).nth(1).is_some()
}
