use crate::{builder::FsCreator, errors::IoError};
use std::path::{Path, PathBuf};

/// A directory or file the builder would create, relative to the destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualEntry {
    pub destination: PathBuf,
    /// Indicates whether this entry is a file (`true`) or a directory (`false`).
    pub is_file: bool,
}
/// In-memory stand-in for the filesystem, recording creations in the order they happen.
///
/// Used to preview a structure before anything is written to disk.
#[derive(Debug, Clone, Default)]
pub struct VirtualFS {
    pub entries: Vec<VirtualEntry>,
}
impl VirtualFS {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn record(&mut self, path: &Path, is_file: bool) {
        // re-creating an entry leaves a single record, as it would on disk
        if self.entries.iter().any(|e| e.destination == path) {
            return;
        }

        self.entries.push(VirtualEntry {
            destination: path.to_path_buf(),
            is_file,
        });
    }
}
impl FsCreator for VirtualFS {
    fn mkdir_all(&mut self, path: &Path) -> Result<(), IoError> {
        self.record(path, false);

        Ok(())
    }

    fn create_empty_file(&mut self, path: &Path) -> Result<(), IoError> {
        self.record(path, true);

        Ok(())
    }
}
