use crate::{
    errors::{FileOperation, IoError},
    parser::ParsedEntry,
};
use colored::Colorize;
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("I/O error while creating the structure")]
    #[diagnostic(
        code(mks::build::io),
        help("Entries created before the failure are left on disk.")
    )]
    Io(#[from] IoError),
}

/// Filesystem operations the builder relies on. Paths are relative to whatever root the
/// implementation writes under.
pub trait FsCreator {
    /// Creates `path` and any missing parents. An existing directory is not an error.
    fn mkdir_all(&mut self, path: &Path) -> Result<(), IoError>;
    /// Creates `path` as an empty file, truncating it if it exists.
    fn create_empty_file(&mut self, path: &Path) -> Result<(), IoError>;
}

/// Creates entries on disk under `root`.
#[derive(Debug, Clone)]
pub struct DiskCreator {
    root: PathBuf,
}
impl DiskCreator {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}
impl FsCreator for DiskCreator {
    fn mkdir_all(&mut self, path: &Path) -> Result<(), IoError> {
        let full_path = self.root.join(path);

        std::fs::create_dir_all(&full_path)
            .map_err(|error| IoError::new(FileOperation::Mkdir, full_path.clone(), error))?;

        println!("{} {}", "create".green(), full_path.display());

        Ok(())
    }

    fn create_empty_file(&mut self, path: &Path) -> Result<(), IoError> {
        let full_path = self.root.join(path);

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|error| IoError::new(FileOperation::Mkdir, parent.into(), error))?;
        }

        std::fs::File::create(&full_path)
            .map_err(|error| IoError::new(FileOperation::CreateFile, full_path.clone(), error))?;

        println!("{} {}", "create".green(), full_path.display());

        Ok(())
    }
}

/// The chain of directories currently open for new entries, from the root down.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathStack {
    segments: Vec<String>,
}
impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Drops every directory deeper than `parent_index`, clamping it to the deepest open
    /// directory first. Returns the index actually used.
    ///
    /// Must not be called on an empty stack.
    fn truncate_to_parent(&mut self, parent_index: usize) -> usize {
        let deepest = self.segments.len().saturating_sub(1);
        let parent_index = parent_index.min(deepest);

        self.segments.truncate(parent_index + 1);

        parent_index
    }

    fn join(&self, name: &str) -> PathBuf {
        let mut path: PathBuf = self.segments.iter().collect();
        path.push(name);
        path
    }

    fn push(&mut self, name: String) {
        self.segments.push(name);
    }
}

/// Number of entries a build created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    pub directories: usize,
    pub files: usize,
}

/// Recreates the tree described by `entries` through `creator`.
///
/// Each entry attaches to the directory its indentation points at. Indentation deeper
/// than the currently open directories is not an error: the entry is attached to the
/// deepest one instead. A file as the very first entry does not open a scope, so the
/// entries after it are treated as root entries again.
///
/// # Errors
///
/// Returns a [`BuildError`] as soon as a directory or file cannot be created. Whatever
/// was created before is left in place.
pub fn build<I, C>(entries: I, creator: &mut C) -> Result<BuildReport, BuildError>
where
    I: IntoIterator<Item = ParsedEntry>,
    C: FsCreator + ?Sized,
{
    let mut stack = PathStack::new();
    let mut report = BuildReport::default();

    for entry in entries {
        if stack.is_empty() {
            let path = PathBuf::from(&entry.name);

            if entry.is_dir {
                creator.mkdir_all(&path)?;
                report.directories += 1;
                stack.push(entry.name);
            } else {
                creator.create_empty_file(&path)?;
                report.files += 1;
            }

            log::debug!("root entry: {}", path.display());
            continue;
        }

        let requested = entry.parent_index();
        let parent_index = stack.truncate_to_parent(requested);
        if parent_index != requested {
            log::debug!(
                "'{}' is indented past the open directories, attaching it at depth {}",
                entry.name,
                parent_index
            );
        }

        let path = stack.join(&entry.name);

        if entry.is_dir {
            creator.mkdir_all(&path)?;
            report.directories += 1;
            stack.push(entry.name);
        } else {
            creator.create_empty_file(&path)?;
            report.files += 1;
        }

        log::debug!("created {} (stack depth {})", path.display(), stack.len());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        parser::{parse_lines, Notation},
        vfs::VirtualFS,
    };
    use std::collections::BTreeSet;

    fn plan(text: &str) -> VirtualFS {
        let lines: Vec<&str> = text.lines().collect();
        let mut vfs = VirtualFS::new();

        build(parse_lines(&lines[..]), &mut vfs).expect("in-memory build never fails");

        vfs
    }

    fn paths(vfs: &VirtualFS) -> Vec<(String, bool)> {
        vfs.entries
            .iter()
            .map(|e| (e.destination.to_string_lossy().replace('\\', "/"), e.is_file))
            .collect()
    }

    fn scan(root: &Path) -> BTreeSet<(String, bool)> {
        walkdir::WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .map(|entry| {
                let entry = entry.expect("walkable entry");
                let relative = entry
                    .path()
                    .strip_prefix(root)
                    .expect("entry under root")
                    .to_string_lossy()
                    .replace('\\', "/");

                (relative, entry.file_type().is_file())
            })
            .collect()
    }

    struct FailingCreator {
        fail_on: PathBuf,
        created: Vec<PathBuf>,
    }
    impl FsCreator for FailingCreator {
        fn mkdir_all(&mut self, path: &Path) -> Result<(), IoError> {
            self.create_empty_file(path)
        }

        fn create_empty_file(&mut self, path: &Path) -> Result<(), IoError> {
            if path == self.fail_on {
                return Err(IoError::new(
                    FileOperation::CreateFile,
                    path.to_path_buf(),
                    std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                ));
            }
            self.created.push(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_indentation_scenario() {
        let vfs = plan("root/\n    sub/\n        file.txt\n    other.txt\n");

        assert_eq!(
            paths(&vfs),
            vec![
                ("root".to_string(), false),
                ("root/sub".to_string(), false),
                ("root/sub/file.txt".to_string(), true),
                ("root/other.txt".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_glyph_scenario() {
        let vfs = plan("app/\n├── src/\n│   └── main.go\n└── README.md\n");

        assert_eq!(
            paths(&vfs),
            vec![
                ("app".to_string(), false),
                ("app/src".to_string(), false),
                ("app/src/main.go".to_string(), true),
                ("app/README.md".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_over_deep_indentation_is_clamped() {
        let vfs = plan("root/\n            deep.txt\n    a/\n                 b.txt\n");

        assert_eq!(
            paths(&vfs),
            vec![
                ("root".to_string(), false),
                ("root/deep.txt".to_string(), true),
                ("root/a".to_string(), false),
                ("root/a/b.txt".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_root_file_does_not_open_a_scope() {
        let vfs = plan("notes.txt\n    todo.txt\nsrc/\n    lib.rs\n");

        assert_eq!(
            paths(&vfs),
            vec![
                ("notes.txt".to_string(), true),
                ("todo.txt".to_string(), true),
                ("src".to_string(), false),
                ("src/lib.rs".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_files_never_become_ancestors() {
        let vfs = plan("app/\n├── Cargo.toml\n│   └── stray.rs\n└── src/\n");

        assert_eq!(
            paths(&vfs),
            vec![
                ("app".to_string(), false),
                ("app/Cargo.toml".to_string(), true),
                ("app/stray.rs".to_string(), true),
                ("app/src".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_continuation_line_without_connector_nests_visually() {
        let vfs = plan("app/\n├── src/\n│   main.rs\n└── x.md\n");

        assert_eq!(
            paths(&vfs),
            vec![
                ("app".to_string(), false),
                ("app/src".to_string(), false),
                ("app/src/main.rs".to_string(), true),
                ("app/x.md".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_partial_indentation_collapses_onto_root() {
        // two spaces are level 0 and four are level 1, both children of the root
        let vfs = plan("root/\n  sub/\n    file.txt\n");

        assert_eq!(
            paths(&vfs),
            vec![
                ("root".to_string(), false),
                ("root/sub".to_string(), false),
                ("root/file.txt".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_report_counts_entries() {
        let lines = ["app/", "├── src/", "│   ├── main.rs", "│   └── lib.rs", "└── README.md"];
        let mut vfs = VirtualFS::new();

        let report = build(parse_lines(&lines[..]), &mut vfs).expect("build");

        assert_eq!(
            report,
            BuildReport {
                directories: 2,
                files: 3
            }
        );
    }

    #[test]
    fn test_failure_aborts_and_keeps_earlier_entries() {
        let lines = ["app/", "    a.txt", "    b.txt", "    c.txt"];
        let mut creator = FailingCreator {
            fail_on: PathBuf::from("app").join("b.txt"),
            created: Vec::new(),
        };

        let result = build(parse_lines(&lines[..]), &mut creator);

        match result {
            Err(BuildError::Io(error)) => assert_eq!(error.path, creator.fail_on),
            other => panic!("expected an I/O error, got {other:?}"),
        }
        assert_eq!(
            creator.created,
            vec![PathBuf::from("app"), PathBuf::from("app").join("a.txt")]
        );
    }

    #[test]
    fn test_round_trip_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let entries = vec![
            ("project", true, 0),
            ("src", true, 0),
            ("bin", true, 1),
            ("cli.rs", false, 2),
            ("lib.rs", false, 1),
            ("docs", true, 0),
            ("guide.md", false, 1),
            ("LICENSE", false, 0),
        ];
        let parsed = entries.iter().map(|(name, is_dir, level)| ParsedEntry {
            indent_level: *level,
            name: name.to_string(),
            is_dir: *is_dir,
            notation: Notation::Glyph,
        });

        build(parsed, &mut DiskCreator::new(dir.path())).expect("build");

        let expected: BTreeSet<(String, bool)> = [
            ("project", false),
            ("project/src", false),
            ("project/src/bin", false),
            ("project/src/bin/cli.rs", true),
            ("project/src/lib.rs", true),
            ("project/docs", false),
            ("project/docs/guide.md", true),
            ("project/LICENSE", true),
        ]
        .into_iter()
        .map(|(path, is_file)| (path.to_string(), is_file))
        .collect();

        assert_eq!(scan(dir.path()), expected);
    }

    #[test]
    fn test_building_twice_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let lines = ["app/", "├── src/", "│   └── main.rs", "└── README.md"];

        build(parse_lines(&lines[..]), &mut DiskCreator::new(dir.path())).expect("first build");
        let first = scan(dir.path());

        std::fs::write(dir.path().join("app").join("README.md"), "stale").expect("write");

        build(parse_lines(&lines[..]), &mut DiskCreator::new(dir.path())).expect("second build");

        assert_eq!(scan(dir.path()), first);
        let readme = std::fs::metadata(dir.path().join("app").join("README.md")).expect("stat");
        assert_eq!(readme.len(), 0);
    }

    #[test]
    fn test_disk_failure_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        // a file where a directory is expected
        std::fs::write(dir.path().join("app"), "").expect("write");
        let lines = ["app/", "    main.rs"];

        let result = build(parse_lines(&lines[..]), &mut DiskCreator::new(dir.path()));

        match result {
            Err(BuildError::Io(error)) => assert_eq!(error.path, dir.path().join("app")),
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_path_stack_clamps_and_truncates() {
        let mut stack = PathStack::new();
        stack.push("a".to_string());
        stack.push("b".to_string());
        stack.push("c".to_string());

        assert_eq!(stack.truncate_to_parent(7), 2);
        assert_eq!(stack.len(), 3);

        assert_eq!(stack.truncate_to_parent(0), 0);
        assert_eq!(stack.segments(), ["a".to_string()]);
        assert_eq!(stack.join("x"), PathBuf::from("a").join("x"));
    }
}
