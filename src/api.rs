use crate::{
    builder::{self, BuildReport, DiskCreator},
    config::{self, Config},
    parser,
    preview::preview_as_tree,
    source::{self, Input, Origin},
    vfs::VirtualFS,
};
use colored::Colorize;
use std::path::Path;

#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum MksError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] source::SourceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Build(#[from] builder::BuildError),

    #[error("no structural lines found in {origin} input")]
    #[diagnostic(
        code(mks::no_structural_content),
        help("Every line was blank, a comment, or had an invalid name")
    )]
    NoStructuralContent { origin: Origin },
}

/// Creates the structure described by the file at `input`, or by the clipboard when no
/// file is given.
///
/// # Errors
///
/// Returns a [`MksError`] if:
///
/// - The file cannot be read, or the clipboard is empty or does not hold a tree.
/// - No line of the input describes a file or directory.
/// - A directory or file cannot be created.
pub fn make_structure(input: Option<&Path>, config: &Config) -> Result<BuildReport, MksError> {
    let input = Input::acquire(input)?;

    println!("Read from {} ({} lines)", input.origin, input.lines.len());

    make_structure_from(&input, config)
}

/// Creates the structure described by an already acquired [`Input`] under the configured
/// destination.
///
/// # Errors
///
/// See [`make_structure`].
pub fn make_structure_from(input: &Input, config: &Config) -> Result<BuildReport, MksError> {
    let entries = parser::parse_lines(&input.lines);

    if entries.is_empty() {
        return Err(MksError::NoStructuralContent {
            origin: input.origin,
        });
    }

    log::debug!(
        "{} of {} lines are structural",
        entries.len(),
        input.lines.len()
    );

    if config.verbose {
        let mut vfs = VirtualFS::new();
        builder::build(entries.iter().cloned(), &mut vfs)?;

        preview_as_tree(&vfs, &config.destination);
    }

    println!("{}", "Creating structure...".green());

    let mut creator = DiskCreator::new(&config.destination);
    let report = builder::build(entries, &mut creator)?;

    Ok(report)
}
