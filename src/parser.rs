use crate::utils::is_valid_name;
use regex::Regex;

/// Number of spaces that make up one level of indentation.
const INDENT_WIDTH: usize = 4;

/// Box-drawing characters used by `tree`-style listings.
pub(crate) const TREE_GLYPHS: [char; 4] = ['├', '└', '│', '─'];

/// Which of the two supported notations a line was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    /// `├── name` / `└── name` connectors, optionally preceded by `│   ` continuations.
    Glyph,
    /// Plain leading whitespace.
    Indent,
}

/// A single structural line of a tree listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub indent_level: usize,
    pub name: String,
    pub is_dir: bool,
    pub notation: Notation,
}
impl ParsedEntry {
    /// Position in the path stack of the directory this entry belongs to.
    ///
    /// A glyph connector at level 0 already hangs off the root, while in indentation
    /// notation the root itself sits at level 0 and its children at level 1.
    pub fn parent_index(&self) -> usize {
        match self.notation {
            Notation::Glyph => self.indent_level,
            Notation::Indent => self.indent_level.saturating_sub(1),
        }
    }
}

fn is_space(c: char) -> bool {
    // `tree` pads its continuation columns with non-breaking spaces
    c == ' ' || c == '\u{a0}'
}

fn strip_spaces(s: &str, count: usize) -> Option<&str> {
    let mut chars = s.chars();
    for _ in 0..count {
        match chars.next() {
            Some(c) if is_space(c) => {}
            _ => return None,
        }
    }

    Some(chars.as_str())
}

/// Strips one indentation group (a tab, four spaces or `│` plus three spaces) off the
/// front of `s`.
fn strip_indent_group(s: &str) -> Option<&str> {
    if let Some(rest) = s.strip_prefix('\t') {
        return Some(rest);
    }
    if let Some(rest) = s.strip_prefix('│') {
        return strip_spaces(rest, INDENT_WIDTH - 1);
    }

    strip_spaces(s, INDENT_WIDTH)
}

/// Counts leading indentation groups, stopping at the first character that does not
/// start a full group. Partial groups count for nothing.
fn count_indent_groups(mut s: &str) -> usize {
    let mut level = 0;
    while let Some(rest) = strip_indent_group(s) {
        level += 1;
        s = rest;
    }

    level
}

fn glyph_segment(line: &str) -> Option<(usize, &str, Notation)> {
    lazy_static::lazy_static! {
        static ref CONNECTOR_REGEX: Regex = Regex::new(
            r"(?x)
            ^(?P<prefix>.*?)   # continuation groups before the connector
            [├└]─+\s*          # connector, e.g. '├── ' or '└──'
            (?P<name>.*)$"
        ).expect("a valid regex pattern");
    }

    match CONNECTOR_REGEX.captures(line) {
        Some(captures) => {
            let prefix = captures.name("prefix").map_or("", |m| m.as_str());
            let name = captures.name("name").map_or("", |m| m.as_str());

            Some((count_indent_groups(prefix), name, Notation::Glyph))
        }
        None => {
            // spacer lines such as a lone `│` carry no entry
            let (level, name, _) = indent_segment(line)?;
            if name.chars().all(|c| TREE_GLYPHS.contains(&c)) {
                return None;
            }

            // `│   ` groups still count as glyph levels without a connector
            Some((level, name, Notation::Glyph))
        }
    }
}

fn indent_segment(line: &str) -> Option<(usize, &str, Notation)> {
    let name = line.split_whitespace().last()?;

    Some((count_indent_groups(line), name, Notation::Indent))
}

/// Parses one line of a tree listing.
///
/// Returns `None` for lines that carry no entry: blank lines, comment-only lines and
/// lines whose name is not a valid file name. Everything after a `#` is a comment.
pub fn parse_line(line: &str) -> Option<ParsedEntry> {
    let line = match line.find('#') {
        Some(index) => &line[..index],
        None => line,
    };
    let line = line.trim_end();
    if line.is_empty() {
        return None;
    }

    let (indent_level, raw_name, notation) = if line.contains(TREE_GLYPHS) {
        glyph_segment(line)?
    } else {
        indent_segment(line)?
    };

    let (raw_name, is_dir) = match raw_name.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (raw_name, false),
    };

    let name = raw_name.trim();
    if name.is_empty() || !is_valid_name(name) {
        return None;
    }

    Some(ParsedEntry {
        indent_level,
        name: name.to_string(),
        is_dir,
        notation,
    })
}

/// Parses every line, keeping only the structural ones in document order.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Vec<ParsedEntry> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.as_ref();
            let entry = parse_line(line);

            if entry.is_none() && !line.trim().is_empty() {
                log::trace!("skipping line {}: {:?}", index + 1, line);
            }

            entry
        })
        .collect()
}
