const MAX_NAME_LEN: usize = 255;

const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Returns `true` if `name` can be used as a single file or directory name on every
/// platform we target.
///
/// Reserved device names are matched against the part before the first `.`, so
/// `con.txt` is rejected while `a.CON` is fine.
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }

    let base = name.split('.').next().unwrap_or_default();
    if RESERVED_NAMES
        .iter()
        .any(|reserved| base.eq_ignore_ascii_case(reserved))
    {
        return false;
    }

    if name.contains(ILLEGAL_CHARS) {
        return false;
    }

    !(name.ends_with(' ') || name.ends_with('.'))
}
