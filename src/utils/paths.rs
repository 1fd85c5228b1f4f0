//! Cleanup of paths pasted or dragged into a terminal prompt.
//!
//! Terminals quote dropped paths in different ways:
//!
//! | Terminal style | Dropped text |
//! |----------------|--------------|
//! | POSIX single-quoted | `'/isos/Tom'\''s Game.iso'` |
//! | Backslash-escaped | `/isos/Tom\'s\ Game.iso` |
//! | Windows double-quoted | `"C:\isos\Tom's Game.iso"` |

use std::path::PathBuf;

/// Undo the shell quoting a terminal applied to a dropped path
#[must_use]
pub fn unescape_dropped_path(raw: &str) -> PathBuf {
    let s = raw.trim();

    if let Some(inner) = strip_quotes(s, '\'') {
        return PathBuf::from(inner.replace(r"'\''", "'"));
    }

    // Backslashes are path separators on Windows, leave them alone
    if let Some(inner) = strip_quotes(s, '"') {
        return PathBuf::from(inner);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if !next.is_alphanumeric() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    PathBuf::from(out)
}

/// Split one line of prompt input into paths; entries are separated by `*`
#[must_use]
pub fn split_dropped_paths(line: &str) -> Vec<PathBuf> {
    line.split('*')
        .filter(|part| !part.trim().is_empty())
        .map(unescape_dropped_path)
        .collect()
}

fn strip_quotes(s: &str, quote: char) -> Option<&str> {
    if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}
