//! Parser for Redump/Logiqx-style DAT catalogs.
//!
//! A DAT is XML, but it is consumed here line by line: every game block has a
//! `<description>` line holding the title, followed by one `<rom>` line per
//! track carrying an `md5="..."` attribute.
//!
//! ```text
//! <game name="Super Game (USA)">
//!     <category>Games</category>
//!     <description>Super Game (USA)</description>
//!     <rom name="Super Game (USA) (Track 1).bin" size="..." md5="..." sha1="..."/>
//!     <rom name="Super Game (USA) (Track 2).bin" size="..." md5="..." sha1="..."/>
//! </game>
//! ```

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::core::types::{CatalogEntry, CatalogId};
use crate::utils::validation::normalize_md5;

const DESCRIPTION_OPEN: &str = "<description>";
const DESCRIPTION_CLOSE: &str = "</description>";
const MD5_ATTRIBUTE: &str = "md5=\"";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog: hash on line {line} has no preceding <description>")]
    MalformedCatalog { line: usize },
}

/// Read a catalog document, gunzipping `.gz` files
///
/// Invalid UTF-8 is replaced rather than rejected; titles are only ever compared
/// and displayed.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or decompressed.
pub fn read_document(path: &Path) -> Result<String, ParseError> {
    let mut bytes = Vec::new();
    let file = std::fs::File::open(path)?;

    if is_gzipped(path) {
        GzDecoder::new(file).read_to_end(&mut bytes)?;
    } else {
        std::io::BufReader::new(file).read_to_end(&mut bytes)?;
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

/// Lazily parse the entries of one catalog document.
///
/// Entries are yielded in document order. The iterator yields a single
/// `ParseError::MalformedCatalog` and then stops if a hash line appears before
/// any `<description>` line.
pub fn parse_entries<'a>(text: &'a str, source: &CatalogId) -> DatEntries<'a> {
    DatEntries {
        lines: text.lines().enumerate(),
        title: None,
        source: source.clone(),
        done: false,
    }
}

/// Iterator returned by [`parse_entries`]
pub struct DatEntries<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    /// Title of the nearest `<description>` line above the cursor
    title: Option<String>,
    source: CatalogId,
    done: bool,
}

impl Iterator for DatEntries<'_> {
    type Item = Result<CatalogEntry, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for (i, line) in self.lines.by_ref() {
            let mut rest = line;
            if line.contains(DESCRIPTION_OPEN) {
                let (title, after) = split_description(line);
                self.title = Some(title);
                rest = after;
            }

            let Some(hash) = extract_md5(rest) else {
                continue;
            };

            return match &self.title {
                Some(title) => Some(Ok(CatalogEntry::new(hash, title.clone(), self.source.clone()))),
                None => {
                    self.done = true;
                    Some(Err(ParseError::MalformedCatalog { line: i + 1 }))
                }
            };
        }

        self.done = true;
        None
    }
}

/// Split a description line into its title and whatever markup follows it.
///
/// Plain text around the tags belongs to the title; a `<rom>` sharing the line
/// (single-line game blocks) is returned so its hash can still be read.
fn split_description(line: &str) -> (String, &str) {
    let Some(open) = line.find(DESCRIPTION_OPEN) else {
        return (decode_entities(&line.replace('\t', "")), "");
    };
    let before = &line[..open];
    let body = &line[open + DESCRIPTION_OPEN.len()..];
    let (inner, after) = match body.find(DESCRIPTION_CLOSE) {
        Some(close) => (&body[..close], &body[close + DESCRIPTION_CLOSE.len()..]),
        None => (body, ""),
    };

    let mut title = String::new();
    if !before.contains('<') {
        title.push_str(before);
    }
    title.push_str(inner);

    let rest = if after.contains('<') {
        after
    } else {
        title.push_str(after);
        ""
    };

    (decode_entities(&title.replace('\t', "")), rest)
}

/// Value of an `md5="..."` attribute, if the line has a valid one
fn extract_md5(line: &str) -> Option<String> {
    let mut search_from = 0;
    while let Some(offset) = line[search_from..].find(MD5_ATTRIBUTE) {
        let start = search_from + offset;
        search_from = start + MD5_ATTRIBUTE.len();

        // Must be a whole attribute name, not the tail of e.g. `xmd5="`
        let preceded_by_space = line[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        if !preceded_by_space {
            continue;
        }

        let value = &line[search_from..];
        let end = value.find('"')?;
        return normalize_md5(&value[..end]);
    }
    None
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
