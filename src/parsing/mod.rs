//! Parsers for catalog documents.
//!
//! Only the Redump/Logiqx DAT layout is supported: a `<description>` line per
//! game, followed by `<rom>` lines with an `md5` attribute per track.
//!
//! ## Example
//!
//! ```rust
//! use dat_verify::core::types::CatalogId;
//! use dat_verify::parsing::dat::parse_entries;
//!
//! let dat = "<description>Super Game (USA)</description>\n\
//!            <rom name=\"a.bin\" md5=\"0123456789abcdef0123456789abcdef\"/>\n";
//! let entries: Vec<_> = parse_entries(dat, &CatalogId::new("ps1.dat"))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(entries[0].title, "Super Game (USA)");
//! ```

pub mod dat;
