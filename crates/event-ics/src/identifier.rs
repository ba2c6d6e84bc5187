//! Deriving the event identifier from the source filename.
//!
//! The identifier is the stem of both the calendar UID and the output file
//! name. Two policies exist; one is chosen per run and applied to every file.
//!
//! - [`IdentifierPolicy::Permissive`]: `<slug>.html` yields `<slug>`, with no
//!   cross-check. The frontmatter is the only source of event data.
//! - [`IdentifierPolicy::Strict`]: the filename must be
//!   `YYYY-MM-DD-<slug>.html`; `<slug>` must equal the frontmatter `uid` and
//!   the filename date must equal the frontmatter `date`.

use crate::error::{IcsError, Result};
use crate::types::EventFrontmatter;

/// Extension every event page carries.
pub const SOURCE_EXTENSION: &str = ".html";

/// How identifiers are derived and cross-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierPolicy {
    /// Filename minus `.html` is the identifier.
    #[default]
    Permissive,
    /// `YYYY-MM-DD-<slug>.html`, cross-checked against `uid` and `date`.
    Strict,
}

/// A resolved identifier, tied to the source file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    /// Stem of the UID and of the output `.ics` filename.
    pub stem: String,
    /// The source filename, used for the constructed page URL.
    pub source_filename: String,
}

impl Identifier {
    /// The output filename: `<stem>.ics`.
    pub fn ics_filename(&self) -> String {
        format!("{}.ics", self.stem)
    }
}

/// Resolve the identifier of `filename` under `policy`.
///
/// # Errors
/// Returns `IcsError::InvalidFilename` if the filename does not have the
/// shape the policy requires, and `IcsError::IdentifierMismatch` if, under
/// the strict policy, the filename disagrees with the frontmatter.
pub fn resolve_identifier(
    filename: &str,
    frontmatter: &EventFrontmatter,
    policy: IdentifierPolicy,
) -> Result<Identifier> {
    let stem = strip_extension(filename)?;
    let stem = match policy {
        IdentifierPolicy::Permissive => stem,
        IdentifierPolicy::Strict => {
            let (date, slug) = split_dated_stem(stem).ok_or_else(|| IcsError::InvalidFilename {
                filename: filename.to_string(),
                reason: "expected YYYY-MM-DD-<slug>.html".to_string(),
            })?;
            let uid = frontmatter.uid.as_deref().unwrap_or_default();
            if uid != slug {
                return Err(IcsError::IdentifierMismatch {
                    field: "uid",
                    from_filename: slug.to_string(),
                    from_frontmatter: uid.to_string(),
                });
            }
            if date != frontmatter.date {
                return Err(IcsError::IdentifierMismatch {
                    field: "date",
                    from_filename: date.to_string(),
                    from_frontmatter: frontmatter.date.clone(),
                });
            }
            slug
        }
    };

    Ok(Identifier {
        stem: stem.to_string(),
        source_filename: filename.to_string(),
    })
}

fn strip_extension(filename: &str) -> Result<&str> {
    match filename.strip_suffix(SOURCE_EXTENSION) {
        Some(stem) if !stem.is_empty() => Ok(stem),
        _ => Err(IcsError::InvalidFilename {
            filename: filename.to_string(),
            reason: format!("expected a non-empty name ending in {SOURCE_EXTENSION}"),
        }),
    }
}

/// Split `YYYY-MM-DD-<slug>` into its date and a non-empty slug.
fn split_dated_stem(stem: &str) -> Option<(&str, &str)> {
    if stem.len() < 12 || !stem.is_char_boundary(10) || !stem.is_char_boundary(11) {
        return None;
    }
    let (date, rest) = stem.split_at(10);
    let slug = rest.strip_prefix('-')?;
    let shape_ok = date.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok || slug.is_empty() {
        return None;
    }
    Some((date, slug))
}
