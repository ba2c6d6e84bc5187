//! The event data model: validated frontmatter records and calendar files.

use serde::{Deserialize, Serialize};

/// A physical location, rendered as `LOCATION:<name>, <address>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub address: String,
}

/// An online access point, rendered as `LOCATION:<link>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    pub name: String,
    pub link: String,
}

/// The `duration` block of an event: wall-clock times (`HH:MM`) on the event date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: String,
    pub to: String,
}

/// Frontmatter of an event page, narrowed to its validated shape.
///
/// Optional blocks are `None` both when the key is absent and when it is
/// explicitly `null`. Fields other than these are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFrontmatter {
    /// Always `"event"` once validated.
    pub layout: String,
    pub title: String,
    pub short_title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `None` means the schedule is not fixed yet; such events get no calendar file.
    #[serde(default)]
    pub duration: Option<TimeWindow>,
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default)]
    pub remote: Option<Remote>,
    #[serde(default)]
    pub link: Option<String>,
    /// Only read under the strict identifier policy.
    #[serde(default)]
    pub uid: Option<String>,
}

/// A raw input document as handed over by the I/O layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub filename: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// A compiled calendar document, ready to be written as `filename`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarFile {
    pub filename: String,
    pub content: String,
}
