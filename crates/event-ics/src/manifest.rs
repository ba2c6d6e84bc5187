//! A JSON listing of the events that received a calendar file.
//!
//! The listing is an index of the `.ics` files of one run: one entry per
//! written file, under a top-level `events` key. Unscheduled events have no
//! file and are not listed.

use serde::Serialize;

use crate::config::CalendarConfig;
use crate::error::Result;
use crate::identifier::Identifier;
use crate::types::EventFrontmatter;

/// One scheduled event as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub identifier: String,
    pub date: String,
    pub from: String,
    pub to: String,
    pub title: String,
    pub short_title: String,
    /// Event page URL (explicit `link` or the constructed page URL).
    pub url: String,
    /// Filename of the calendar file for this event.
    pub ics: String,
}

impl EventSummary {
    /// Summarize a scheduled event. Returns `None` for unscheduled events,
    /// matching the compiler's skip rule.
    pub fn new(
        event: &EventFrontmatter,
        identifier: &Identifier,
        config: &CalendarConfig,
    ) -> Option<Self> {
        let window = event.duration.as_ref()?;
        Some(Self {
            identifier: identifier.stem.clone(),
            date: event.date.clone(),
            from: window.from.clone(),
            to: window.to.clone(),
            title: event.title.clone(),
            short_title: event.short_title.clone(),
            url: event
                .link
                .clone()
                .unwrap_or_else(|| config.page_url(&identifier.source_filename)),
            ics: identifier.ics_filename(),
        })
    }
}

/// Scheduled events in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub events: Vec<EventSummary>,
}

impl Manifest {
    /// Build a manifest, ordered by date, start time, then identifier.
    pub fn new(mut events: Vec<EventSummary>) -> Self {
        events.sort_by(|a, b| {
            (a.date.as_str(), a.from.as_str(), a.identifier.as_str()).cmp(&(
                b.date.as_str(),
                b.from.as_str(),
                b.identifier.as_str(),
            ))
        });
        Self { events }
    }

    /// Pretty-printed JSON, newline-terminated.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
