//! Frontmatter validation against the canonical event schema.
//!
//! The event shape is declared once, as a JSON Schema (draft 2020-12) embedded
//! from `schema/event-frontmatter.schema.json`. [`FrontmatterValidator`]
//! compiles it a single time and every document of a run is checked against
//! that compiled validator.
//!
//! Validation is permissive about extra keys: fields the schema does not name
//! are ignored, never rejected. Every string that ends up on a calendar line
//! must be a single line.
//!
//! After the structural check, dates and times that match their textual
//! pattern are also checked for calendar sanity (`2024-02-30` and `24:00`
//! are rejected).

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::error::{IcsError, Result};
use crate::types::EventFrontmatter;

/// The canonical schema for event frontmatter.
pub const EVENT_FRONTMATTER_SCHEMA: &str =
    include_str!("../schema/event-frontmatter.schema.json");

/// A single structural violation: where it happened and what was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending value; empty for the document root.
    pub path: String,
    pub message: String,
}

impl Violation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The path as shown to users, `(root)` when it points at the document.
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            "(root)"
        } else {
            &self.path
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_path(), self.message)
    }
}

impl From<Violation> for IcsError {
    fn from(v: Violation) -> Self {
        IcsError::SchemaViolation {
            path: v.display_path().to_string(),
            message: v.message,
        }
    }
}

/// Outcome of checking an untrusted value against the event shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid(EventFrontmatter),
    Invalid(Violation),
}

/// A compiled event schema, built once and reused for every document.
pub struct FrontmatterValidator {
    validator: Validator,
}

impl FrontmatterValidator {
    /// Compile the embedded event schema.
    ///
    /// # Errors
    /// Returns `IcsError::Schema` if the embedded schema is not valid JSON
    /// Schema. That is a build defect, not a content error.
    pub fn new() -> Result<Self> {
        let schema: Value = serde_json::from_str(EVENT_FRONTMATTER_SCHEMA)
            .map_err(|e| IcsError::Schema(format!("embedded schema is not JSON: {e}")))?;
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&schema)
            .map_err(|e| IcsError::Schema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Check `value` and narrow it to [`EventFrontmatter`].
    ///
    /// Only the first violation is reported. The verdict depends on nothing
    /// but `value`.
    pub fn check(&self, value: &Value) -> Validation {
        if let Some(error) = self.validator.iter_errors(value).next() {
            return Validation::Invalid(Violation::new(
                error.instance_path.to_string(),
                with_found_value(error.to_string(), &error.instance),
            ));
        }

        let frontmatter: EventFrontmatter = match serde_json::from_value(value.clone()) {
            Ok(fm) => fm,
            Err(e) => return Validation::Invalid(Violation::new("", e.to_string())),
        };

        match check_calendar_values(&frontmatter) {
            Some(violation) => Validation::Invalid(violation),
            None => Validation::Valid(frontmatter),
        }
    }

    /// Like [`check`](Self::check), with an invalid verdict turned into
    /// `IcsError::SchemaViolation`.
    pub fn validate(&self, value: &Value) -> Result<EventFrontmatter> {
        match self.check(value) {
            Validation::Valid(frontmatter) => Ok(frontmatter),
            Validation::Invalid(violation) => Err(violation.into()),
        }
    }
}

/// Append the offending scalar when the message does not already show it.
/// Objects and arrays are left out; the path locates them.
fn with_found_value(message: String, instance: &Value) -> String {
    if instance.is_object() || instance.is_array() {
        return message;
    }
    let found = instance.to_string();
    if message.contains(&found) {
        message
    } else {
        format!("{message}, found {found}")
    }
}

/// Reject pattern-conforming strings that are not real dates or clock times.
fn check_calendar_values(fm: &EventFrontmatter) -> Option<Violation> {
    if NaiveDate::parse_from_str(&fm.date, "%Y-%m-%d").is_err() {
        return Some(Violation::new(
            "/date",
            format!("\"{}\" is not a calendar date", fm.date),
        ));
    }
    if let Some(window) = &fm.duration {
        for (path, time) in [("/duration/from", &window.from), ("/duration/to", &window.to)] {
            if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
                return Some(Violation::new(
                    path,
                    format!("\"{time}\" is not a clock time"),
                ));
            }
        }
    }
    None
}
