//! # event-ics
//!
//! Compiles event pages (HTML with a YAML frontmatter block) into standalone
//! iCalendar files, one per scheduled event.
//!
//! The pipeline is pure: text in, text out. Listing and writing files is the
//! caller's job.
//!
//! 1. [`split_frontmatter`] cuts the `---`-delimited block off the page.
//! 2. [`FrontmatterValidator`] checks the parsed YAML against the canonical
//!    event schema and narrows it to [`EventFrontmatter`].
//! 3. [`resolve_identifier`] derives the UID/output stem from the filename.
//! 4. [`compile_event`] serializes the `.ics` text, or returns `None` for an
//!    event with no time window.
//!
//! [`EventCompiler`] runs all four over a batch and enforces unique output
//! filenames.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use event_ics::{CalendarConfig, EventCompiler, SourceFile};
//!
//! let page = "---\n\
//! layout: event\n\
//! title: Spring Workshop\n\
//! short_title: Workshop\n\
//! date: 2024-03-05\n\
//! duration:\n  from: \"09:30\"\n  to: \"17:00\"\n\
//! ---\n<p>Body</p>\n";
//!
//! let compiler = EventCompiler::new(CalendarConfig::default()).unwrap();
//! let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let batch = compiler
//!     .compile_all(&[SourceFile::new("spring-workshop.html", page)], stamp)
//!     .unwrap();
//!
//! assert_eq!(batch.files[0].filename, "spring-workshop.ics");
//! assert!(batch.files[0]
//!     .content
//!     .contains("DTSTART;TZID=Europe/Brussels:20240305T093000\r\n"));
//! ```
//!
//! ## Modules
//!
//! - [`frontmatter`] — page → frontmatter block + body, YAML parsing
//! - [`schema`] — compiled event schema, `Validation` verdicts
//! - [`identifier`] — filename → identifier, permissive or strict policy
//! - [`ics`] — validated event → calendar text
//! - [`batch`] — all-or-nothing compilation of a page set
//! - [`manifest`] — JSON listing of scheduled events
//! - [`config`] — per-run calendar settings
//! - [`types`] — the event data model
//! - [`error`] — error types

pub mod batch;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod ics;
pub mod identifier;
pub mod manifest;
pub mod schema;
pub mod types;

pub use batch::{Batch, CompiledEvent, EventCompiler};
pub use config::CalendarConfig;
pub use error::IcsError;
pub use frontmatter::{parse_yaml, split_frontmatter, Frontmatter};
pub use ics::compile_event;
pub use identifier::{resolve_identifier, Identifier, IdentifierPolicy};
pub use manifest::{EventSummary, Manifest};
pub use schema::{FrontmatterValidator, Validation, Violation};
pub use types::{CalendarFile, EventFrontmatter, Remote, SourceFile, TimeWindow, Venue};
