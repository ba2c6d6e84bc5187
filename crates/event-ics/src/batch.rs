//! Compiling a whole set of event pages in one all-or-nothing pass.
//!
//! The batch works on in-memory [`SourceFile`]s; reading the input directory
//! and writing the results is left to the caller. Any extraction, validation,
//! filename or duplicate error aborts the batch before a single result is
//! returned, so a caller that writes only on `Ok` never publishes a partial
//! set.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::CalendarConfig;
use crate::error::{IcsError, Result};
use crate::frontmatter::{parse_yaml, split_frontmatter};
use crate::ics::compile_event;
use crate::identifier::resolve_identifier;
use crate::manifest::{EventSummary, Manifest};
use crate::schema::FrontmatterValidator;
use crate::types::{CalendarFile, SourceFile};

/// One compiled event: its calendar file and its manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledEvent {
    pub file: CalendarFile,
    pub summary: EventSummary,
}

/// Result of a successful batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Calendar files, in input order. Filenames are unique.
    pub files: Vec<CalendarFile>,
    /// Source filenames of events without a time window.
    pub skipped: Vec<String>,
    pub manifest: Manifest,
}

/// Compiles event pages with one configuration and one compiled schema.
pub struct EventCompiler {
    config: CalendarConfig,
    validator: FrontmatterValidator,
}

impl EventCompiler {
    /// Validate `config` and compile the frontmatter schema.
    ///
    /// # Errors
    /// Returns `IcsError::InvalidConfig` for unusable settings and
    /// `IcsError::Schema` if the embedded schema does not compile.
    pub fn new(config: CalendarConfig) -> Result<Self> {
        config.validate()?;
        let validator = FrontmatterValidator::new()?;
        Ok(Self { config, validator })
    }

    /// Compile a single page.
    ///
    /// Returns `Ok(None)` for an event with no time window. Errors are not
    /// tagged with the filename; [`compile_all`](Self::compile_all) does that.
    pub fn compile_source(
        &self,
        source: &SourceFile,
        stamp: DateTime<Utc>,
    ) -> Result<Option<CompiledEvent>> {
        let frontmatter = split_frontmatter(&source.content)?;
        let value = parse_yaml(frontmatter.head)?;
        let event = self.validator.validate(&value)?;
        let identifier =
            resolve_identifier(&source.filename, &event, self.config.identifier_policy)?;

        let Some(file) = compile_event(&event, &identifier, &self.config, stamp) else {
            return Ok(None);
        };
        let Some(summary) = EventSummary::new(&event, &identifier, &self.config) else {
            return Ok(None);
        };
        Ok(Some(CompiledEvent { file, summary }))
    }

    /// Compile every page, failing fast on the first error.
    ///
    /// Every file carries the same `stamp`. The order of `sources` only affects
    /// the order of [`Batch::files`], never which files are produced.
    ///
    /// # Errors
    /// The first per-file error, wrapped in `IcsError::Source` with the
    /// offending filename. Two pages resolving to the same output filename
    /// fail with `IcsError::DuplicateIdentifier` (wrapped the same way).
    pub fn compile_all(&self, sources: &[SourceFile], stamp: DateTime<Utc>) -> Result<Batch> {
        let mut names: HashSet<String> = HashSet::new();
        let mut batch = Batch::default();
        let mut summaries = Vec::new();

        for source in sources {
            let compiled = self
                .compile_source(source, stamp)
                .map_err(|e| e.in_source(&source.filename))?;

            let Some(CompiledEvent { file, summary }) = compiled else {
                info!(source = %source.filename, "no duration, skipping");
                batch.skipped.push(source.filename.clone());
                continue;
            };

            if !names.insert(file.filename.clone()) {
                return Err(IcsError::DuplicateIdentifier {
                    filename: file.filename,
                }
                .in_source(&source.filename));
            }

            debug!(source = %source.filename, output = %file.filename, "compiled event");
            batch.files.push(file);
            summaries.push(summary);
        }

        batch.manifest = Manifest::new(summaries);
        Ok(batch)
    }
}
