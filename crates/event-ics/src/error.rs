//! Error types for frontmatter extraction, validation and calendar compilation.

use thiserror::Error;

/// Errors that can occur while turning an event page into a calendar file.
///
/// Every variant is fatal to a batch run. An event without a time window is
/// not an error: the compiler reports it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum IcsError {
    /// The document does not start with a `---` line followed later by a
    /// closing `---` line.
    #[error("Missing frontmatter: expected a block delimited by '---' lines")]
    MissingFrontmatter,

    /// The frontmatter block is not well-formed YAML.
    #[error("Invalid frontmatter YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// The frontmatter does not have the event shape.
    /// `path` is a JSON pointer to the first failing field (`(root)` for the
    /// document itself).
    #[error("Schema violation at {path}: {message}")]
    SchemaViolation { path: String, message: String },

    /// The source filename does not have the shape the identifier policy
    /// requires.
    #[error("Invalid event filename '{filename}': {reason}")]
    InvalidFilename { filename: String, reason: String },

    /// Strict identifier policy: the filename and frontmatter disagree.
    #[error("Mismatched {field} between filename ({from_filename}) and frontmatter ({from_frontmatter})")]
    IdentifierMismatch {
        field: &'static str,
        from_filename: String,
        from_frontmatter: String,
    },

    /// Two source files resolve to the same output filename.
    #[error("Duplicate event identifier: {filename} would be written twice")]
    DuplicateIdentifier { filename: String },

    /// A calendar configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization failed (manifest output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The embedded frontmatter schema failed to compile.
    #[error("Schema compilation error: {0}")]
    Schema(String),

    /// A per-file failure, tagged with the source filename by the batch.
    #[error("{filename}: {source}")]
    Source {
        filename: String,
        #[source]
        source: Box<IcsError>,
    },
}

impl IcsError {
    /// Wrap this error with the name of the source file it came from.
    pub fn in_source(self, filename: impl Into<String>) -> Self {
        IcsError::Source {
            filename: filename.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with any `Source` layers removed.
    pub fn root_cause(&self) -> &IcsError {
        match self {
            IcsError::Source { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Convenience alias used throughout event-ics.
pub type Result<T> = std::result::Result<T, IcsError>;
