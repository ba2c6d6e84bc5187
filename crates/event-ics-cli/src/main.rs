//! `gen-ics` CLI — compile a directory of event pages into `.ics` files.
//!
//! ## Usage
//!
//! ```sh
//! # Compile docs/_events/*.html into docs/assets/ics/<identifier>.ics
//! gen-ics build -i docs/_events -o docs/assets/ics
//!
//! # Also write the upcoming-events manifest
//! gen-ics build -i docs/_events -o docs/assets/ics --manifest docs/assets/events.json
//!
//! # Reproducible output: freeze the DTSTAMP
//! gen-ics build -i docs/_events -o docs/assets/ics --stamp 2024-01-01T00:00:00Z
//!
//! # Validate everything without writing
//! gen-ics check -i docs/_events
//!
//! # Print the calendar for one page
//! gen-ics render docs/_events/spring-workshop.html
//! ```
//!
//! Nothing is written unless every page compiles. Set `RUST_LOG` or pass
//! `-v`/`-vv` for progress on stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use event_ics::config::{
    DEFAULT_PRODUCT_ID, DEFAULT_SITE_BASE_URL, DEFAULT_TIMEZONE, DEFAULT_UID_DOMAIN,
};
use event_ics::{CalendarConfig, EventCompiler, IdentifierPolicy, SourceFile};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "gen-ics",
    version,
    about = "Compile event pages with YAML frontmatter into iCalendar files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every page in a directory and write one .ics file per scheduled event
    Build {
        /// Directory of event pages
        #[arg(short, long)]
        input: PathBuf,
        /// Directory the .ics files are written to (created if missing)
        #[arg(short, long)]
        output: PathBuf,
        /// Also write a JSON manifest of scheduled events to this path
        #[arg(long)]
        manifest: Option<PathBuf>,
        /// DTSTAMP for every file, as RFC 3339 (defaults to now)
        #[arg(long)]
        stamp: Option<String>,
        #[command(flatten)]
        calendar: CalendarArgs,
    },
    /// Compile every page in a directory without writing anything
    Check {
        /// Directory of event pages
        #[arg(short, long)]
        input: PathBuf,
        #[command(flatten)]
        calendar: CalendarArgs,
    },
    /// Compile a single page and print its calendar
    Render {
        /// Event page to compile
        file: PathBuf,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// DTSTAMP as RFC 3339 (defaults to now)
        #[arg(long)]
        stamp: Option<String>,
        #[command(flatten)]
        calendar: CalendarArgs,
    },
}

/// Calendar settings shared by every subcommand.
#[derive(Args)]
struct CalendarArgs {
    /// IANA timezone attached to DTSTART/DTEND
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,
    /// PRODID of the generated calendars
    #[arg(long, default_value = DEFAULT_PRODUCT_ID)]
    product_id: String,
    /// Base URL for events without an explicit link
    #[arg(long, default_value = DEFAULT_SITE_BASE_URL)]
    base_url: String,
    /// Domain appended to identifiers to form UIDs
    #[arg(long, default_value = DEFAULT_UID_DOMAIN)]
    uid_domain: String,
    /// Require YYYY-MM-DD-<uid>.html filenames matching the frontmatter
    #[arg(long)]
    strict: bool,
}

impl CalendarArgs {
    fn into_config(self) -> CalendarConfig {
        CalendarConfig {
            timezone: self.timezone,
            product_id: self.product_id,
            site_base_url: self.base_url,
            uid_domain: self.uid_domain,
            identifier_policy: if self.strict {
                IdentifierPolicy::Strict
            } else {
                IdentifierPolicy::Permissive
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            output,
            manifest,
            stamp,
            calendar,
        } => {
            let compiler = EventCompiler::new(calendar.into_config())
                .context("Invalid calendar configuration")?;
            let stamp = resolve_stamp(stamp.as_deref())?;
            let sources = read_sources(&input)?;
            let batch = compiler
                .compile_all(&sources, stamp)
                .context("Failed to compile events")?;

            std::fs::create_dir_all(&output).with_context(|| {
                format!("Failed to create output directory: {}", output.display())
            })?;
            for file in &batch.files {
                let path = output.join(&file.filename);
                write_file(&path, &file.content)?;
                debug!(path = %path.display(), "wrote calendar");
            }
            if let Some(path) = manifest {
                let json = batch
                    .manifest
                    .to_json()
                    .context("Failed to serialize manifest")?;
                write_file(&path, &json)?;
                info!(path = %path.display(), events = batch.manifest.events.len(), "wrote manifest");
            }

            info!(
                written = batch.files.len(),
                skipped = batch.skipped.len(),
                "build finished"
            );
            println!(
                "Wrote {} calendar file(s) to {} ({} unscheduled skipped)",
                batch.files.len(),
                output.display(),
                batch.skipped.len()
            );
        }
        Commands::Check { input, calendar } => {
            let compiler = EventCompiler::new(calendar.into_config())
                .context("Invalid calendar configuration")?;
            let sources = read_sources(&input)?;
            let batch = compiler
                .compile_all(&sources, Utc::now())
                .context("Failed to compile events")?;
            println!(
                "{} page(s) OK: {} calendar file(s), {} unscheduled",
                sources.len(),
                batch.files.len(),
                batch.skipped.len()
            );
        }
        Commands::Render {
            file,
            output,
            stamp,
            calendar,
        } => {
            let compiler = EventCompiler::new(calendar.into_config())
                .context("Invalid calendar configuration")?;
            let stamp = resolve_stamp(stamp.as_deref())?;
            let source = read_source(&file)?;
            let compiled = compiler
                .compile_source(&source, stamp)
                .with_context(|| format!("Failed to compile {}", file.display()))?;

            match compiled {
                Some(event) => match output {
                    Some(path) => write_file(&path, &event.file.content)?,
                    None => print!("{}", event.file.content),
                },
                None => eprintln!("{}: no duration, no calendar produced", source.filename),
            }
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse `--stamp`, or read the wall clock once for the whole run.
fn resolve_stamp(stamp: Option<&str>) -> Result<DateTime<Utc>> {
    match stamp {
        Some(raw) => {
            let parsed = DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("Invalid --stamp '{}': expected RFC 3339", raw))?;
            Ok(parsed.with_timezone(&Utc))
        }
        None => Ok(Utc::now()),
    }
}

/// Read every file of `dir`, sorted by name for stable logs.
///
/// Symlinks are followed and subdirectories skipped; any other entry (a
/// dangling symlink, a socket) fails the run.
fn read_sources(dir: &Path) -> Result<Vec<SourceFile>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        } else if path.is_dir() {
            debug!(path = %path.display(), "skipping subdirectory");
        } else {
            anyhow::bail!("Not a readable event page: {}", path.display());
        }
    }
    paths.sort();

    let sources = paths
        .iter()
        .map(|path| read_source(path))
        .collect::<Result<Vec<_>>>()?;
    info!(dir = %dir.display(), pages = sources.len(), "read event pages");
    Ok(sources)
}

fn read_source(path: &Path) -> Result<SourceFile> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Not a UTF-8 file name: {}", path.display()))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(SourceFile::new(filename, content))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
