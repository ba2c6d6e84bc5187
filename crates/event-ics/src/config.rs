//! Per-run calendar settings.
//!
//! The defaults are the values the site publishes with; every event of a run
//! is compiled with the same settings.

use crate::error::{IcsError, Result};
use crate::identifier::IdentifierPolicy;

/// IANA timezone attached to every DTSTART/DTEND.
pub const DEFAULT_TIMEZONE: &str = "Europe/Brussels";
/// PRODID of every generated calendar.
pub const DEFAULT_PRODUCT_ID: &str = "-//Your Organization//Workshop Calendar//EN";
/// Base of the URL constructed for events without an explicit `link`.
pub const DEFAULT_SITE_BASE_URL: &str = "https://lisa-ai.be/events/";
/// Domain appended to identifiers to form UIDs.
pub const DEFAULT_UID_DOMAIN: &str = "lisa-ai.com";

/// Settings shared by every event of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    pub timezone: String,
    pub product_id: String,
    pub site_base_url: String,
    pub uid_domain: String,
    pub identifier_policy: IdentifierPolicy,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            site_base_url: DEFAULT_SITE_BASE_URL.to_string(),
            uid_domain: DEFAULT_UID_DOMAIN.to_string(),
            identifier_policy: IdentifierPolicy::default(),
        }
    }
}

impl CalendarConfig {
    /// Check that the settings can produce well-formed calendars.
    ///
    /// # Errors
    /// Returns `IcsError::InvalidConfig` if the timezone is not a known IANA
    /// identifier, or if the product id or UID domain is empty.
    pub fn validate(&self) -> Result<()> {
        let _tz: chrono_tz::Tz = self
            .timezone
            .parse()
            .map_err(|_| IcsError::InvalidConfig(format!("unknown timezone '{}'", self.timezone)))?;
        if self.product_id.trim().is_empty() {
            return Err(IcsError::InvalidConfig("product id is empty".to_string()));
        }
        if self.uid_domain.trim().is_empty() {
            return Err(IcsError::InvalidConfig("UID domain is empty".to_string()));
        }
        Ok(())
    }

    /// The canonical page URL for a source file: base URL joined with the filename.
    pub fn page_url(&self, source_filename: &str) -> String {
        if self.site_base_url.ends_with('/') {
            format!("{}{}", self.site_base_url, source_filename)
        } else {
            format!("{}/{}", self.site_base_url, source_filename)
        }
    }
}
