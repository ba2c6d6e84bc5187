//! iCalendar (RFC 5545) serialization of a single event.
//!
//! Output is one `VCALENDAR` holding exactly one `VEVENT`:
//!
//! ```text
//! BEGIN:VCALENDAR
//! VERSION:2.0
//! PRODID:<product id>
//! CALSCALE:GREGORIAN
//! METHOD:PUBLISH
//! BEGIN:VEVENT
//! UID:<identifier>@<uid domain>
//! SUMMARY:<title>
//! DTSTAMP:<YYYYMMDDThhmmssZ>
//! DTSTART;TZID=<tz>:<YYYYMMDD>T<hhmm>00
//! DTEND;TZID=<tz>:<YYYYMMDD>T<hhmm>00
//! LOCATION:<venue name>, <venue address>    (if venue)
//! LOCATION:<remote link>                    (if remote)
//! URL:<link, or base URL + source filename>
//! END:VEVENT
//! END:VCALENDAR
//! ```
//!
//! Every line ends in CRLF, the last one included. Lines longer than 75 octets
//! are folded with CRLF + space, never inside a UTF-8 character. Property
//! values are emitted as given, without TEXT escaping.

use chrono::{DateTime, Utc};

use crate::config::CalendarConfig;
use crate::identifier::Identifier;
use crate::types::{CalendarFile, EventFrontmatter};

const CRLF: &str = "\r\n";
/// Maximum octets per physical line, excluding the CRLF.
const MAX_LINE_OCTETS: usize = 75;

/// Compile one validated event into a calendar file.
///
/// Returns `None` when the event has no `duration`: its schedule is not fixed
/// and it must not appear in any calendar. The result depends only on the
/// arguments, so a frozen `stamp` makes the output byte-for-byte reproducible.
pub fn compile_event(
    event: &EventFrontmatter,
    identifier: &Identifier,
    config: &CalendarConfig,
    stamp: DateTime<Utc>,
) -> Option<CalendarFile> {
    let window = event.duration.as_ref()?;
    let date = ics_date(&event.date);
    let tz = &config.timezone;

    let mut out = String::new();
    push_line(&mut out, "BEGIN:VCALENDAR");
    push_line(&mut out, "VERSION:2.0");
    push_line(&mut out, &format!("PRODID:{}", config.product_id));
    push_line(&mut out, "CALSCALE:GREGORIAN");
    push_line(&mut out, "METHOD:PUBLISH");
    push_line(&mut out, "BEGIN:VEVENT");
    push_line(
        &mut out,
        &format!("UID:{}@{}", identifier.stem, config.uid_domain),
    );
    push_line(&mut out, &format!("SUMMARY:{}", event.title));
    push_line(&mut out, &format!("DTSTAMP:{}", format_stamp(stamp)));
    push_line(
        &mut out,
        &format!("DTSTART;TZID={}:{}T{}", tz, date, ics_time(&window.from)),
    );
    push_line(
        &mut out,
        &format!("DTEND;TZID={}:{}T{}", tz, date, ics_time(&window.to)),
    );
    if let Some(venue) = &event.venue {
        push_line(
            &mut out,
            &format!("LOCATION:{}, {}", venue.name, venue.address),
        );
    }
    if let Some(remote) = &event.remote {
        push_line(&mut out, &format!("LOCATION:{}", remote.link));
    }
    let url = match &event.link {
        Some(link) => link.clone(),
        None => config.page_url(&identifier.source_filename),
    };
    push_line(&mut out, &format!("URL:{}", url));
    push_line(&mut out, "END:VEVENT");
    push_line(&mut out, "END:VCALENDAR");

    Some(CalendarFile {
        filename: identifier.ics_filename(),
        content: out,
    })
}

/// `2024-03-05` → `20240305`
fn ics_date(date: &str) -> String {
    date.replace('-', "")
}

/// `09:30` → `093000`
fn ics_time(time: &str) -> String {
    let mut t = time.replace(':', "");
    t.push_str("00");
    t
}

/// UTC timestamp in the compact form `YYYYMMDDThhmmssZ`.
fn format_stamp(stamp: DateTime<Utc>) -> String {
    stamp.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Append one content line, folded to `MAX_LINE_OCTETS` and CRLF-terminated.
fn push_line(out: &mut String, line: &str) {
    let mut rest = line;
    let mut limit = MAX_LINE_OCTETS;
    loop {
        if rest.len() <= limit {
            out.push_str(rest);
            out.push_str(CRLF);
            return;
        }
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.push_str(&rest[..cut]);
        out.push_str(CRLF);
        out.push(' ');
        rest = &rest[cut..];
        // The leading space of a continuation line counts toward the limit.
        limit = MAX_LINE_OCTETS - 1;
    }
}
