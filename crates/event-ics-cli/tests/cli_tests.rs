//! Integration tests for the `gen-ics` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run the build, check and
//! render subcommands through the actual binary against temporary page
//! directories.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STAMP: &str = "2024-01-15T08:00:00Z";

fn scheduled_page(title: &str, date: &str) -> String {
    format!(
        "---\nlayout: event\ntitle: {title}\nshort_title: {title}\ndate: {date}\nduration:\n  from: \"09:30\"\n  to: \"17:00\"\nvenue:\n  name: Hall A\n  address: Rue Neuve 1\n---\n<p>{title}</p>\n"
    )
}

fn unscheduled_page(title: &str) -> String {
    format!(
        "---\nlayout: event\ntitle: {title}\nshort_title: {title}\ndate: 2024-09-01\nduration: null\n---\n"
    )
}

fn write_pages(dir: &Path, pages: &[(&str, String)]) {
    for (name, content) in pages {
        fs::write(dir.join(name), content).expect("fixture page must be writable");
    }
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

// ─────────────────────────────────────────────────────────────────────────────
// build
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn build_writes_one_file_per_scheduled_event() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pages(
        input.path(),
        &[
            ("spring-workshop.html", scheduled_page("Spring Workshop", "2024-03-05")),
            ("autumn-meetup.html", scheduled_page("Autumn Meetup", "2024-10-12")),
            ("tbd.html", unscheduled_page("To Be Decided")),
        ],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "--stamp", STAMP, "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 calendar file(s)"));

    assert_eq!(
        listing(output.path()),
        vec!["autumn-meetup.ics", "spring-workshop.ics"]
    );

    let ics = fs::read_to_string(output.path().join("spring-workshop.ics")).unwrap();
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(ics.contains("UID:spring-workshop@lisa-ai.com\r\n"));
    assert!(ics.contains("DTSTAMP:20240115T080000Z\r\n"));
    assert!(ics.contains("DTSTART;TZID=Europe/Brussels:20240305T093000\r\n"));
    assert!(ics.contains("DTEND;TZID=Europe/Brussels:20240305T170000\r\n"));
    assert!(ics.contains("LOCATION:Hall A, Rue Neuve 1\r\n"));
    assert!(ics.contains("URL:https://lisa-ai.be/events/spring-workshop.html\r\n"));
    assert!(ics.ends_with("END:VCALENDAR\r\n"));
}

#[test]
fn build_with_frozen_stamp_is_reproducible() {
    let input = TempDir::new().unwrap();
    write_pages(
        input.path(),
        &[("spring.html", scheduled_page("Spring", "2024-03-05"))],
    );

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let output = TempDir::new().unwrap();
        Command::cargo_bin("gen-ics")
            .unwrap()
            .args(["build", "--stamp", STAMP, "-i"])
            .arg(input.path())
            .arg("-o")
            .arg(output.path())
            .assert()
            .success();
        outputs.push(fs::read(output.path().join("spring.ics")).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn build_creates_missing_output_directory() {
    let input = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let output = root.path().join("assets").join("ics");
    write_pages(
        input.path(),
        &[("spring.html", scheduled_page("Spring", "2024-03-05"))],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert_eq!(listing(&output), vec!["spring.ics"]);
}

#[test]
fn build_duplicate_identifier_writes_nothing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let with_uid = |date: &str| {
        format!(
            "---\nlayout: event\nuid: meetup\ntitle: Meetup\nshort_title: Meetup\ndate: {date}\nduration:\n  from: \"18:00\"\n  to: \"20:00\"\n---\n"
        )
    };
    write_pages(
        input.path(),
        &[
            ("2024-03-05-meetup.html", with_uid("2024-03-05")),
            ("2024-04-02-meetup.html", with_uid("2024-04-02")),
            ("2024-05-07-other.html", {
                let mut page = with_uid("2024-05-07");
                page = page.replace("uid: meetup", "uid: other");
                page
            }),
        ],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "--strict", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate event identifier"));

    assert!(listing(output.path()).is_empty(), "no file may be written");
}

#[test]
fn build_invalid_page_fails_and_writes_nothing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pages(
        input.path(),
        &[
            ("good.html", scheduled_page("Good", "2024-03-05")),
            (
                "talk.html",
                "---\nlayout: talk\ntitle: T\nshort_title: T\ndate: 2024-03-05\n---\n".to_string(),
            ),
        ],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("talk.html"))
        .stderr(predicate::str::contains("/layout"));

    assert!(listing(output.path()).is_empty());
}

#[test]
fn build_missing_frontmatter_fails() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pages(
        input.path(),
        &[("plain.html", "<p>no frontmatter here</p>\n".to_string())],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing frontmatter"));
}

#[test]
fn build_writes_manifest() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let manifest = output.path().join("events.json");
    write_pages(
        input.path(),
        &[
            ("late.html", scheduled_page("Late", "2024-06-01")),
            ("early.html", scheduled_page("Early", "2024-02-01")),
        ],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(json["events"][0]["identifier"], "early");
    assert_eq!(json["events"][1]["identifier"], "late");
}

#[test]
fn build_honours_calendar_flags() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pages(
        input.path(),
        &[("spring.html", scheduled_page("Spring", "2024-03-05"))],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args([
            "build",
            "--timezone",
            "America/New_York",
            "--uid-domain",
            "example.org",
            "--base-url",
            "https://example.org/events/",
            "--product-id",
            "-//Example//Events//EN",
            "-i",
        ])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success();

    let ics = fs::read_to_string(output.path().join("spring.ics")).unwrap();
    assert!(ics.contains("PRODID:-//Example//Events//EN\r\n"));
    assert!(ics.contains("UID:spring@example.org\r\n"));
    assert!(ics.contains("DTSTART;TZID=America/New_York:20240305T093000\r\n"));
    assert!(ics.contains("URL:https://example.org/events/spring.html\r\n"));
}

#[test]
fn build_rejects_unknown_timezone() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "--timezone", "Nowhere/Special", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown timezone"));
}

#[test]
fn build_rejects_bad_stamp() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "--stamp", "yesterday", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--stamp"));
}

#[test]
fn build_missing_input_directory_fails() {
    let output = TempDir::new().unwrap();

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "-i", "/nonexistent/event-pages", "-o"])
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read directory"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_reports_counts_without_writing() {
    let input = TempDir::new().unwrap();
    write_pages(
        input.path(),
        &[
            ("spring.html", scheduled_page("Spring", "2024-03-05")),
            ("tbd.html", unscheduled_page("TBD")),
        ],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["check", "-i"])
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2 page(s) OK: 1 calendar file(s), 1 unscheduled",
        ));

    assert_eq!(listing(input.path()), vec!["spring.html", "tbd.html"]);
}

#[test]
fn check_strict_reports_mismatch() {
    let input = TempDir::new().unwrap();
    write_pages(
        input.path(),
        &[(
            "2024-03-05-spring.html",
            "---\nlayout: event\nuid: autumn\ntitle: S\nshort_title: S\ndate: 2024-03-05\n---\n"
                .to_string(),
        )],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["check", "--strict", "-i"])
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mismatched uid"));
}

// ─────────────────────────────────────────────────────────────────────────────
// render
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn render_prints_calendar_to_stdout() {
    let input = TempDir::new().unwrap();
    write_pages(
        input.path(),
        &[("spring.html", scheduled_page("Spring", "2024-03-05"))],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["render", "--stamp", STAMP])
        .arg(input.path().join("spring.html"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("BEGIN:VCALENDAR\r\n"))
        .stdout(predicate::str::contains("SUMMARY:Spring\r\n"))
        .stdout(predicate::str::contains("DTSTAMP:20240115T080000Z\r\n"));
}

#[test]
fn render_unscheduled_prints_nothing() {
    let input = TempDir::new().unwrap();
    write_pages(input.path(), &[("tbd.html", unscheduled_page("TBD"))]);

    Command::cargo_bin("gen-ics")
        .unwrap()
        .arg("render")
        .arg(input.path().join("tbd.html"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no duration"));
}

#[test]
fn render_to_file() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let target = output.path().join("spring.ics");
    write_pages(
        input.path(),
        &[("spring.html", scheduled_page("Spring", "2024-03-05"))],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["render", "--stamp", STAMP, "-o"])
        .arg(&target)
        .arg(input.path().join("spring.html"))
        .assert()
        .success();

    let ics = fs::read_to_string(&target).unwrap();
    assert!(ics.contains("UID:spring@lisa-ai.com\r\n"));
}

#[cfg(unix)]
#[test]
fn build_follows_symlinked_pages() {
    let shared = TempDir::new().unwrap();
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pages(
        shared.path(),
        &[("meetup.html", scheduled_page("Meetup", "2024-05-02"))],
    );
    std::os::unix::fs::symlink(
        shared.path().join("meetup.html"),
        input.path().join("spring-meetup.html"),
    )
    .unwrap();

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "--stamp", STAMP, "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 1 calendar file(s)"));

    assert_eq!(listing(output.path()), vec!["spring-meetup.ics"]);
    let ics = fs::read_to_string(output.path().join("spring-meetup.ics")).unwrap();
    assert!(ics.contains("UID:spring-meetup@lisa-ai.com\r\n"));
}

#[cfg(unix)]
#[test]
fn build_dangling_symlink_fails_and_writes_nothing() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pages(input.path(), &[("good.html", scheduled_page("Good", "2024-03-05"))]);
    std::os::unix::fs::symlink(
        input.path().join("missing.html"),
        input.path().join("gone.html"),
    )
    .unwrap();

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("gone.html"));

    assert!(listing(output.path()).is_empty());
}

#[test]
fn build_skips_subdirectories() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_pages(input.path(), &[("good.html", scheduled_page("Good", "2024-03-05"))]);
    fs::create_dir(input.path().join("drafts")).unwrap();
    write_pages(
        &input.path().join("drafts"),
        &[("draft.html", scheduled_page("Draft", "2024-04-01"))],
    );

    Command::cargo_bin("gen-ics")
        .unwrap()
        .args(["build", "-i"])
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success();

    assert_eq!(listing(output.path()), vec!["good.ics"]);
}
