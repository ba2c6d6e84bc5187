//! Splitting an event page into its frontmatter block and body.
//!
//! A page starts with a line that is exactly `---`, followed by YAML, followed
//! by another line that is exactly `---`. Everything after the closing line is
//! the body and is passed through untouched. A trailing `\r` on the delimiter
//! lines is tolerated so that CRLF-authored pages split the same way.

use serde_json::{Map, Number, Value};

use crate::error::{IcsError, Result};

const DELIMITER: &str = "---";

/// A page split at its frontmatter delimiters. Both parts borrow from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    /// The YAML text between the delimiter lines, without the final newline.
    pub head: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// Split `content` into frontmatter and body.
///
/// # Errors
/// Returns `IcsError::MissingFrontmatter` if the first line is not `---` or
/// no closing `---` line follows it.
///
/// # Example
/// ```
/// use event_ics::split_frontmatter;
/// let page = "---\ntitle: Demo\n---\n<p>Hello</p>\n";
/// let fm = split_frontmatter(page).unwrap();
/// assert_eq!(fm.head, "title: Demo");
/// assert_eq!(fm.body, "<p>Hello</p>\n");
/// ```
pub fn split_frontmatter(content: &str) -> Result<Frontmatter<'_>> {
    let (first, rest) = match content.split_once('\n') {
        Some(parts) => parts,
        None => return Err(IcsError::MissingFrontmatter),
    };
    if !is_delimiter(first) {
        return Err(IcsError::MissingFrontmatter);
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let bare = line.strip_suffix('\n').unwrap_or(line);
        if is_delimiter(bare) {
            let head = rest[..offset].strip_suffix('\n').unwrap_or("");
            let head = head.strip_suffix('\r').unwrap_or(head);
            let body = &rest[offset + line.len()..];
            return Ok(Frontmatter { head, body });
        }
        offset += line.len();
    }

    Err(IcsError::MissingFrontmatter)
}

/// Parse a frontmatter block as YAML into an untyped value.
///
/// An empty block parses to `null`, which then fails validation like any
/// other non-object. Tags are dropped and the tagged value kept.
///
/// # Errors
/// Returns `IcsError::InvalidYaml` if the block is not well-formed YAML, and
/// `IcsError::SchemaViolation` for values with no JSON equivalent: `.nan`,
/// `.inf`, `-.inf` and non-string mapping keys.
pub fn parse_yaml(head: &str) -> Result<Value> {
    if head.trim().is_empty() {
        return Ok(Value::Null);
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(head)?;
    yaml_to_json(&yaml, "")
}

/// Convert a YAML value tree to JSON. `path` is the JSON pointer of `yaml`.
fn yaml_to_json(yaml: &serde_yaml::Value, path: &str) -> Result<Value> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(Number::from(u)))
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| violation(path, format!("{n} is not a finite number")))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| yaml_to_json(item, &format!("{path}/{i}")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                let serde_yaml::Value::String(key) = key else {
                    return Err(violation(path, format!("mapping key {key:?} is not a string")));
                };
                let child = format!("{path}/{}", escape_pointer(key));
                map.insert(key.clone(), yaml_to_json(value, &child)?);
            }
            Ok(Value::Object(map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(&tagged.value, path),
    }
}

fn violation(path: &str, message: String) -> IcsError {
    IcsError::SchemaViolation {
        path: if path.is_empty() { "(root)".to_string() } else { path.to_string() },
        message,
    }
}

/// Escape a key for use as a JSON pointer segment (RFC 6901).
fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn is_delimiter(line: &str) -> bool {
    line.strip_suffix('\r').unwrap_or(line) == DELIMITER
}
