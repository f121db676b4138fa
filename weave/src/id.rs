//! Element id helpers.
//!
//! Ids are lowercase, hyphen separated tokens of letters and digits (any
//! script) that are safe to use as element ids and data values.

use std::fmt::Write;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use regex::Regex;

static NOT_ALPHANUMERIC: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^\p{Alphabetic}\p{M}\p{Nd}]+").ok());

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Slug a single part: lowercase, runs of other characters become one `-`,
/// leading/trailing `-` trimmed.
///
/// A non-empty part with no letters or digits is encoded as `u` followed by
/// the hex of its UTF-8 bytes, so it never slugs to nothing.
fn slug(part: &str) -> String {
    let lower = part.to_lowercase();
    let replaced = match NOT_ALPHANUMERIC.as_ref() {
        Some(re) => re.replace_all(&lower, "-").into_owned(),
        None => lower,
    };
    let slug = replaced.trim_matches('-');
    if slug.is_empty() && !part.is_empty() {
        return part.bytes().fold(String::from("u"), |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        });
    }
    slug.to_string()
}

/// Build an id from one or more parts.
///
/// Empty parts are skipped.
///
/// ```
/// assert_eq!(weave::id::build(&["Data List", "Toggle"]), "data-list-toggle");
/// assert_eq!(weave::id::build(&["  Foo__Bar! "]), "foo-bar");
/// assert_eq!(weave::id::build(&["Café", "東京"]), "café-東京");
/// assert_eq!(weave::id::build(&["+"]), "u2b");
/// ```
pub fn build(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| slug(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Build an id and append a process-wide sequence number, so two calls
/// with the same parts never return the same id.
pub fn unique(parts: &[&str]) -> String {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let base = build(parts);
    if base.is_empty() {
        format!("id-{n}")
    } else {
        format!("{base}-{n}")
    }
}
