//! Lenient version ordering for manifest and installed version strings.
//!
//! The license server publishes two-part versions ("2.0") and the host
//! reports whatever the product author wrote, so strict semver parsing is
//! not enough. Numeric cores are padded to three components before the
//! `semver` comparison; strings that still do not parse order below any
//! parseable version and fall back to a lexicographic comparison against
//! each other.

use semver::Version;
use std::cmp::Ordering;

pub fn compare(a: &str, b: &str) -> Ordering {
    match (parse_loose(a), parse_loose(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// True when `available` is strictly newer than `installed`.
pub fn is_newer(available: &str, installed: &str) -> bool {
    compare(installed, available) == Ordering::Less
}

fn parse_loose(raw: &str) -> Option<Version> {
    let raw = raw.trim();
    let raw = raw.strip_prefix(['v', 'V']).unwrap_or(raw);
    if raw.is_empty() {
        return None;
    }

    if let Ok(version) = Version::parse(raw) {
        return Some(version);
    }

    // Pad "2" and "2.0" to the three components semver requires, keeping
    // any pre-release or build suffix in place.
    let split = raw.find(['-', '+']).unwrap_or(raw.len());
    let (core, rest) = raw.split_at(split);
    let padded = match core.matches('.').count() {
        0 => format!("{core}.0.0{rest}"),
        1 => format!("{core}.0{rest}"),
        _ => return None,
    };

    Version::parse(&padded).ok()
}
