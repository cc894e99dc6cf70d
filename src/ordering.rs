//! Presentation and submission order for task identifiers.
//!
//! Identifiers are treated as dotted outlines ("1", "1.2", "1.10", "2.1.3").
//! Each segment is left-padded with zeros to a fixed width and the segment
//! lists are compared lexicographically, so "1.2" sorts before "1.10".
//! Scheduling never uses this order; it always walks rows as they were given.

use crate::task::ScheduledTask;
use std::cmp::Ordering;

const SEGMENT_WIDTH: usize = 5;

/// Sort key for a dotted identifier. Spaces are ignored and empty segments
/// dropped. Segments longer than the pad width are kept as-is.
pub fn version_key(identifier: &str) -> Vec<String> {
    let compact: String = identifier.chars().filter(|c| *c != ' ').collect();
    compact
        .split('.')
        .filter(|part| !part.is_empty())
        .map(zero_pad)
        .collect()
}

fn zero_pad(part: &str) -> String {
    let len = part.chars().count();
    if len >= SEGMENT_WIDTH {
        return part.to_string();
    }
    let fill = "0".repeat(SEGMENT_WIDTH - len);
    match part.strip_prefix(['+', '-']) {
        Some(rest) => format!("{}{fill}{rest}", &part[..1]),
        None => format!("{fill}{part}"),
    }
}

pub fn compare_identifiers(a: &str, b: &str) -> Ordering {
    version_key(a).cmp(&version_key(b))
}

/// Stable sort into presentation order; ties keep their scheduling order.
pub fn sort_for_submission(tasks: &mut [ScheduledTask]) {
    tasks.sort_by_cached_key(|task| version_key(&task.identifier));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_pad_keeps_sign_in_front() {
        assert_eq!(zero_pad("7"), "00007");
        assert_eq!(zero_pad("-3"), "-0003");
        assert_eq!(zero_pad("123456"), "123456");
    }
}
