//! Layered recovery of a JSON block array from free-form model output.
//!
//! The proposer is instructed to return only a JSON array, but real
//! replies arrive wrapped in prose, markdown fences, or an object with a
//! `blocks` key. Recovery is an explicit ordered list of strategies —
//! direct parse, fenced-block parse, balanced-bracket scan — run in
//! order, short-circuiting on the first success.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```json\s*([\s\S]*?)```").unwrap());

type ExtractFn = fn(&str) -> Option<Vec<Value>>;

/// Strategy order is the contract: cheapest and strictest first.
const STRATEGIES: &[(&str, ExtractFn)] = &[
    ("direct", parse_direct),
    ("fenced", parse_fenced),
    ("bracket-scan", parse_bracket_scan),
];

/// Extract the first recoverable JSON array of block objects from `text`.
/// Returns `None` when no strategy succeeds.
pub fn extract_block_array(text: &str) -> Option<Vec<Value>> {
    for (name, strategy) in STRATEGIES {
        if let Some(items) = strategy(text) {
            debug!(strategy = name, count = items.len(), "block array recovered");
            return Some(items);
        }
    }
    None
}

/// Accept a bare array, or an object wrapping the array under `blocks`.
fn coerce_array(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("blocks") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn parse_direct(text: &str) -> Option<Vec<Value>> {
    serde_json::from_str::<Value>(text.trim())
        .ok()
        .and_then(coerce_array)
}

fn parse_fenced(text: &str) -> Option<Vec<Value>> {
    let caps = FENCE_RE.captures(text)?;
    serde_json::from_str::<Value>(caps[1].trim())
        .ok()
        .and_then(coerce_array)
}

/// Scan for the first balanced `[...]` substring and try to parse it.
/// Gives up after the first balanced candidate fails — a later candidate
/// would start inside the broken one.
fn parse_bracket_scan(text: &str) -> Option<Vec<Value>> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let candidate = &text[start..start + offset + ch.len_utf8()];
                    return match serde_json::from_str::<Value>(candidate) {
                        Ok(Value::Array(items)) => Some(items),
                        _ => None,
                    };
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_array_parses() {
        let items = extract_block_array(r#"[{"id":"1"},{"id":"2"}]"#).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn object_with_blocks_key_parses() {
        let items = extract_block_array(r#"{"blocks":[{"id":"1"}]}"#).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn fenced_block_parses() {
        let text = "Here is the plan:\n```json\n[{\"id\":\"1\"}]\n```\nLet me know.";
        let items = extract_block_array(text).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn bracket_scan_recovers_array_from_prose() {
        let text = "Sure! The steps are [{\"id\":\"1\",\"commands\":[\"dig example.com\"]}] as requested.";
        let items = extract_block_array(text).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn strategy_order_prefers_fence_over_scan() {
        // The bare bracket appears first in the text, but the fence is the
        // higher-priority strategy.
        let text = "ignore [1,2,3] this\n```json\n[{\"id\":\"fenced\"}]\n```";
        let items = extract_block_array(text).unwrap();
        assert_eq!(items[0]["id"], "fenced");
    }

    #[test]
    fn garbage_yields_none() {
        assert!(extract_block_array("not json at all").is_none());
        assert!(extract_block_array("").is_none());
        assert!(extract_block_array("{\"no\":\"blocks key\"}").is_none());
    }

    #[test]
    fn unbalanced_bracket_yields_none() {
        assert!(extract_block_array("take [1, 2 and never close").is_none());
    }

    #[test]
    fn scalar_json_is_not_an_array() {
        assert!(extract_block_array("42").is_none());
        assert!(extract_block_array("\"just a string\"").is_none());
    }
}
