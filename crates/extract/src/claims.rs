use regex::Regex;
use serde_json::Value;

use crate::schema::{ClaimList, RawClaim};

/// Turn a model reply into `(claim, rationale)` pairs.
///
/// Structured JSON is preferred; a reply that never became valid JSON is read
/// as a numbered or bulleted list instead.
pub fn parse_claims(json: Option<Value>, raw: &str) -> Vec<(String, Option<String>)> {
    let parsed = match json {
        Some(Value::Array(items)) => serde_json::from_value::<Vec<RawClaim>>(Value::Array(items)).ok(),
        Some(value) => serde_json::from_value::<ClaimList>(value).ok().map(|list| list.claims),
        None => None,
    };

    let pairs = match parsed {
        Some(claims) => claims.into_iter().map(RawClaim::into_parts).collect(),
        None => parse_list(raw),
    };

    pairs
        .into_iter()
        .map(|(claim, rationale)| {
            (
                clean_claim(&claim),
                rationale.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()),
            )
        })
        .filter(|(claim, _)| !claim.is_empty())
        .collect()
}

fn parse_list(raw: &str) -> Vec<(String, Option<String>)> {
    let marker = Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s+(.+)$").unwrap();

    raw.lines()
        .filter_map(|line| marker.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .map(|item| match item.split_once(" - ") {
            Some((claim, why)) => (claim.to_string(), Some(why.to_string())),
            None => (item, None),
        })
        .collect()
}

fn clean_claim(raw: &str) -> String {
    let mut text = raw.trim();
    for prefix in ["Claim:", "claim:", "CLAIM:"] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest.trim();
        }
    }
    text.trim_matches(|c| c == '"' || c == '“' || c == '”' || c == '*')
        .trim()
        .to_string()
}

/// Byte offset of `claim` inside `text`, ignoring case.
pub fn locate(text: &str, claim: &str) -> Option<usize> {
    let pattern = format!("(?i){}", regex::escape(claim.trim_end_matches('.')));
    Regex::new(&pattern).ok()?.find(text).map(|m| m.start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_structured_claims() {
        let json = serde_json::json!({
            "claims": [
                {"claim": "The Earth orbits the Sun.", "rationale": "Astronomical fact"},
                {"text": "Water boils at 100C at sea level."},
                "Paris is the capital of France."
            ]
        });

        let claims = parse_claims(Some(json), "");

        assert_eq!(claims.len(), 3);
        assert_eq!(claims[0].0, "The Earth orbits the Sun.");
        assert_eq!(claims[0].1.as_deref(), Some("Astronomical fact"));
        assert_eq!(claims[1].0, "Water boils at 100C at sea level.");
        assert_eq!(claims[2].1, None);
    }

    #[test]
    fn test_parse_numbered_list_fallback() {
        let raw = "Here are the claims:\n\
                   1. Claim: \"The bridge opened in 1937.\" - dated event\n\
                   2) At least 10 people were killed\n\
                   - The river burst its banks\n\
                   Some closing remark.";

        let claims = parse_claims(None, raw);

        assert_eq!(claims.len(), 3);
        assert_eq!(claims[0].0, "The bridge opened in 1937.");
        assert_eq!(claims[0].1.as_deref(), Some("dated event"));
        assert_eq!(claims[1].0, "At least 10 people were killed");
        assert_eq!(claims[2].0, "The river burst its banks");
    }

    #[test]
    fn test_no_claims_message_yields_nothing() {
        let raw = "No verifiable factual claims were identified in the content.";
        assert!(parse_claims(None, raw).is_empty());
        assert!(parse_claims(Some(serde_json::json!({"claims": []})), raw).is_empty());
    }

    #[test]
    fn test_locate_is_case_insensitive() {
        let text = "Intro. the earth orbits the sun. Outro.";
        assert_eq!(locate(text, "The Earth orbits the Sun."), Some(7));
        assert_eq!(locate(text, "Mars has two moons"), None);
    }
}
