use regex::Regex;

/// Tracks claims already accepted for a request and spots near-duplicates.
pub struct ClaimNormalizer {
    punctuation: Regex,
    whitespace: Regex,
    seen: Vec<String>,
}

impl ClaimNormalizer {
    pub fn new() -> Self {
        Self {
            punctuation: Regex::new(r#"[.,!?;:'"“”‘’()]"#).unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
            seen: Vec::new(),
        }
    }

    /// Normalize claim text: lowercase, strip punctuation, collapse whitespace
    pub fn normalize(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        let stripped = self.punctuation.replace_all(lower.trim(), "");
        self.whitespace.replace_all(&stripped, " ").trim().to_string()
    }

    /// Record a claim; returns false when it repeats one seen before.
    pub fn admit(&mut self, text: &str) -> bool {
        let normalized = self.normalize(text);
        if normalized.is_empty() {
            return false;
        }

        if self.seen.iter().any(|existing| Self::are_similar(&normalized, existing)) {
            return false;
        }

        self.seen.push(normalized);
        true
    }

    fn are_similar(a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }

        // Share most words (order-insensitive)
        let words_a: Vec<&str> = a.split_whitespace().collect();
        let words_b: Vec<&str> = b.split_whitespace().collect();

        if words_a.len() > 1 && words_b.len() > 1 {
            let common = words_a.iter().filter(|w| words_b.contains(w)).count();
            let total = words_a.len().max(words_b.len());
            return common as f64 / total as f64 > 0.7; // 70% overlap
        }

        false
    }
}

impl Default for ClaimNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
