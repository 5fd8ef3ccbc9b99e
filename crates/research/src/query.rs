use regex::Regex;

const NEWS_TERMS: &[&str] = &["bbc", "reuters", "news", "reported"];
const VERIFY_TERMS: &[&str] = &["verify", "fact check"];

/// Plan the search queries issued for one claim.
///
/// News-flavoured claims without a date get pushed towards recent coverage.
/// Claims that themselves talk about verification get a second query asking
/// for independent confirmation.
pub fn plan_queries(claim: &str) -> Vec<String> {
    let claim = claim.trim();
    if claim.is_empty() {
        return Vec::new();
    }

    let lower = claim.to_lowercase();

    if NEWS_TERMS.iter().any(|term| lower.contains(term)) && !mentions_date(&lower) && !lower.contains("recent") {
        return vec![format!("{} recent news", claim)];
    }

    if VERIFY_TERMS.iter().any(|term| lower.contains(term)) {
        return vec![
            claim.to_string(),
            format!("{} confirmed OR verified by multiple sources", claim),
        ];
    }

    vec![claim.to_string()]
}

fn mentions_date(lower: &str) -> bool {
    let date = Regex::new(
        r"\b(202\d|january|february|march|april|may|june|july|august|september|october|november|december)\b",
    )
    .unwrap();
    date.is_match(lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_claim_is_searched_as_is() {
        assert_eq!(plan_queries("  The Earth orbits the Sun. "), vec!["The Earth orbits the Sun."]);
        assert!(plan_queries("   ").is_empty());
    }

    #[test]
    fn test_undated_news_claim_asks_for_recent_coverage() {
        assert_eq!(
            plan_queries("Reuters reported a strike at the port"),
            vec!["Reuters reported a strike at the port recent news"]
        );
    }

    #[test]
    fn test_dated_news_claim_is_left_alone() {
        assert_eq!(
            plan_queries("BBC News reported floods in March 2024"),
            vec!["BBC News reported floods in March 2024"]
        );
        assert_eq!(
            plan_queries("Recent news shows rents rising"),
            vec!["Recent news shows rents rising"]
        );
    }

    #[test]
    fn test_only_current_decade_years_count_as_dates() {
        assert_eq!(
            plan_queries("BBC reported floods in 1998"),
            vec!["BBC reported floods in 1998 recent news"]
        );
        assert_eq!(plan_queries("BBC reported floods in 2023"), vec!["BBC reported floods in 2023"]);
    }

    #[test]
    fn test_verification_claim_gets_second_query() {
        let queries = plan_queries("Officials could not verify the casualty figures");

        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0], "Officials could not verify the casualty figures");
        assert_eq!(
            queries[1],
            "Officials could not verify the casualty figures confirmed OR verified by multiple sources"
        );
    }
}
