use research::Evidence;

use crate::report::{CredibilityRating, Tally};
use crate::verdict::Verdict;

pub const VERIFY_SYSTEM: &str = "You are a careful fact-checker. You judge a single claim \
strictly against the search results you are given and never rely on anything else.";

pub const SUMMARY_SYSTEM: &str = "You write short, neutral credibility summaries of \
fact-check results for general readers.";

pub fn build_verification_prompt(claim: &str, evidence: &Evidence, max_snippet_chars: usize) -> String {
    let mut prompt = format!("CLAIM:\n{}\n\nSEARCH RESULTS:\n", claim);

    for (i, item) in evidence.items.iter().enumerate() {
        let snippet: String = item.snippet.chars().take(max_snippet_chars).collect();
        prompt.push_str(&format!("[{}] {}\n{}\n{}\n\n", i + 1, item.title, item.url, snippet));
    }

    prompt.push_str(
        r#"TASK: Decide whether the search results support the claim.

LABELS:
- "supported": the results confirm the claim
- "contradicted": the results show the claim is false
- "unverifiable": the results are missing, off-topic, mixed or only partly agree

Output ONLY a JSON object, no markdown:
{"label": "supported|contradicted|unverifiable", "rationale": "one or two sentences citing the results", "sources": ["urls you relied on"]}

JSON OUTPUT:"#,
    );

    prompt
}

pub fn build_summary_prompt(source: &str, verdicts: &[Verdict], tally: &Tally, rating: CredibilityRating) -> String {
    let mut prompt = format!("SOURCE: {}\n\nVERIFIED CLAIMS:\n", source);

    for verdict in verdicts {
        prompt.push_str(&format!(
            "- Claim: {} | Verdict: {} | {}\n",
            verdict.claim.text, verdict.label, verdict.rationale
        ));
    }

    prompt.push_str(&format!(
        "\nTALLY: {} supported, {} contradicted, {} unverifiable\nOVERALL RATING: {}\n\n",
        tally.supported,
        tally.contradicted,
        tally.unverifiable,
        rating.label()
    ));

    prompt.push_str(
        r#"TASK: Write a 2-4 sentence overall assessment of the content and what the checks found,
then 1-3 short recommendations telling readers how to interpret it. Do not change the rating.

Output ONLY a JSON object, no markdown:
{"summary": "...", "recommendations": ["..."]}

JSON OUTPUT:"#,
    );

    prompt
}
