pub const EXTRACTION_SYSTEM: &str = "You extract the readable article from scraped web pages. \
You remove navigation, advertising, cookie banners, share widgets and other page furniture, \
and you never add, drop or reword a factual statement.";

pub const CLAIMS_SYSTEM: &str = "You identify verifiable factual claims in text. \
You separate statements about events, statistics and historical facts from opinions, \
subjective descriptions and predictions, and only report the former.";

pub fn build_extraction_prompt(page_text: &str, source_hint: Option<&str>) -> String {
    let hint = source_hint
        .map(|h| format!("SOURCE NOTE: {}\n\n", h))
        .unwrap_or_default();

    format!(
        r#"Clean the following scraped page content.

INSTRUCTIONS:
1. Keep the main article text: headline, body paragraphs, byline and date
2. Remove navigation, ads, related-story lists, comment sections and social widgets
3. Preserve every factual statement exactly as written
4. Output plain readable text only, no commentary

{}PAGE CONTENT:
{}

CLEANED ARTICLE:"#,
        hint, page_text
    )
}

pub fn build_claims_prompt(text: &str, max_claims: usize) -> String {
    format!(
        r#"Identify the most significant verifiable factual claims in the text below.

INSTRUCTIONS:
1. A factual claim asserts an event, a statistic, an attribution or a historical fact
2. Skip opinions ("the policy is unfair"), subjective statements ("the situation is dire") and predictions
3. Prioritise claims central to the text's main points
4. Quote each claim as a short self-contained sentence
5. Return at most {} claims; return an empty list if there are none

SCHEMA:
{{
  "claims": [
    {{"claim": "exact claim statement", "rationale": "why this can be checked"}}
  ]
}}

Output ONLY the JSON object, no markdown, no explanations.

TEXT:
{}

JSON OUTPUT:"#,
        max_claims, text
    )
}

pub fn build_retry_prompt(invalid_json: &str) -> String {
    format!(
        r#"The following JSON is invalid:

{}

Fix this JSON. Output only valid JSON with no markdown formatting, no code blocks, no explanations. Just the raw JSON object."#,
        invalid_json
    )
}
