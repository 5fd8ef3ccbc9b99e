use verify::{Assessment, Report, VerdictLabel};

/// What was last submitted, so the form can be redrawn with it.
#[derive(Debug, Default, Clone)]
pub struct FormInput {
    pub text_mode: bool,
    pub url: String,
    pub text: String,
}

pub enum Outcome<'a> {
    Report(&'a Report),
    Error(&'a str),
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Links are only written for http(s) URLs; anything else is shown as text.
fn is_web_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn page(input: &FormInput, outcome: Option<Outcome<'_>>) -> String {
    let url = escape_html(&input.url);
    let text = escape_html(&input.text);
    let (url_tab, text_tab) = if input.text_mode { ("", " open") } else { (" open", "") };

    let results = match outcome {
        Some(Outcome::Report(report)) => report_html(report),
        Some(Outcome::Error(message)) => format!(r#"<div class="error">{}</div>"#, escape_html(message)),
        None => r#"<p class="hint">Results will appear here.</p>"#.to_string(),
    };

    format!(r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Fact Checker</title>
<style>
*{{box-sizing:border-box}}
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;margin:0;background:#f6f7f9;color:#1d1f23}}
.layout{{display:flex;gap:24px;max-width:1100px;margin:32px auto;padding:0 16px}}
main{{flex:3}}
aside{{flex:1;background:#fff;border:1px solid #e2e4e8;border-radius:12px;padding:20px;font-size:14px;line-height:1.5;align-self:flex-start}}
details{{background:#fff;border:1px solid #e2e4e8;border-radius:12px;padding:16px;margin-bottom:12px}}
summary{{font-weight:700;cursor:pointer}}
input[type=url],textarea{{width:100%;padding:10px;margin:12px 0;border:1px solid #c9ccd2;border-radius:8px;font:inherit}}
textarea{{min-height:160px}}
button{{background:#1a73e8;color:#fff;border:0;border-radius:8px;padding:10px 24px;font-weight:700;cursor:pointer}}
.report,.error,.hint{{background:#fff;border:1px solid #e2e4e8;border-radius:12px;padding:20px;margin-top:16px}}
.error{{border-color:#e0a3a3;background:#fdf2f2;color:#8a1c1c}}
.hint{{color:#6b7079}}
.claim{{border-top:1px solid #eceef1;padding:12px 0}}
.label{{display:inline-block;border-radius:6px;padding:2px 8px;font-size:12px;font-weight:700;text-transform:uppercase}}
.supported{{background:#e3f4e8;color:#1e6b34}}
.contradicted{{background:#fbe4e4;color:#8a1c1c}}
.unverifiable{{background:#eef0f3;color:#4a4f57}}
.final{{font-size:20px;font-weight:800;margin-top:16px}}
.real{{color:#1e6b34}}.fake{{color:#8a1c1c}}.uncertain{{color:#8a6d1c}}
</style>
</head>
<body>
<div class="layout">
<main>
<h1>Fact Checker</h1>
<details{url_tab}>
<summary>Check a URL</summary>
<form method="post" action="/check">
<input type="hidden" name="mode" value="url">
<input type="url" name="url" placeholder="https://www.bbc.com/news/..." value="{url}">
<button type="submit">Check URL</button>
</form>
</details>
<details{text_tab}>
<summary>Check text</summary>
<form method="post" action="/check">
<input type="hidden" name="mode" value="text">
<textarea name="text" placeholder="Paste the text you want fact-checked">{text}</textarea>
<button type="submit">Check Text</button>
</form>
</details>
{results}
</main>
<aside>
<h3>About</h3>
<p>This tool reads an article or a piece of text, picks out its factual claims, searches the web for evidence about each one and reports whether the evidence supports it.</p>
<p>Every verdict is automated. Treat the result as a starting point and follow the linked sources before relying on it.</p>
</aside>
</div>
</body>
</html>"##)
}

fn report_html(report: &Report) -> String {
    let mut html = String::from(r#"<div class="report">"#);

    html.push_str("<h2>Fact-check results</h2>");
    let source = report.title.as_deref().unwrap_or(&report.source);
    html.push_str(&format!("<p><strong>Source:</strong> {}</p>", escape_html(source)));

    html.push_str("<h3>Claims</h3>");
    for verdict in &report.verdicts {
        html.push_str(&format!(
            r#"<div class="claim"><span class="label {label}">{label}</span> {claim}<p>{rationale}</p>"#,
            label = verdict.label,
            claim = escape_html(&verdict.claim.text),
            rationale = escape_html(&verdict.rationale),
        ));
        if !verdict.sources.is_empty() && verdict.label != VerdictLabel::Unverifiable {
            html.push_str("<ul>");
            for url in &verdict.sources {
                let text = escape_html(url);
                if is_web_url(url) {
                    html.push_str(&format!(r#"<li><a href="{text}" rel="noopener nofollow">{text}</a></li>"#));
                } else {
                    html.push_str(&format!("<li>{text}</li>"));
                }
            }
            html.push_str("</ul>");
        }
        html.push_str("</div>");
    }

    html.push_str(&format!(
        "<h3>Overall credibility: {}</h3><p>{}</p>",
        report.rating.label(),
        escape_html(&report.summary)
    ));

    if !report.recommendations.is_empty() {
        html.push_str("<h3>Recommendations</h3><ul>");
        for advice in &report.recommendations {
            html.push_str(&format!("<li>{}</li>", escape_html(advice)));
        }
        html.push_str("</ul>");
    }

    let class = match report.assessment {
        Assessment::Real => "real",
        Assessment::Fake => "fake",
        Assessment::Uncertain => "uncertain",
    };
    html.push_str(&format!(
        r#"<p class="final {}">{}</p></div>"#,
        class,
        report.assessment.label()
    ));

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script> & 'y'"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt; &amp; &#39;y&#39;"
        );
    }

    #[test]
    fn test_report_only_links_web_urls() {
        use extract::Claim;
        use verify::{CredibilityRating, Tally, Verdict};

        let report = Report {
            source_id: "abc".to_string(),
            source: "text".to_string(),
            title: None,
            verdicts: vec![Verdict {
                claim: Claim::new("The Earth orbits the Sun."),
                label: VerdictLabel::Supported,
                rationale: "NASA says so.".to_string(),
                sources: vec![
                    "javascript:alert(document.cookie)".to_string(),
                    "https://science.nasa.gov/earth/".to_string(),
                ],
            }],
            tally: Tally {
                supported: 1,
                contradicted: 0,
                unverifiable: 0,
            },
            rating: CredibilityRating::HighlyCredible,
            assessment: Assessment::Real,
            summary: "One accurate claim.".to_string(),
            recommendations: Vec::new(),
        };

        let html = page(&FormInput::default(), Some(Outcome::Report(&report)));

        assert!(!html.contains(r#"href="javascript:"#));
        assert!(html.contains("<li>javascript:alert(document.cookie)</li>"));
        assert!(html.contains(r#"<a href="https://science.nasa.gov/earth/" rel="noopener nofollow">"#));
    }

    #[test]
    fn test_page_keeps_input_escaped() {
        let input = FormInput {
            text_mode: true,
            url: String::new(),
            text: "<b>bold</b>".to_string(),
        };

        let html = page(&input, Some(Outcome::Error("Please enter some text")));

        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains(r#"<div class="error">Please enter some text</div>"#));
        assert!(html.contains("<details open>\n<summary>Check text"));
    }
}
