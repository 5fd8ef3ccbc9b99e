use regex::Regex;
use url::Url;

use crate::AcquireError;

const URL_PATTERN: &str = r"^https?://[^\s/$.?#].[^\s]*$";

/// Check the shape of a user-supplied URL before any request is made.
///
/// Rejects anything that is not http(s), and URLs whose path carries a
/// `/YYYY/` segment later than `current_year`.
pub fn validate_url(raw: &str, current_year: i32) -> Result<Url, AcquireError> {
    let raw = raw.trim();
    let pattern = Regex::new(URL_PATTERN).expect("static URL pattern");

    if !pattern.is_match(raw) {
        return Err(AcquireError::InvalidUrl(raw.to_string()));
    }

    let url = Url::parse(raw).map_err(|_| AcquireError::InvalidUrl(raw.to_string()))?;
    if url.host_str().is_none() {
        return Err(AcquireError::InvalidUrl(raw.to_string()));
    }

    if let Some(year) = year_in_path(url.path()) {
        if year > current_year {
            return Err(AcquireError::FutureDate { year });
        }
    }

    Ok(url)
}

fn year_in_path(path: &str) -> Option<i32> {
    let re = Regex::new(r"/(\d{4})/").expect("static year pattern");
    re.captures(path)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_url("https://www.bbc.com/news/world-europe-68736364", 2026).is_ok());
        assert!(validate_url("  http://example.org/a?b=c  ", 2026).is_ok());
    }

    #[test]
    fn test_rejects_malformed_urls() {
        for raw in ["", "bbc.com/news", "ftp://host/file", "https://", "https:// spaced.com"] {
            assert!(
                matches!(validate_url(raw, 2026), Err(AcquireError::InvalidUrl(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_future_year_in_path() {
        let err = validate_url("https://news.example.com/2031/05/story", 2026).unwrap_err();
        assert!(matches!(err, AcquireError::FutureDate { year: 2031 }));

        assert!(validate_url("https://news.example.com/2024/05/story", 2026).is_ok());
    }
}
