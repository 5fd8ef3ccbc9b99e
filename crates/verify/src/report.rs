use serde::{Deserialize, Serialize};

use crate::verdict::{Verdict, VerdictLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredibilityRating {
    HighlyCredible,
    MostlyCredible,
    SomewhatCredible,
    NotCredible,
}

impl CredibilityRating {
    pub fn label(&self) -> &'static str {
        match self {
            CredibilityRating::HighlyCredible => "Highly Credible",
            CredibilityRating::MostlyCredible => "Mostly Credible",
            CredibilityRating::SomewhatCredible => "Somewhat Credible",
            CredibilityRating::NotCredible => "Not Credible",
        }
    }
}

/// Final real/fake call shown to the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assessment {
    Real,
    Fake,
    Uncertain,
}

impl Assessment {
    pub fn label(&self) -> &'static str {
        match self {
            Assessment::Real => "Real",
            Assessment::Fake => "Fake",
            Assessment::Uncertain => "Uncertain",
        }
    }
}

impl From<CredibilityRating> for Assessment {
    fn from(rating: CredibilityRating) -> Self {
        match rating {
            CredibilityRating::HighlyCredible | CredibilityRating::MostlyCredible => Assessment::Real,
            CredibilityRating::NotCredible => Assessment::Fake,
            CredibilityRating::SomewhatCredible => Assessment::Uncertain,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub supported: usize,
    pub contradicted: usize,
    pub unverifiable: usize,
}

impl Tally {
    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        let mut tally = Self::default();
        for verdict in verdicts {
            match verdict.label {
                VerdictLabel::Supported => tally.supported += 1,
                VerdictLabel::Contradicted => tally.contradicted += 1,
                VerdictLabel::Unverifiable => tally.unverifiable += 1,
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.supported + self.contradicted + self.unverifiable
    }
}

/// Share-of-claims cut-offs for the credibility rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingThresholds {
    /// Supported share needed for "highly credible" (with nothing contradicted)
    pub highly_credible: f64,
    pub mostly_credible: f64,
    /// Largest contradicted share still allowed for "mostly credible"
    pub mostly_max_contradicted: f64,
    /// Contradicted share at which content is "not credible"
    pub not_credible: f64,
}

impl Default for RatingThresholds {
    fn default() -> Self {
        Self {
            highly_credible: 0.8,
            mostly_credible: 0.6,
            mostly_max_contradicted: 0.2,
            not_credible: 0.5,
        }
    }
}

impl RatingThresholds {
    pub fn rate(&self, tally: &Tally) -> CredibilityRating {
        let total = tally.total();
        if total == 0 {
            return CredibilityRating::SomewhatCredible;
        }

        let supported = tally.supported as f64 / total as f64;
        let contradicted = tally.contradicted as f64 / total as f64;

        if contradicted >= self.not_credible {
            CredibilityRating::NotCredible
        } else if supported >= self.highly_credible && tally.contradicted == 0 {
            CredibilityRating::HighlyCredible
        } else if supported >= self.mostly_credible && contradicted <= self.mostly_max_contradicted {
            CredibilityRating::MostlyCredible
        } else {
            CredibilityRating::SomewhatCredible
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub source_id: String,
    /// The checked URL, or "text" for pasted content
    pub source: String,
    pub title: Option<String>,
    pub verdicts: Vec<Verdict>,
    pub tally: Tally,
    pub rating: CredibilityRating,
    pub assessment: Assessment,
    pub summary: String,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(supported: usize, contradicted: usize, unverifiable: usize) -> Tally {
        Tally {
            supported,
            contradicted,
            unverifiable,
        }
    }

    #[test]
    fn test_rating_bands() {
        let thresholds = RatingThresholds::default();

        assert_eq!(thresholds.rate(&tally(1, 0, 0)), CredibilityRating::HighlyCredible);
        assert_eq!(thresholds.rate(&tally(4, 0, 1)), CredibilityRating::HighlyCredible);
        assert_eq!(thresholds.rate(&tally(4, 1, 0)), CredibilityRating::MostlyCredible);
        assert_eq!(thresholds.rate(&tally(3, 0, 2)), CredibilityRating::MostlyCredible);
        assert_eq!(thresholds.rate(&tally(0, 0, 3)), CredibilityRating::SomewhatCredible);
        assert_eq!(thresholds.rate(&tally(2, 2, 1)), CredibilityRating::SomewhatCredible);
        assert_eq!(thresholds.rate(&tally(1, 2, 1)), CredibilityRating::NotCredible);
        assert_eq!(thresholds.rate(&tally(0, 0, 0)), CredibilityRating::SomewhatCredible);
    }

    #[test]
    fn test_assessment_follows_rating() {
        assert_eq!(Assessment::from(CredibilityRating::HighlyCredible), Assessment::Real);
        assert_eq!(Assessment::from(CredibilityRating::MostlyCredible), Assessment::Real);
        assert_eq!(Assessment::from(CredibilityRating::SomewhatCredible), Assessment::Uncertain);
        assert_eq!(Assessment::from(CredibilityRating::NotCredible), Assessment::Fake);
    }

    #[test]
    fn test_rating_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&CredibilityRating::MostlyCredible).unwrap(),
            "\"mostly_credible\""
        );
        assert_eq!(serde_json::to_string(&Assessment::Fake).unwrap(), "\"fake\"");
    }
}
