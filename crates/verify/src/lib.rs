pub mod prompt;
pub mod report;
pub mod summarizer;
pub mod verdict;
pub mod verifier;

pub use report::{Assessment, CredibilityRating, RatingThresholds, Report, Tally};
pub use summarizer::Summarizer;
pub use verdict::{Verdict, VerdictLabel};
pub use verifier::{ClaimVerifier, VerifyConfig};
