//! Paradigm labels and confidence scoring
//!
//! The label comes from the class and function counts of the best parse
//! snapshot. Confidence is a weighted sum of four terms (matched ratio,
//! feature balance, coherence and programming density), adjusted per
//! label, rounded half to even and clamped. Coverage is the furthest
//! position reached as a percentage of the input.

mod scorer;

pub use scorer::{coverage, ClassificationScorer, ConfidenceBreakdown, ScoringWeights};

use crate::logging::codes;
use crate::syntax::ParseStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "OOP")]
    Oop,
    #[serde(rename = "PP")]
    Pp,
    #[serde(rename = "HYB")]
    Hyb,
    #[serde(rename = "TEXT")]
    Text,
}

impl Label {
    pub fn from_counts(classes: usize, functions: usize) -> Self {
        match (classes > 0, functions > 0) {
            (true, true) => Self::Hyb,
            (true, false) => Self::Oop,
            (false, true) => Self::Pp,
            (false, false) => Self::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oop => "OOP",
            Self::Pp => "PP",
            Self::Hyb => "HYB",
            Self::Text => "TEXT",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Oop => "object-oriented",
            Self::Pp => "procedural",
            Self::Hyb => "hybrid",
            Self::Text => "plain text",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final verdict for one input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub label: Label,
    /// Integer percentage
    pub confidence: u8,
    /// Percentage with one decimal
    pub coverage: f64,
}

/// `LABEL CONFIDENCE COVERAGE`, e.g. `OOP 90 100.0`
impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:.1}", self.label, self.confidence, self.coverage)
    }
}

/// Score with the default weights
pub fn score(stats: &ParseStatistics) -> ClassificationResult {
    ClassificationScorer::new().score(stats)
}

pub fn score_with_weights(stats: &ParseStatistics, weights: ScoringWeights) -> ClassificationResult {
    ClassificationScorer::with_weights(weights).score(stats)
}

pub fn init_scoring_logging() -> Result<(), String> {
    codes::validate_codes("Scoring", &[codes::success::CLASSIFICATION_COMPLETE])?;
    ScoringWeights::default().validate()?;

    let weights = ScoringWeights::default();
    crate::log_debug!("Scoring weights initialized",
        "matched_weight" => weights.matched_weight,
        "feature_weight" => weights.feature_weight,
        "min_confidence" => weights.min_confidence,
        "max_confidence" => weights.max_confidence
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_counts() {
        assert_eq!(Label::from_counts(0, 0), Label::Text);
        assert_eq!(Label::from_counts(2, 0), Label::Oop);
        assert_eq!(Label::from_counts(0, 3), Label::Pp);
        assert_eq!(Label::from_counts(1, 1), Label::Hyb);
    }

    #[test]
    fn test_result_display_and_json() {
        let result = ClassificationResult {
            label: Label::Hyb,
            confidence: 82,
            coverage: 100.0,
        };
        assert_eq!(result.to_string(), "HYB 82 100.0");

        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["label"], "HYB");
        assert_eq!(json["confidence"], 82);
        assert_eq!(json["coverage"], 100.0);
    }

    #[test]
    fn test_custom_weights_change_confidence() {
        use crate::syntax::SyntaxClassifier;
        use crate::tokens::{Token, TokenStream};

        let tokens = [
            Token::ClassKeyword,
            Token::Identifier(1),
            Token::LBrace,
            Token::Identifier(2),
            Token::RBrace,
        ];
        let stats = SyntaxClassifier::new(TokenStream::from_tokens(&tokens)).parse();

        let default = score(&stats);
        let capped = score_with_weights(
            &stats,
            ScoringWeights {
                max_confidence: 60,
                ..ScoringWeights::default()
            },
        );
        assert_eq!(default.label, capped.label);
        assert_eq!(default.confidence, 90);
        assert_eq!(capped.confidence, 60);
    }

    #[test]
    fn test_init_logging() {
        assert!(init_scoring_logging().is_ok());
    }
}
