//! Label, confidence and coverage from parse statistics

use super::{ClassificationResult, Label};
use crate::config::compile_time::scoring::*;
use crate::syntax::ParseStatistics;
use serde::{Deserialize, Serialize};

/// Confidence formula parameters. Defaults come from the build profile;
/// the `[scoring]` table of a runtime config overrides individual fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Scales the matched-token ratio
    pub matched_weight: f64,
    /// Scales the feature balance for OOP, PP and HYB
    pub feature_weight: f64,
    /// TEXT feature score with no features
    pub text_feature_base: f64,
    /// Deducted from the TEXT base per feature found
    pub text_feature_penalty: f64,
    pub coherence_weight: f64,
    /// Deducted from coherence per syntax error
    pub coherence_error_penalty: f64,
    pub coherence_floor: f64,
    pub density_weight: f64,
    /// Added to TEXT when little input matched
    pub text_bonus: f64,
    pub text_bonus_threshold: f64,
    pub text_bonus_cap: f64,
    /// Applied to a structural label without features
    pub featureless_factor: f64,
    pub min_confidence: u8,
    pub max_confidence: u8,
    pub empty_input_confidence: u8,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            matched_weight: MATCHED_WEIGHT,
            feature_weight: FEATURE_WEIGHT,
            text_feature_base: TEXT_FEATURE_BASE,
            text_feature_penalty: TEXT_FEATURE_PENALTY,
            coherence_weight: COHERENCE_WEIGHT,
            coherence_error_penalty: COHERENCE_ERROR_PENALTY,
            coherence_floor: COHERENCE_FLOOR,
            density_weight: DENSITY_WEIGHT,
            text_bonus: TEXT_BONUS,
            text_bonus_threshold: TEXT_BONUS_THRESHOLD,
            text_bonus_cap: TEXT_BONUS_CAP,
            featureless_factor: FEATURELESS_FACTOR,
            min_confidence: MIN_CONFIDENCE,
            max_confidence: MAX_CONFIDENCE,
            empty_input_confidence: EMPTY_INPUT_CONFIDENCE,
        }
    }
}

impl ScoringWeights {
    pub fn validate(&self) -> Result<(), String> {
        if self.min_confidence > self.max_confidence || self.max_confidence > 100 {
            return Err(format!(
                "confidence bounds {}..={} are invalid",
                self.min_confidence, self.max_confidence
            ));
        }
        if !(self.min_confidence..=self.max_confidence).contains(&self.empty_input_confidence) {
            return Err("empty_input_confidence must lie within the confidence bounds".to_string());
        }
        if !(0.0..=1.0).contains(&self.text_bonus_threshold)
            || !(0.0..=1.0).contains(&self.featureless_factor)
        {
            return Err("text_bonus_threshold and featureless_factor must be in 0..=1".to_string());
        }
        let weights = [
            self.matched_weight,
            self.feature_weight,
            self.text_feature_base,
            self.text_feature_penalty,
            self.coherence_weight,
            self.coherence_error_penalty,
            self.coherence_floor,
            self.density_weight,
            self.text_bonus,
            self.text_bonus_cap,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("weights must be finite and non-negative".to_string());
        }
        Ok(())
    }
}

/// Individual confidence terms before adjustment, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceBreakdown {
    pub matched: f64,
    pub features: f64,
    pub coherence: f64,
    pub density: f64,
    /// Sum after the label adjustment, before rounding and clamping
    pub adjusted: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ClassificationScorer {
    weights: ScoringWeights,
}

impl ClassificationScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, stats: &ParseStatistics) -> ClassificationResult {
        let label = Label::from_counts(stats.best.classes, stats.best.functions);

        ClassificationResult {
            label,
            confidence: self.confidence(stats, label),
            coverage: coverage(stats),
        }
    }

    pub fn confidence(&self, stats: &ParseStatistics, label: Label) -> u8 {
        if stats.total_tokens == 0 {
            return self.weights.empty_input_confidence;
        }

        let adjusted = self.breakdown(stats, label).adjusted;
        let min = f64::from(self.weights.min_confidence);
        let max = f64::from(self.weights.max_confidence);

        adjusted.round_ties_even().clamp(min, max) as u8
    }

    pub fn breakdown(&self, stats: &ParseStatistics, label: Label) -> ConfidenceBreakdown {
        let w = &self.weights;
        let total = stats.total_tokens.max(1) as f64;
        let classes = stats.best.classes as f64;
        let functions = stats.best.functions as f64;
        let features = classes + functions;
        let feature_divisor = features.max(1.0);

        let matched_ratio = (stats.best.matched as f64 / total).min(1.0);
        let matched = matched_ratio * w.matched_weight;

        let features_term = match label {
            Label::Oop => classes / feature_divisor * w.feature_weight,
            Label::Pp => functions / feature_divisor * w.feature_weight,
            Label::Hyb => classes.min(functions) / feature_divisor * w.feature_weight,
            Label::Text if features == 0.0 => w.text_feature_base,
            Label::Text => (w.text_feature_base - features * w.text_feature_penalty).max(0.0),
        };

        let coherence = (w.coherence_weight
            - stats.progress.errors as f64 * w.coherence_error_penalty)
            .max(w.coherence_floor);

        let density = stats.progress.density as f64 / total * w.density_weight;

        let sum = matched + features_term + coherence + density;
        let adjusted = match label {
            Label::Text if matched_ratio < w.text_bonus_threshold => {
                (sum + w.text_bonus).min(w.text_bonus_cap)
            }
            Label::Text => sum,
            _ if features < 1.0 => sum * w.featureless_factor,
            _ => sum,
        };

        ConfidenceBreakdown {
            matched,
            features: features_term,
            coherence,
            density,
            adjusted,
        }
    }
}

/// Percentage of input consumed, one decimal, at most 100
pub fn coverage(stats: &ParseStatistics) -> f64 {
    if stats.total_tokens == 0 {
        return 100.0;
    }

    let consumed = stats.best.position.max(stats.progress.position) as f64;
    let percent = consumed / stats.total_tokens as f64 * 100.0;
    ((percent * 10.0).round_ties_even() / 10.0).min(100.0)
}
