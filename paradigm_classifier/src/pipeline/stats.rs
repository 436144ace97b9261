use super::PipelineResult;
use crate::scoring::Label;
use std::collections::BTreeMap;
use std::time::Duration;

/// Aggregate over many classifications
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub total_files_processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_tokens_processed: usize,
    pub total_processing_time: Duration,
    pub label_counts: BTreeMap<&'static str, usize>,
}

impl PipelineStats {
    pub fn record_success(&mut self, result: &PipelineResult) {
        self.total_files_processed += 1;
        self.successful += 1;
        self.total_tokens_processed += result.token_count();
        self.total_processing_time += result.processing_duration;
        *self
            .label_counts
            .entry(result.classification.label.as_str())
            .or_insert(0) += 1;
    }

    pub fn record_failure(&mut self) {
        self.total_files_processed += 1;
        self.failed += 1;
    }

    pub fn label_count(&self, label: Label) -> usize {
        self.label_counts.get(label.as_str()).copied().unwrap_or(0)
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_files_processed == 0 {
            0.0
        } else {
            self.successful as f64 / self.total_files_processed as f64
        }
    }

    pub fn average_processing_time(&self) -> Duration {
        match u32::try_from(self.successful) {
            Ok(n) if n > 0 => self.total_processing_time / n,
            _ => Duration::ZERO,
        }
    }
}
