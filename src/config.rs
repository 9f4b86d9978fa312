//! Pipeline tuning knobs.

use std::time::Duration;

/// Configuration for the normalization pipeline and batch coordinator.
///
/// The correction round count is a policy constant bounding latency and
/// cost per item, not an adaptive convergence loop; it is exposed here as a
/// tunable.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Model identifier sent with every chat-completion request.
    pub model: String,
    /// Low sampling temperature keeps rewrites near-deterministic.
    pub temperature: f32,
    /// Generous output-token ceiling to avoid truncated responses.
    pub max_output_tokens: u32,
    /// Number of evaluate-then-extract cycles after standardization.
    pub correction_rounds: usize,
    /// Items normalized and stored per batch.
    pub batch_size: usize,
    /// Bounded retry for the idempotent storage upsert.
    pub max_storage_attempts: u32,
    pub storage_backoff: Duration,
    /// Cap on in-context examples passed to the corrector prompt.
    pub corrector_example_limit: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.1,
            max_output_tokens: 15_000,
            correction_rounds: 2,
            batch_size: 10,
            max_storage_attempts: 3,
            storage_backoff: Duration::from_secs(1),
            corrector_example_limit: 5,
        }
    }
}

impl NormalizerConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_correction_rounds(mut self, rounds: usize) -> Self {
        self.correction_rounds = rounds;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_storage_retry(mut self, attempts: u32, backoff: Duration) -> Self {
        self.max_storage_attempts = attempts;
        self.storage_backoff = backoff;
        self
    }
}
