//! The multi-pass name refinement pipeline.
//!
//! A fixed number of correction rounds follows the first-pass rewrite:
//! standardize, then for each round evaluate/correct and extract the
//! accepted name. The round count bounds latency and cost per item; it is
//! configured, not adaptive.

use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::config::NormalizerConfig;
use crate::corpus::TrainingCorpus;
use crate::error::Result;
use crate::llm::client::ChatCompleter;
use crate::llm::prompts::{
    correction_prompt, standardize_prompt, CORRECTOR_SYSTEM, STANDARDIZER_SYSTEM,
};
use crate::llm::types::{CompletionRequest, CorrectionResponse};
use crate::rules::rules_for;

/// Names the point in the refinement an item has reached. Interpolated
/// into log lines for progress reporting; the loop itself runs for
/// [`NormalizerConfig::correction_rounds`] rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefineStage {
    /// First-pass rewrite produced.
    Standardized,
    /// Correction round `n` (1-based) completed.
    Corrected(usize),
    /// All rounds done; the outcome is settled.
    Final,
}

/// Outcome of refining one item name.
#[derive(Debug, Clone)]
pub struct NameRefinement {
    /// First-pass standardized name (the original description when the
    /// standardizer call failed).
    pub standardized_name: String,
    /// Name accepted by the last correction round, if its extraction
    /// succeeded.
    pub final_corrected_name: Option<String>,
}

/// Rewrites raw item descriptions into standard catalog names.
pub struct NameNormalizer {
    client: Arc<dyn ChatCompleter>,
    corpus: Arc<TrainingCorpus>,
    config: NormalizerConfig,
}

impl NameNormalizer {
    pub fn new(
        client: Arc<dyn ChatCompleter>,
        corpus: Arc<TrainingCorpus>,
        config: NormalizerConfig,
    ) -> Self {
        Self {
            client,
            corpus,
            config,
        }
    }

    fn request(&self, system: &str, user: String, require_json: bool) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            system: system.to_string(),
            user,
            temperature: self.config.temperature,
            max_tokens: self.config.max_output_tokens,
            require_json,
        }
    }

    /// First-pass standardization. Issues exactly one completion request
    /// and returns the trimmed response verbatim. Any failure falls back
    /// to the original description; this boundary never raises.
    pub async fn standardize(&self, description: &str, category: &str) -> String {
        let examples = self.corpus.examples_for(category);
        let prompt = standardize_prompt(description, rules_for(category), &examples);
        let request = self.request(STANDARDIZER_SYSTEM, prompt, false);

        match self.client.complete(&request).await {
            Ok(response) => response.trim().to_string(),
            Err(e) => {
                error!("Error standardizing item name '{}': {}", description, e);
                description.to_string()
            }
        }
    }

    /// Second-pass evaluation and correction of a candidate name. Returns
    /// the raw structured response; callers extract the accepted name from
    /// it. A failed request is an `Err`, which the refinement loop treats
    /// as "no correction this round".
    pub async fn evaluate_and_correct(
        &self,
        standardized_name: &str,
        original_name: &str,
        category: &str,
    ) -> Result<String> {
        let mut examples = self.corpus.examples_for(category);
        examples.truncate(self.config.corrector_example_limit);

        let prompt = correction_prompt(
            standardized_name,
            original_name,
            rules_for(category),
            &examples,
        );
        let request = self.request(CORRECTOR_SYSTEM, prompt, true);
        self.client.complete(&request).await
    }

    /// Runs the full refinement: standardize, then the configured number
    /// of correction rounds. Each round corrects the best candidate so
    /// far; a round whose extraction fails keeps the previous candidate.
    /// The final name is attached only when the last round's extraction
    /// succeeded.
    pub async fn refine(&self, original_name: &str, category: &str) -> NameRefinement {
        let standardized_name = self.standardize(original_name, category).await;
        debug!(
            "Stage {:?}: '{}' -> '{}'",
            RefineStage::Standardized,
            original_name,
            standardized_name
        );

        let mut candidate = standardized_name.clone();
        let mut accepted = None;

        for round in 1..=self.config.correction_rounds {
            accepted = match self
                .evaluate_and_correct(&candidate, original_name, category)
                .await
            {
                Ok(evaluation) => match extract_final_name(&evaluation) {
                    Some(name) => {
                        debug!(
                            "Stage {:?}: accepted '{}'",
                            RefineStage::Corrected(round),
                            name
                        );
                        candidate = name.clone();
                        Some(name)
                    }
                    None => {
                        warn!(
                            "Stage {:?}: no corrected name in evaluation for '{}'",
                            RefineStage::Corrected(round),
                            original_name
                        );
                        None
                    }
                },
                Err(e) => {
                    warn!(
                        "Stage {:?}: evaluation failed for '{}': {}",
                        RefineStage::Corrected(round),
                        original_name,
                        e
                    );
                    None
                }
            };
        }

        info!(
            "Stage {:?}: '{}' -> {:?}",
            RefineStage::Final,
            original_name,
            accepted.as_deref().unwrap_or(standardized_name.as_str())
        );

        NameRefinement {
            standardized_name,
            final_corrected_name: accepted,
        }
    }
}

/// Extracts the literal corrected name from an evaluation response.
///
/// Pure: tries the JSON [`CorrectionResponse`] contract first, then falls
/// back to scanning for a `Final corrected name:` line. Returns `None` for
/// anything unparseable (including error sentinels) and never fails.
pub fn extract_final_name(evaluation: &str) -> Option<String> {
    if let Ok(response) = serde_json::from_str::<CorrectionResponse>(evaluation.trim()) {
        let name = response.final_corrected_name.trim();
        if !name.is_empty() {
            return Some(name.to_string());
        }
        return None;
    }

    for line in evaluation.lines() {
        if line.to_lowercase().starts_with("final corrected name:") {
            return line
                .split_once(':')
                .map(|(_, name)| name.trim().to_string());
        }
    }
    None
}
