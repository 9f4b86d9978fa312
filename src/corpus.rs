//! Training-corpus loading for in-context prompt examples.
//!
//! The corpus is line-delimited JSON. A record is either a category block
//! (`{"category": ..., "examples": [...]}`) whose examples inherit the
//! parent category, or a single flat example. The corpus is loaded once per
//! run and shared read-only with the pipeline.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One canonical input/output pair scoped to a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub completion: String,
}

/// Immutable, process-wide set of training examples.
#[derive(Debug, Clone, Default)]
pub struct TrainingCorpus {
    examples: Vec<TrainingExample>,
}

impl TrainingCorpus {
    pub fn new(examples: Vec<TrainingExample>) -> Self {
        Self { examples }
    }

    /// Loads a JSONL corpus file. Malformed lines are skipped with a
    /// warning; a missing file yields an empty corpus so the pipeline can
    /// proceed degraded rather than fail.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                error!("Training file '{}' not available: {}", path.display(), e);
                return Self::default();
            }
        };

        let corpus = Self::from_reader(BufReader::new(file));
        info!(
            "Loaded {} training examples from {}",
            corpus.len(),
            path.display()
        );
        corpus
    }

    /// Parses JSONL records from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Self {
        let mut examples = Vec::new();

        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Skipping unreadable corpus line: {}", e);
                    continue;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let value: serde_json::Value = match serde_json::from_str(trimmed) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Skipping invalid JSON line: {}: {}", trimmed, e);
                    continue;
                }
            };

            match value.get("examples").and_then(|v| v.as_array()) {
                Some(nested) => {
                    let category = value
                        .get("category")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string();
                    for entry in nested {
                        match serde_json::from_value::<TrainingExample>(entry.clone()) {
                            Ok(mut example) => {
                                example.category = category.clone();
                                examples.push(example);
                            }
                            Err(e) => warn!("Skipping invalid nested example: {}", e),
                        }
                    }
                }
                None => match serde_json::from_value::<TrainingExample>(value) {
                    Ok(example) => examples.push(example),
                    Err(e) => warn!("Skipping invalid example record: {}: {}", trimmed, e),
                },
            }
        }

        Self { examples }
    }

    /// All examples whose category matches, ignoring ASCII case, in corpus
    /// order.
    pub fn examples_for(&self, category: &str) -> Vec<&TrainingExample> {
        self.examples
            .iter()
            .filter(|ex| ex.category.eq_ignore_ascii_case(category))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}
