//! # Invoice Normalizer
//!
//! A library for normalizing free-text invoice line items into a standard
//! inventory catalog form via an LLM-backed rewriting pipeline.
//!
//! ## Core Concepts
//!
//! - **Standardization**: first-pass rewrite of a raw item description into
//!   a canonical short name, seeded with category rules and in-context
//!   training examples
//! - **Correction round**: one evaluate-then-extract cycle applied to a
//!   candidate name; the pipeline runs a fixed number of rounds
//! - **StorageRecord**: the validated, canonical representation of one
//!   inventory item persisted to the per-user destination document
//! - **Batch coordination**: items are normalized in fixed-size batches,
//!   concurrent within a batch, strictly sequential across batches
//!
//! ## Example
//!
//! ```rust,ignore
//! use invoice_normalizer::*;
//! use std::sync::Arc;
//!
//! let config = NormalizerConfig::default();
//! let corpus = Arc::new(TrainingCorpus::load_jsonl("training.jsonl"));
//! let client = Arc::new(OpenAiChatClient::new(std::env::var("OPENAI_API_KEY")?));
//! let normalizer = NameNormalizer::new(client, corpus, config.clone());
//!
//! let store = MemoryStore::new();
//! let coordinator = BatchCoordinator::new(store, normalizer, config);
//! let summary = coordinator.run("user-123").await?;
//! println!("{} of {} items stored", summary.processed_count, summary.total_items);
//! ```

pub mod batch;
pub mod config;
pub mod corpus;
pub mod error;
pub mod format;
pub mod invoice;
pub mod llm;
pub mod pipeline;
pub mod rules;
pub mod schema;
pub mod store;

pub use batch::BatchCoordinator;
pub use config::NormalizerConfig;
pub use corpus::{TrainingCorpus, TrainingExample};
pub use error::{NormalizerError, Result};
pub use format::{extract_brand, format_for_storage};
pub use invoice::{extract_items, RawItem};
pub use llm::{
    extract_final_name, ChatCompleter, CompletionRequest, CorrectionResponse, NameNormalizer,
    NameRefinement, OpenAiChatClient, RefineStage,
};
pub use pipeline::{process_item, WorkItem};
pub use schema::{
    BatchResult, BatchStatus, InventoryDocument, ProcessedItem, RunSummary, StorageRecord,
};
pub use store::{DocumentStore, MemoryStore};

use std::sync::Arc;

/// Convenience entry point: runs the full pipeline for one user against
/// the given store and chat client.
pub async fn process_user<S: DocumentStore>(
    store: S,
    client: Arc<dyn ChatCompleter>,
    corpus: Arc<TrainingCorpus>,
    config: NormalizerConfig,
    user_id: &str,
) -> Result<RunSummary> {
    let normalizer = NameNormalizer::new(client, corpus, config.clone());
    let coordinator = BatchCoordinator::new(store, normalizer, config);
    coordinator.run(user_id).await
}
