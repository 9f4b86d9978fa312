//! Batch coordination over a user's items.
//!
//! Batches run strictly in sequence: each batch's storage write completes
//! (or fails permanently) before the next batch begins, so the shared
//! per-user document is never updated concurrently. Items within a batch
//! are independent and fan out concurrently.

use futures::future::join_all;
use log::{info, warn};
use tokio::time::sleep;

use crate::config::NormalizerConfig;
use crate::error::{NormalizerError, Result};
use crate::format::format_for_storage;
use crate::invoice::extract_items;
use crate::llm::NameNormalizer;
use crate::pipeline::{process_item, WorkItem};
use crate::schema::{BatchResult, InventoryDocument, ProcessedItem, RunSummary};
use crate::store::DocumentStore;

/// Drives the normalization pipeline over all items belonging to a user,
/// in fixed-size batches, storing results batch by batch.
pub struct BatchCoordinator<S> {
    store: S,
    normalizer: NameNormalizer,
    config: NormalizerConfig,
}

impl<S: DocumentStore> BatchCoordinator<S> {
    pub fn new(store: S, normalizer: NameNormalizer, config: NormalizerConfig) -> Self {
        Self {
            store,
            normalizer,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Processes every invoice item for one user. Structural conditions
    /// (no invoices, no items) complete the run early; only exhausted
    /// storage retries surface as an error.
    pub async fn run(&self, user_id: &str) -> Result<RunSummary> {
        if self.config.batch_size == 0 {
            return Err(NormalizerError::InvalidBatchSize(self.config.batch_size));
        }

        let invoices = self.store.fetch_invoices(user_id).await?;
        if invoices.is_empty() {
            warn!("No invoices found for user {}", user_id);
            return Ok(RunSummary::completed_early(
                user_id,
                format!("No invoices found for user {}", user_id),
            ));
        }

        let mut work = Vec::new();
        for invoice in &invoices {
            let invoice_id = invoice
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            if let Some(items) = extract_items(invoice) {
                work.extend(items.into_iter().map(|raw| WorkItem {
                    raw,
                    user_id: user_id.to_string(),
                    invoice_id: invoice_id.clone(),
                }));
            }
        }

        if work.is_empty() {
            warn!("No items found to process for user {}", user_id);
            return Ok(RunSummary::completed_early(
                user_id,
                "No items found to process",
            ));
        }

        info!("Processing {} items for user {}", work.len(), user_id);

        let mut batches = Vec::new();
        let mut processed_count = 0;

        for (index, chunk) in work.chunks(self.config.batch_size).enumerate() {
            let batch_number = index + 1;
            let results = join_all(
                chunk
                    .iter()
                    .map(|item| process_item(&self.normalizer, item)),
            )
            .await;
            let valid: Vec<ProcessedItem> = results.into_iter().flatten().collect();
            processed_count += valid.len();

            info!(
                "Processed batch {}/{}, got {} valid results",
                batch_number,
                work.len().div_ceil(self.config.batch_size),
                valid.len()
            );

            let result = if valid.is_empty() {
                BatchResult {
                    status: BatchResult::status_for(0, chunk.len()),
                    batch: batch_number,
                    stored_count: 0,
                    total_items: chunk.len(),
                    errors: vec!["no items survived normalization".to_string()],
                    user_id: user_id.to_string(),
                }
            } else {
                self.store_batch(user_id, &valid, batch_number).await?
            };
            batches.push(result);
        }

        Ok(RunSummary {
            status: "completed".to_string(),
            message: None,
            processed_count,
            total_items: work.len(),
            batches,
            user_id: user_id.to_string(),
        })
    }

    /// Appends one batch's validated records to the user's inventory
    /// document and upserts it with bounded retry.
    async fn store_batch(
        &self,
        user_id: &str,
        items: &[ProcessedItem],
        batch_number: usize,
    ) -> Result<BatchResult> {
        info!(
            "Starting storage for batch {}: {} items for user {}",
            batch_number,
            items.len(),
            user_id
        );

        let mut document = match self.store.fetch_inventory(user_id).await? {
            Some(document) => document,
            None => {
                let supplier = items.first().map(|i| i.supplier.as_str()).unwrap_or("");
                InventoryDocument::new(user_id, supplier)
            }
        };

        let mut stored_count = 0;
        let mut errors = Vec::new();
        for (index, item) in items.iter().enumerate() {
            match format_for_storage(item, batch_number) {
                Ok(record) => {
                    document.items.push(record);
                    stored_count += 1;
                }
                Err(reason) => {
                    errors.push(format!("item {}: {}", index, reason));
                }
            }
        }
        document.touch();

        self.upsert_with_retry(&document).await?;

        Ok(BatchResult {
            status: BatchResult::status_for(stored_count, items.len()),
            batch: batch_number,
            stored_count,
            total_items: items.len(),
            errors,
            user_id: user_id.to_string(),
        })
    }

    async fn upsert_with_retry(&self, document: &InventoryDocument) -> Result<()> {
        let attempts = self.config.max_storage_attempts.max(1);
        for attempt in 1..=attempts {
            match self.store.upsert_inventory(document).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt == attempts => {
                    return Err(NormalizerError::StorageRetriesExhausted {
                        attempts,
                        details: e.to_string(),
                    });
                }
                Err(e) => {
                    warn!(
                        "Upsert attempt {}/{} failed for user {}: {}",
                        attempt, attempts, document.user_id, e
                    );
                    sleep(self.config.storage_backoff).await;
                }
            }
        }
        unreachable!("retry loop always returns");
    }
}
