use async_trait::async_trait;
use invoice_normalizer::*;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Deterministic stand-in for the chat-completion service. Echoes the item
/// description back through both passes so outcomes are stable across runs.
struct DeterministicChat;

fn stub_standardize(description: &str) -> String {
    let mut words = description.split_whitespace();
    let first = words.next().unwrap_or_default();
    let mut name: String = first
        .chars()
        .enumerate()
        .map(|(i, c)| if i == 0 { c.to_ascii_uppercase() } else { c })
        .collect();
    if let Some(second) = words.next() {
        name.push_str(", ");
        name.push_str(second);
    }
    name
}

#[async_trait]
impl ChatCompleter for DeterministicChat {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if request.require_json {
            let name = request
                .user
                .lines()
                .find_map(|line| line.strip_prefix("Standardized name: "))
                .unwrap_or("Unknown")
                .trim();
            Ok(format!(
                "{{\"final_corrected_name\": \"{}\", \"explanation\": \"no change needed\"}}",
                name
            ))
        } else {
            let description = request
                .user
                .lines()
                .find_map(|line| line.strip_prefix("Task: Standardize this item description: "))
                .unwrap_or("unknown");
            Ok(stub_standardize(description))
        }
    }
}

/// Records the document's running item count at every upsert, so tests can
/// assert what each batch's storage write observed.
struct RecordingStore {
    inner: MemoryStore,
    upsert_counts: Mutex<Vec<usize>>,
}

impl RecordingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            upsert_counts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn fetch_invoices(&self, user_id: &str) -> Result<Vec<Value>> {
        self.inner.fetch_invoices(user_id).await
    }

    async fn fetch_inventory(&self, user_id: &str) -> Result<Option<InventoryDocument>> {
        self.inner.fetch_inventory(user_id).await
    }

    async fn upsert_inventory(&self, document: &InventoryDocument) -> Result<()> {
        self.upsert_counts
            .lock()
            .unwrap()
            .push(document.item_count);
        self.inner.upsert_inventory(document).await
    }
}

fn coordinator<S: DocumentStore>(store: S, config: NormalizerConfig) -> BatchCoordinator<S> {
    let normalizer = NameNormalizer::new(
        Arc::new(DeterministicChat),
        Arc::new(TrainingCorpus::default()),
        config.clone(),
    );
    BatchCoordinator::new(store, normalizer, config)
}

fn complete_item(name: &str, number: &str) -> Value {
    json!({
        "Item Name": name,
        "Item Number": number,
        "Measured In": "lb",
        "Quantity In a Case": 6,
        "Measurement Of Each Item": 10,
        "Total Units Ordered": 60,
        "Case Price": 45.0,
        "Cost of a Unit": 0.75,
        "Product Category": "meat"
    })
}

#[tokio::test]
async fn test_partial_failure_on_missing_required_field() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut incomplete = complete_item("roma tomatoes 25lb case", "");
    incomplete
        .as_object_mut()
        .unwrap()
        .remove("Item Number");

    store
        .seed_invoices(
            "user-1",
            vec![json!({
                "id": "inv-1",
                "invoices": [{
                    "Supplier Name": "Sysco",
                    "Invoice Number": "A-100",
                    "List of Items": [
                        complete_item("chicken diced 10lb box", "C-77"),
                        incomplete
                    ]
                }]
            })],
        )
        .await;

    let coordinator = coordinator(store, NormalizerConfig::default());
    let summary = coordinator.run("user-1").await?;

    assert_eq!(summary.status, "completed");
    assert_eq!(summary.total_items, 2);
    assert_eq!(summary.batches.len(), 1);

    let batch = &summary.batches[0];
    assert_eq!(batch.status, BatchStatus::PartialFailure);
    assert_eq!(batch.stored_count, 1);
    assert_eq!(batch.total_items, 2);
    assert_eq!(batch.errors.len(), 1);
    assert!(batch.errors[0].contains("Item Number"));

    let doc = coordinator.store().inventory("user-1").await.unwrap();
    assert_eq!(doc.item_count, 1);
    assert_eq!(doc.items[0].inventory_item_name, "Chicken, diced");
    assert_eq!(doc.items[0].supplier_name, "Sysco");
    assert_eq!(doc.items[0].item_number, "C-77");
    Ok(())
}

#[tokio::test]
async fn test_non_numeric_case_price_is_rejected() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut bad_price = complete_item("heinz ketchup 6ct", "K-12");
    bad_price
        .as_object_mut()
        .unwrap()
        .insert("Case Price".to_string(), json!("market price"));

    store
        .seed_invoices(
            "user-1",
            vec![json!({
                "id": "inv-1",
                "Supplier Name": "Sysco",
                "Items": [bad_price]
            })],
        )
        .await;

    let coordinator = coordinator(store, NormalizerConfig::default());
    let summary = coordinator.run("user-1").await?;

    let batch = &summary.batches[0];
    assert_eq!(batch.status, BatchStatus::Failure);
    assert_eq!(batch.stored_count, 0);
    assert!(batch.errors[0].contains("Case Price"));
    Ok(())
}

#[tokio::test]
async fn test_batch_sequencing_for_25_items() -> anyhow::Result<()> {
    let store = RecordingStore::new();
    let items: Vec<Value> = (0..25)
        .map(|i| complete_item(&format!("chicken lot {}", i), &format!("N-{}", i)))
        .collect();
    store
        .inner
        .seed_invoices(
            "user-1",
            vec![json!({"id": "inv-1", "Supplier Name": "Sysco", "Items": items})],
        )
        .await;

    let coordinator = coordinator(store, NormalizerConfig::default());
    let summary = coordinator.run("user-1").await?;

    assert_eq!(summary.total_items, 25);
    assert_eq!(summary.processed_count, 25);
    assert_eq!(summary.batches.len(), 3);

    let totals: Vec<usize> = summary.batches.iter().map(|b| b.total_items).collect();
    assert_eq!(totals, vec![10, 10, 5]);
    let numbers: Vec<usize> = summary.batches.iter().map(|b| b.batch).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(summary
        .batches
        .iter()
        .all(|b| b.status == BatchStatus::Success));

    // Each batch's write sees every prior batch's items plus its own.
    let counts = coordinator.store().upsert_counts.lock().unwrap().clone();
    assert_eq!(counts, vec![10, 20, 25]);

    let doc = coordinator.store().inner.inventory("user-1").await.unwrap();
    assert_eq!(doc.item_count, 25);
    assert_eq!(doc.items[14].batch_number, 2);
    Ok(())
}

#[tokio::test]
async fn test_normalization_is_idempotent_with_deterministic_model() {
    let normalizer = NameNormalizer::new(
        Arc::new(DeterministicChat),
        Arc::new(TrainingCorpus::default()),
        NormalizerConfig::default(),
    );
    let work = WorkItem {
        raw: complete_item("chicken diced 10lb box", "C-77")
            .as_object()
            .unwrap()
            .clone(),
        user_id: "user-1".to_string(),
        invoice_id: "inv-1".to_string(),
    };

    let first = process_item(&normalizer, &work).await.unwrap();
    let second = process_item(&normalizer, &work).await.unwrap();
    assert_eq!(first.final_corrected_name, second.final_corrected_name);
    assert_eq!(first.final_corrected_name.as_deref(), Some("Chicken, diced"));
}

#[tokio::test]
async fn test_run_proceeds_without_training_corpus() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    store
        .seed_invoices(
            "user-1",
            vec![json!({
                "id": "inv-1",
                "Supplier Name": "Sysco",
                "Items": [complete_item("fresh basil bunch", "B-9")]
            })],
        )
        .await;

    let corpus = Arc::new(TrainingCorpus::load_jsonl("/nonexistent/training.jsonl"));
    assert!(corpus.is_empty());

    let config = NormalizerConfig::default();
    let normalizer = NameNormalizer::new(Arc::new(DeterministicChat), corpus, config.clone());
    let coordinator = BatchCoordinator::new(store, normalizer, config);

    let summary = coordinator.run("user-1").await?;
    assert_eq!(summary.batches[0].stored_count, 1);

    let doc = coordinator.store().inventory("user-1").await.unwrap();
    assert_eq!(doc.items[0].inventory_item_name, "Fresh, basil");
    assert_eq!(doc.items[0].brand, "Generic");
    Ok(())
}
