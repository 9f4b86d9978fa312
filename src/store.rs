//! The document-database boundary.
//!
//! The real source/destination containers live behind [`DocumentStore`];
//! [`MemoryStore`] backs tests and demos.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::schema::InventoryDocument;

/// Read/write access to the invoice source and inventory destination
/// documents for one deployment.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All invoice documents belonging to a user.
    async fn fetch_invoices(&self, user_id: &str) -> Result<Vec<Value>>;

    /// The user's consolidated inventory document, if one exists.
    async fn fetch_inventory(&self, user_id: &str) -> Result<Option<InventoryDocument>>;

    /// Idempotent create-or-replace of the inventory document.
    async fn upsert_inventory(&self, document: &InventoryDocument) -> Result<()>;
}

/// In-memory store keyed by user id.
#[derive(Default)]
pub struct MemoryStore {
    invoices: Mutex<HashMap<String, Vec<Value>>>,
    inventories: Mutex<HashMap<String, InventoryDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_invoices(&self, user_id: impl Into<String>, documents: Vec<Value>) {
        self.invoices.lock().await.insert(user_id.into(), documents);
    }

    pub async fn inventory(&self, user_id: &str) -> Option<InventoryDocument> {
        self.inventories.lock().await.get(user_id).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_invoices(&self, user_id: &str) -> Result<Vec<Value>> {
        Ok(self
            .invoices
            .lock()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_inventory(&self, user_id: &str) -> Result<Option<InventoryDocument>> {
        Ok(self.inventories.lock().await.get(user_id).cloned())
    }

    async fn upsert_inventory(&self, document: &InventoryDocument) -> Result<()> {
        self.inventories
            .lock()
            .await
            .insert(document.user_id.clone(), document.clone());
        Ok(())
    }
}
