//! Document shapes shared across the pipeline and the destination store.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One invoice line after numeric coercion and name normalization.
///
/// Numeric fields are `None` when the source value was present but not
/// numeric; absent source values default to `Some(0.0)`. The item is never
/// persisted in this form: it is either promoted to a [`StorageRecord`] or
/// dropped with a rejection reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedItem {
    pub user_id: String,
    pub supplier: String,
    pub invoice_id: String,
    pub invoice_number: String,
    pub item_name: String,
    pub item_number: String,
    pub quantity_in_case: Option<f64>,
    pub measurement_of_each_item: Option<f64>,
    pub measured_in: String,
    pub total_units_ordered: Option<f64>,
    pub case_price: Option<f64>,
    pub catch_weight: String,
    pub priced_by: String,
    pub splitable: String,
    pub split_price: String,
    pub cost_of_unit: Option<f64>,
    pub product_category: String,
    /// First-pass rewrite of the raw item name.
    pub standardized_name: Option<String>,
    /// Accepted name from the final correction round, when extraction
    /// succeeded.
    pub final_corrected_name: Option<String>,
}

/// The validated record written to the destination document, keyed by the
/// canonical storage field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageRecord {
    #[serde(rename = "Supplier Name")]
    pub supplier_name: String,
    #[serde(rename = "Inventory Item Name")]
    pub inventory_item_name: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Inventory Unit of Measure")]
    pub inventory_unit_of_measure: String,
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Item Number")]
    pub item_number: String,
    #[serde(rename = "Quantity In a Case")]
    pub quantity_in_case: f64,
    #[serde(rename = "Measurement Of Each Item")]
    pub measurement_of_each_item: f64,
    #[serde(rename = "Measured In")]
    pub measured_in: String,
    #[serde(rename = "Total Units")]
    pub total_units: f64,
    #[serde(rename = "Case Price")]
    pub case_price: f64,
    #[serde(rename = "Catch Weight")]
    pub catch_weight: String,
    #[serde(rename = "Priced By")]
    pub priced_by: String,
    #[serde(rename = "Splitable")]
    pub splitable: String,
    #[serde(rename = "Split Price")]
    pub split_price: String,
    #[serde(rename = "Cost of a Unit")]
    pub cost_of_unit: f64,
    #[serde(rename = "Category")]
    pub category: String,
    pub timestamp: String,
    #[serde(rename = "batchNumber")]
    pub batch_number: usize,
}

/// The consolidated per-user inventory document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryDocument {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub supplier_name: String,
    pub items: Vec<StorageRecord>,
    #[serde(rename = "itemCount", default)]
    pub item_count: usize,
    pub timestamp: String,
}

impl InventoryDocument {
    pub fn new(user_id: impl Into<String>, supplier_name: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            id: user_id.clone(),
            user_id,
            supplier_name: supplier_name.into(),
            items: Vec::new(),
            item_count: 0,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Refreshes the running count and last-write timestamp before an
    /// upsert.
    pub fn touch(&mut self) {
        self.item_count = self.items.len();
        self.timestamp = Utc::now().to_rfc3339();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Success,
    PartialFailure,
    Failure,
}

/// Outcome of one batch's normalization plus storage write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub status: BatchStatus,
    pub batch: usize,
    pub stored_count: usize,
    pub total_items: usize,
    pub errors: Vec<String>,
    pub user_id: String,
}

impl BatchResult {
    /// Derives the batch status from stored vs. attempted counts.
    pub fn status_for(stored_count: usize, total_items: usize) -> BatchStatus {
        if stored_count == total_items {
            BatchStatus::Success
        } else if stored_count > 0 {
            BatchStatus::PartialFailure
        } else {
            BatchStatus::Failure
        }
    }
}

/// Overall outcome of a per-user run. Structural conditions (no invoices,
/// no items) complete the run early with a descriptive message rather than
/// an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub status: String,
    pub message: Option<String>,
    pub processed_count: usize,
    pub total_items: usize,
    pub batches: Vec<BatchResult>,
    pub user_id: String,
}

impl RunSummary {
    pub fn completed_early(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "completed".to_string(),
            message: Some(message.into()),
            processed_count: 0,
            total_items: 0,
            batches: Vec::new(),
            user_id: user_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_record_uses_canonical_keys() {
        let record = StorageRecord {
            supplier_name: "Sysco".to_string(),
            inventory_item_name: "Chicken, Diced".to_string(),
            brand: "Generic".to_string(),
            inventory_unit_of_measure: "lb".to_string(),
            item_name: "chicken diced 10lb".to_string(),
            item_number: "123".to_string(),
            quantity_in_case: 6.0,
            measurement_of_each_item: 10.0,
            measured_in: "lb".to_string(),
            total_units: 60.0,
            case_price: 45.0,
            catch_weight: "N/A".to_string(),
            priced_by: "case".to_string(),
            splitable: "NO".to_string(),
            split_price: "N/A".to_string(),
            cost_of_unit: 0.75,
            category: "meat".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            batch_number: 1,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Inventory Item Name"], "Chicken, Diced");
        assert_eq!(json["Quantity In a Case"], 6.0);
        assert_eq!(json["batchNumber"], 1);
    }

    #[test]
    fn test_batch_status_derivation() {
        assert_eq!(BatchResult::status_for(3, 3), BatchStatus::Success);
        assert_eq!(BatchResult::status_for(1, 2), BatchStatus::PartialFailure);
        assert_eq!(BatchResult::status_for(0, 2), BatchStatus::Failure);
    }

    #[test]
    fn test_batch_status_serializes_snake_case() {
        let status = serde_json::to_value(BatchStatus::PartialFailure).unwrap();
        assert_eq!(status, "partial_failure");
    }

    #[test]
    fn test_document_touch_refreshes_count() {
        let mut doc = InventoryDocument::new("user-1", "Sysco");
        assert_eq!(doc.item_count, 0);
        doc.items.push(serde_json::from_value(serde_json::json!({
            "Supplier Name": "Sysco",
            "Inventory Item Name": "Basil, Fresh",
            "Brand": "Generic",
            "Inventory Unit of Measure": "bunch",
            "Item Name": "fresh basil",
            "Item Number": "9",
            "Quantity In a Case": 1.0,
            "Measurement Of Each Item": 1.0,
            "Measured In": "bunch",
            "Total Units": 1.0,
            "Case Price": 2.0,
            "Catch Weight": "N/A",
            "Priced By": "each",
            "Splitable": "NO",
            "Split Price": "N/A",
            "Cost of a Unit": 2.0,
            "Category": "produce",
            "timestamp": "2024-01-01T00:00:00Z",
            "batchNumber": 1
        })).unwrap());
        doc.touch();
        assert_eq!(doc.item_count, 1);
    }
}
