//! Per-item processing: numeric coercion plus name refinement.

use log::{info, warn};

use crate::invoice::{get_number, get_string, get_string_or, RawItem};
use crate::llm::NameNormalizer;
use crate::schema::ProcessedItem;

/// One unit of work: a raw invoice line plus its provenance.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub raw: RawItem,
    pub user_id: String,
    pub invoice_id: String,
}

/// Runs one item through coercion and the name refinement pipeline.
///
/// This is the item boundary: structural problems yield `None` and are
/// logged, never propagated into the enclosing batch.
pub async fn process_item(normalizer: &NameNormalizer, work: &WorkItem) -> Option<ProcessedItem> {
    let item = &work.raw;
    let item_name = get_string(item, "Item Name");
    if item_name.trim().is_empty() {
        warn!("Skipping item with empty name in invoice {}", work.invoice_id);
        return None;
    }

    let category = get_string(item, "Product Category");
    info!("Processing '{}' in category '{}'", item_name, category);

    let mut processed = ProcessedItem {
        user_id: work.user_id.clone(),
        supplier: get_string(item, "Supplier Name"),
        invoice_id: work.invoice_id.clone(),
        invoice_number: get_string(item, "Invoice Number"),
        item_name: item_name.clone(),
        item_number: get_string(item, "Item Number"),
        quantity_in_case: get_number(item, "Quantity In a Case"),
        measurement_of_each_item: get_number(item, "Measurement Of Each Item"),
        measured_in: get_string(item, "Measured In"),
        total_units_ordered: get_number(item, "Total Units Ordered"),
        case_price: get_number(item, "Case Price"),
        catch_weight: get_string_or(item, "Catch Weight", "N/A"),
        priced_by: get_string(item, "Priced By"),
        splitable: get_string_or(item, "Splitable", "NO"),
        split_price: get_string_or(item, "Split Price", "N/A"),
        cost_of_unit: get_number(item, "Cost of a Unit"),
        product_category: category.clone(),
        standardized_name: None,
        final_corrected_name: None,
    };

    let refinement = normalizer.refine(&item_name, &category).await;
    processed.standardized_name = Some(refinement.standardized_name);
    processed.final_corrected_name = refinement.final_corrected_name;

    Some(processed)
}
