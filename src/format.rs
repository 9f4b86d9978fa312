//! Storage formatting and validation.
//!
//! Maps a [`ProcessedItem`] into the canonical destination record shape and
//! enforces the destination invariant: four required text fields non-empty,
//! five numeric fields present and non-negative. A violation yields a
//! rejection reason string; the item is dropped but the batch continues.

use chrono::Utc;
use log::warn;

use crate::schema::{ProcessedItem, StorageRecord};

/// Heuristically derives a brand from an item name.
///
/// Order of precedence: the substring before the first `/`, the substring
/// before a possessive apostrophe, the first word when capitalized, then
/// the literal `"Generic"`.
pub fn extract_brand(item_name: &str) -> String {
    if let Some((brand, _)) = item_name.split_once('/') {
        let brand = brand.trim();
        if !brand.is_empty() {
            return brand.to_string();
        }
    }

    if let Some(idx) = item_name.find(['\'', '\u{2019}']) {
        let brand = item_name[..idx].trim();
        if !brand.is_empty() {
            return brand.to_string();
        }
    }

    if let Some(first_word) = item_name.split_whitespace().next() {
        if first_word.chars().next().is_some_and(|c| c.is_uppercase()) {
            return first_word.to_string();
        }
    }

    "Generic".to_string()
}

/// Formats a processed item for storage, rejecting it with a reason when
/// the destination invariant does not hold.
pub fn format_for_storage(
    item: &ProcessedItem,
    batch_number: usize,
) -> std::result::Result<StorageRecord, String> {
    let inventory_item_name = item
        .final_corrected_name
        .clone()
        .unwrap_or_else(|| item.item_name.clone());

    let required = [
        ("Inventory Item Name", inventory_item_name.as_str()),
        ("Item Number", item.item_number.as_str()),
        ("Category", item.product_category.as_str()),
        ("Measured In", item.measured_in.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            let reason = format!("missing required field: {}", field);
            warn!("Rejecting item '{}': {}", item.item_name, reason);
            return Err(reason);
        }
    }

    let numeric = [
        ("Quantity In a Case", item.quantity_in_case),
        ("Measurement Of Each Item", item.measurement_of_each_item),
        ("Total Units", item.total_units_ordered),
        ("Case Price", item.case_price),
        ("Cost of a Unit", item.cost_of_unit),
    ];
    let mut values = [0.0f64; 5];
    for (slot, (field, value)) in values.iter_mut().zip(numeric) {
        match value {
            Some(v) if v.is_finite() && v >= 0.0 => *slot = v,
            Some(v) => {
                let reason = format!("invalid numeric value for {}: {}", field, v);
                warn!("Rejecting item '{}': {}", item.item_name, reason);
                return Err(reason);
            }
            None => {
                let reason = format!("invalid numeric value for {}: not a number", field);
                warn!("Rejecting item '{}': {}", item.item_name, reason);
                return Err(reason);
            }
        }
    }
    let [quantity_in_case, measurement_of_each_item, total_units, case_price, cost_of_unit] =
        values;

    Ok(StorageRecord {
        supplier_name: item.supplier.clone(),
        inventory_item_name,
        brand: extract_brand(&item.item_name),
        inventory_unit_of_measure: item.measured_in.clone(),
        item_name: item.item_name.clone(),
        item_number: item.item_number.clone(),
        quantity_in_case,
        measurement_of_each_item,
        measured_in: item.measured_in.clone(),
        total_units,
        case_price,
        catch_weight: item.catch_weight.clone(),
        priced_by: item.priced_by.clone(),
        splitable: item.splitable.clone(),
        split_price: item.split_price.clone(),
        cost_of_unit,
        category: item.product_category.clone(),
        timestamp: Utc::now().to_rfc3339(),
        batch_number,
    })
}
