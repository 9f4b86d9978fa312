//! Invoice document handling.
//!
//! Invoice documents arrive from the source container in two shapes: a root
//! document holding a nested `invoices` list (each sub-invoice with its own
//! item list), or a flat document with a direct item list. Item field names
//! are free text ("Item Name", "Quantity In a Case") with inconsistent
//! presence, so every accessor tolerates absence.

use log::{info, warn};
use serde_json::{Map, Value};

/// One raw invoice line: an unstructured field-name to value mapping.
pub type RawItem = Map<String, Value>;

const ITEM_LIST_KEYS: &[&str] = &["List of Items", "Items"];

/// Extracts all items from an invoice document, stamping `Supplier Name`
/// and `Invoice Number` from the enclosing (sub-)invoice onto each item.
///
/// Returns `None` for a document that is not a JSON object, and an empty
/// list for a valid invoice that simply carries no items.
pub fn extract_items(invoice: &Value) -> Option<Vec<RawItem>> {
    let Some(doc) = invoice.as_object() else {
        warn!("Invalid invoice format: expected an object");
        return None;
    };

    if let Some(sub_invoices) = doc.get("invoices").and_then(|v| v.as_array()) {
        let mut all_items = Vec::new();
        for sub_invoice in sub_invoices {
            if let Some(sub) = sub_invoice.as_object() {
                all_items.extend(items_of(sub));
            }
        }
        info!("Extracted {} items from nested invoices", all_items.len());
        return Some(all_items);
    }

    let items = items_of(doc);
    if items.is_empty() {
        warn!("No items found in invoice");
    } else {
        info!("Extracted {} items from direct invoice", items.len());
    }
    Some(items)
}

fn items_of(invoice: &Map<String, Value>) -> Vec<RawItem> {
    let supplier = invoice
        .get("Supplier Name")
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()));
    let invoice_number = invoice
        .get("Invoice Number")
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()));

    let Some(items) = ITEM_LIST_KEYS
        .iter()
        .find_map(|key| invoice.get(*key).and_then(|v| v.as_array()))
    else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| item.as_object())
        .map(|item| {
            let mut item = item.clone();
            item.insert("Supplier Name".to_string(), supplier.clone());
            item.insert("Invoice Number".to_string(), invoice_number.clone());
            item
        })
        .collect()
}

/// String field accessor: absent or non-string values default to `""`.
pub fn get_string(item: &RawItem, key: &str) -> String {
    get_string_or(item, key, "")
}

/// String field accessor with an explicit default for absent values.
pub fn get_string_or(item: &RawItem, key: &str, default: &str) -> String {
    match item.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Numeric field accessor. Absent fields default to `Some(0.0)`, numbers
/// and numeric strings are coerced, and any other present value yields
/// `None` so the storage validator can reject it.
pub fn get_number(item: &RawItem, key: &str) -> Option<f64> {
    match item.get(key) {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    }
}
