//! Static normalization guidance injected into the rewriting prompts.
//!
//! The removal-term list and category directives are fixed at compile time.
//! They are not derived from data; categories are stored with their original
//! casing but looked up case-insensitively.

/// Packaging, brand, and location terms that must be stripped from
/// standardized item names.
pub const REMOVAL_TERMS: &[&str] = &[
    "plastic",
    "plst",
    "refrigerator",
    "tff",
    "shelf-stable",
    "cnt",
    "box",
    "bx",
    "bag",
    "bg",
    "case",
    "cs",
    "each",
    "ea",
    "bags",
    "1 piece",
    "homemade",
    "shelf",
    "count",
    "vacuum",
    "refrigerated",
    "premium",
    "packet",
    "pack",
    "pkg",
    "container",
    "bottle",
    "jar",
    "tin",
    "tub",
    "tube",
    "can",
    "pouch",
    "single",
    "dozen",
    "pair",
    "bulk",
    "multiple",
    "variety pack",
    "frozen",
    "chilled",
    "dry",
    "wet",
    "cured",
    "smoked",
    "dried",
    "standard",
    "natural",
    "organic",
    "artisan",
    "gourmet",
    "choice",
    "select",
    "grade A",
    "top quality",
    "chopped",
    "crushed",
    "diced",
    "minced",
    "ready to eat",
    "local",
];

const CATEGORY_RULES: &[(&str, &[&str])] = &[
    (
        "paper goods and Disposables",
        &[
            "Include size and material",
            "Remove brand names unless essential",
        ],
    ),
    (
        "BAKERY",
        &[
            "Specify bread type first",
            "Include shape and size if relevant",
        ],
    ),
    (
        "produce",
        &[
            "Include 'Fresh' for non-processed items",
            "Specify variety and form",
        ],
    ),
    (
        "meat",
        &[
            "Include cut and preparation method",
            "Specify key characteristics",
        ],
    ),
    (
        "seafood",
        &[
            "Include type and preparation method",
            "Specify fresh or frozen if relevant",
        ],
    ),
    (
        "dairy",
        &["Specify product type first", "Include key descriptors"],
    ),
    (
        "Dry Grocery",
        &["Specify item type first", "Include key characteristics"],
    ),
    (
        "beverages",
        &[
            "Specify type of beverage first",
            "Include key descriptors like brand name",
        ],
    ),
];

/// Returns the normalization directives for a category, or an empty slice
/// when the category is unknown. Lookup ignores ASCII case.
pub fn rules_for(category: &str) -> &'static [&'static str] {
    CATEGORY_RULES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(category))
        .map(|(_, rules)| *rules)
        .unwrap_or(&[])
}

/// Comma-joined removal terms, as rendered into prompts.
pub fn removal_terms_joined() -> String {
    REMOVAL_TERMS.join(", ")
}
