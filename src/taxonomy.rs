//! The fixed category taxonomy.

/// Every category the classifier can assign, in canonical order.
pub const TAXONOMY: [&str; 8] = [
    "Company Reputation",
    "Courier Behavior",
    "Customer Service",
    "Delay",
    "Operation",
    "Payment",
    "Positive Feedback",
    "Shipment Condition",
];

/// Categories that are upsampled during curation when under-represented.
pub const MINORITY_CATEGORIES: [&str; 2] = ["Delay", "Positive Feedback"];

/// Returns true if `category` belongs to the taxonomy.
pub fn is_valid_category(category: &str) -> bool {
    TAXONOMY.contains(&category)
}
