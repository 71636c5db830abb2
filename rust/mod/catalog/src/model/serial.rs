use serde::{Deserialize, Serialize};

/// SerialRecord — one tracked unit of a product.
///
/// Only `note` changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SerialRecord {
    pub id: i64,

    /// Owning product (Product.id). Not checked on insert.
    pub product_id: i64,

    /// Not unique, even within one product.
    pub serial_number: String,

    #[serde(default)]
    pub note: Option<String>,
}
