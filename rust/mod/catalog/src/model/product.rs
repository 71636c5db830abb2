use serde::{Deserialize, Serialize};

/// Product — a trackable inventory item. PK = id, barcode is unique.
///
/// Products are never edited or deleted once added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned by the store on insert.
    pub id: i64,

    pub name: String,

    /// Free-form category label.
    #[serde(rename = "type")]
    pub product_type: String,

    /// Units on hand. Negative counts are stored as given.
    pub quantity: i64,

    pub barcode: String,
}

/// Fields supplied when registering a product; the id comes back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub product_type: String,
    pub quantity: i64,
    pub barcode: String,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        product_type: impl Into<String>,
        quantity: i64,
        barcode: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            product_type: product_type.into(),
            quantity,
            barcode: barcode.into(),
        }
    }
}
