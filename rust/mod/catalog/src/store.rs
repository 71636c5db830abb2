use std::sync::Arc;

use inventory_core::ServiceError;
use inventory_sql::{Row, SQLError, SQLStore, Value};
use tracing::{debug, info, warn};

use crate::model::{NewProduct, Product, SerialRecord};
use crate::schema;

/// Persistent storage for products and serial records, backed by SQLStore (SQLite).
///
/// Every call commits before it returns.
pub struct CatalogStore {
    db: Arc<dyn SQLStore>,
}

impl CatalogStore {
    /// Create a CatalogStore over an opened database and initialise the schema.
    pub fn new(db: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        let store = Self { db };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure both tables exist. Safe to call any number of times; existing rows are kept.
    pub fn initialize(&self) -> Result<(), ServiceError> {
        schema::init_schema(self.db.as_ref())
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    /// Products whose name, type or barcode contains `filter`.
    ///
    /// Matching uses SQLite `LIKE`, so it ignores ASCII case. An empty filter
    /// returns every product. Results are in id (insertion) order.
    pub fn list_products(&self, filter: &str) -> Result<Vec<Product>, ServiceError> {
        debug!(filter, "list products");

        let rows = if filter.is_empty() {
            self.db.query(
                "SELECT id, name, type, quantity, barcode FROM products ORDER BY id",
                &[],
            )
        } else {
            self.db.query(
                "SELECT id, name, type, quantity, barcode FROM products \
                 WHERE name LIKE ?1 ESCAPE '\\' \
                    OR type LIKE ?1 ESCAPE '\\' \
                    OR barcode LIKE ?1 ESCAPE '\\' \
                 ORDER BY id",
                &[Value::Text(like_pattern(filter))],
            )
        }
        .map_err(storage_error)?;

        rows.iter().map(row_to_product).collect()
    }

    /// Insert a product and return its new id.
    ///
    /// A barcode that is already taken yields `ServiceError::Conflict` and
    /// writes nothing.
    pub fn add_product(&self, product: &NewProduct) -> Result<i64, ServiceError> {
        let id = self
            .db
            .insert(
                "INSERT INTO products (name, type, quantity, barcode) VALUES (?1, ?2, ?3, ?4)",
                &[
                    Value::from(product.name.as_str()),
                    Value::from(product.product_type.as_str()),
                    Value::Integer(product.quantity),
                    Value::from(product.barcode.as_str()),
                ],
            )
            .map_err(|e| {
                if e.is_unique_violation() {
                    warn!(barcode = %product.barcode, "duplicate barcode rejected");
                    ServiceError::Conflict(e.to_string())
                } else {
                    storage_error(e)
                }
            })?;

        info!(id, barcode = %product.barcode, "product added");
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Serial records
    // -----------------------------------------------------------------------

    /// Serial records of one product, oldest first.
    pub fn list_serials(&self, product_id: i64) -> Result<Vec<SerialRecord>, ServiceError> {
        debug!(product_id, "list serials");
        let rows = self
            .db
            .query(
                "SELECT id, product_id, serial_number, note FROM serial_numbers \
                 WHERE product_id = ?1 ORDER BY id",
                &[Value::Integer(product_id)],
            )
            .map_err(storage_error)?;

        rows.iter().map(row_to_serial).collect()
    }

    /// Insert a serial record for `product_id` and return its new id.
    ///
    /// The product is not looked up first.
    pub fn add_serial(
        &self,
        product_id: i64,
        serial_number: &str,
        note: Option<&str>,
    ) -> Result<i64, ServiceError> {
        let id = self
            .db
            .insert(
                "INSERT INTO serial_numbers (product_id, serial_number, note) VALUES (?1, ?2, ?3)",
                &[
                    Value::Integer(product_id),
                    Value::from(serial_number),
                    Value::from(note),
                ],
            )
            .map_err(storage_error)?;

        info!(id, product_id, serial_number, "serial added");
        Ok(id)
    }

    /// Overwrite the note of one serial record and return the id of the
    /// product it belongs to.
    ///
    /// An unknown `serial_id` changes nothing and returns `None`; it is not an error.
    pub fn update_serial_note(
        &self,
        serial_id: i64,
        note: &str,
    ) -> Result<Option<i64>, ServiceError> {
        let rows = self
            .db
            .query(
                "UPDATE serial_numbers SET note = ?1 WHERE id = ?2 RETURNING product_id",
                &[Value::from(note), Value::Integer(serial_id)],
            )
            .map_err(storage_error)?;

        let Some(row) = rows.first() else {
            debug!(serial_id, "note update matched no serial");
            return Ok(None);
        };
        let product_id = required_i64(row, "product_id")?;
        info!(serial_id, product_id, "serial note updated");
        Ok(Some(product_id))
    }
}

fn storage_error(e: SQLError) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

/// `%filter%` with LIKE metacharacters escaped, so the filter matches literally.
fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Integer column that must hold a value. NULL or non-integer data is reported,
/// never read back as 0.
fn required_i64(row: &Row, column: &str) -> Result<i64, ServiceError> {
    if row.is_null(column) {
        return Err(ServiceError::Internal(format!("{column} is NULL")));
    }
    row.get_i64(column)
        .ok_or_else(|| ServiceError::Internal(format!("missing or non-integer {column} column")))
}

/// Text columns carry no NOT NULL constraint; a NULL reads back as "".
fn text(row: &Row, column: &str) -> String {
    row.get_str(column).unwrap_or_default().to_string()
}

fn row_to_product(row: &Row) -> Result<Product, ServiceError> {
    Ok(Product {
        id: required_i64(row, "id")?,
        name: text(row, "name"),
        product_type: text(row, "type"),
        quantity: required_i64(row, "quantity")?,
        barcode: text(row, "barcode"),
    })
}

fn row_to_serial(row: &Row) -> Result<SerialRecord, ServiceError> {
    Ok(SerialRecord {
        id: required_i64(row, "id")?,
        product_id: required_i64(row, "product_id")?,
        serial_number: text(row, "serial_number"),
        note: row.get_str("note").map(str::to_string),
    })
}
