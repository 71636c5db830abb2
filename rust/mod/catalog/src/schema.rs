use inventory_core::ServiceError;
use inventory_sql::SQLStore;

/// DDL for the catalog tables. Every statement is idempotent.
///
/// The foreign key is declared only. `SqliteStore` opens every connection
/// with `PRAGMA foreign_keys = OFF`, so a serial may name a missing product.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY,
        name TEXT,
        type TEXT,
        quantity INTEGER,
        barcode TEXT UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS serial_numbers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id INTEGER,
        serial_number TEXT,
        note TEXT,
        FOREIGN KEY (product_id) REFERENCES products (id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_serial_product ON serial_numbers(product_id)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for stmt in SCHEMA {
        sql.exec(stmt, &[])
            .map_err(|e| ServiceError::Storage(format!("schema init failed: {}", e)))?;
    }
    Ok(())
}
