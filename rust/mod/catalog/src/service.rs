use std::sync::Arc;

use inventory_core::{error_code, ServiceError};
use thiserror::Error;
use tracing::debug;

use crate::model::{NewProduct, Product, SerialRecord};
use crate::store::CatalogStore;

/// What the view should reload after a successful call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Reload the product list with no filter.
    Products,
    /// Reload the serial list of this product.
    Serials(i64),
    /// Nothing was written; the view stays as it is.
    Nothing,
}

/// Failure reported back to the operator. `Display` is the message to show.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("quantity must be a whole number, got \"{0}\"")]
    Format(String),

    #[error("a product with barcode \"{barcode}\" already exists")]
    DuplicateBarcode { barcode: String },

    #[error("inventory store error: {0}")]
    Store(#[from] ServiceError),
}

impl UserError {
    pub fn error_code(&self) -> &'static str {
        match self {
            UserError::Format(_) => error_code::VALIDATION_FAILED,
            UserError::DuplicateBarcode { .. } => error_code::ALREADY_EXISTS,
            UserError::Store(e) => e.error_code(),
        }
    }
}

/// Catalog service — what the front end calls.
///
/// Turns operator input into store calls, store failures into [`UserError`]s,
/// and successes into a [`Refresh`] telling the view what to redraw.
pub struct CatalogService {
    store: Arc<CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    // ── Products ──

    pub fn add_product_and_refresh(
        &self,
        name: &str,
        product_type: &str,
        quantity_text: &str,
        barcode: &str,
    ) -> Result<Refresh, UserError> {
        let quantity = parse_quantity(quantity_text)?;
        let product = NewProduct::new(name, product_type, quantity, barcode);

        self.store.add_product(&product).map_err(|e| match e {
            ServiceError::Conflict(_) => UserError::DuplicateBarcode {
                barcode: barcode.to_string(),
            },
            other => UserError::Store(other),
        })?;

        Ok(Refresh::Products)
    }

    pub fn search_products(&self, filter: &str) -> Result<Vec<Product>, UserError> {
        Ok(self.store.list_products(filter)?)
    }

    // ── Serial records ──

    pub fn list_serials(&self, product_id: i64) -> Result<Vec<SerialRecord>, UserError> {
        Ok(self.store.list_serials(product_id)?)
    }

    /// Add a serial record. A missing or empty serial number skips the call.
    pub fn add_serial_and_refresh(
        &self,
        product_id: i64,
        serial_number: Option<&str>,
        note: Option<&str>,
    ) -> Result<Refresh, UserError> {
        let Some(serial_number) = serial_number.filter(|s| !s.is_empty()) else {
            debug!(product_id, "no serial number given, nothing to add");
            return Ok(Refresh::Nothing);
        };

        self.store.add_serial(product_id, serial_number, note)?;
        Ok(Refresh::Serials(product_id))
    }

    /// Replace a serial's note. `None` means the edit was cancelled;
    /// `Some("")` clears the note. An unknown serial id writes nothing and
    /// yields `Refresh::Nothing`.
    pub fn rename_serial_note(
        &self,
        serial_id: i64,
        new_note: Option<&str>,
    ) -> Result<Refresh, UserError> {
        let Some(note) = new_note else {
            debug!(serial_id, "note edit cancelled");
            return Ok(Refresh::Nothing);
        };

        Ok(match self.store.update_serial_note(serial_id, note)? {
            Some(product_id) => Refresh::Serials(product_id),
            None => Refresh::Nothing,
        })
    }
}

/// Coerce operator input to an integer count. Surrounding whitespace is
/// ignored; a sign is allowed and negative values are accepted.
pub fn parse_quantity(text: &str) -> Result<i64, UserError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| UserError::Format(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_sql::{SQLStore, SqliteStore};

    fn test_service() -> CatalogService {
        test_service_with_db().0
    }

    fn test_service_with_db() -> (CatalogService, Arc<SqliteStore>) {
        let db = Arc::new(SqliteStore::open_in_memory().unwrap());
        let store = CatalogStore::new(db.clone()).unwrap();
        (CatalogService::new(Arc::new(store)), db)
    }

    #[test]
    fn parse_quantity_accepts_signed_integers() {
        assert_eq!(parse_quantity("10").unwrap(), 10);
        assert_eq!(parse_quantity(" 7 \n").unwrap(), 7);
        assert_eq!(parse_quantity("-4").unwrap(), -4);
        assert_eq!(parse_quantity("+2").unwrap(), 2);
    }

    #[test]
    fn parse_quantity_rejects_non_numeric() {
        for bad in ["", "ten", "1.5", "3 units"] {
            let err = parse_quantity(bad).unwrap_err();
            assert!(matches!(err, UserError::Format(_)), "{bad:?} gave {err:?}");
            assert_eq!(err.error_code(), "VALIDATION_FAILED");
        }
    }

    #[test]
    fn add_product_signals_product_refresh() {
        let svc = test_service();
        let refresh = svc
            .add_product_and_refresh("Widget", "Hardware", "10", "BC-1")
            .unwrap();
        assert_eq!(refresh, Refresh::Products);

        let products = svc.search_products("").unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, 10);
    }

    #[test]
    fn bad_quantity_never_reaches_store() {
        let svc = test_service();
        let err = svc
            .add_product_and_refresh("Widget", "Hardware", "lots", "BC-1")
            .unwrap_err();
        assert_eq!(err.to_string(), "quantity must be a whole number, got \"lots\"");
        assert!(svc.search_products("").unwrap().is_empty());
    }

    #[test]
    fn duplicate_barcode_is_user_error() {
        let svc = test_service();
        svc.add_product_and_refresh("Widget", "Hardware", "1", "BC-1")
            .unwrap();

        let err = svc
            .add_product_and_refresh("Gadget", "Toys", "2", "BC-1")
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateBarcode { .. }));
        assert_eq!(err.error_code(), "ALREADY_EXISTS");
        assert!(err.to_string().contains("BC-1"));
        assert_eq!(svc.search_products("").unwrap().len(), 1);
    }

    #[test]
    fn add_serial_skips_absent_or_empty_number() {
        let svc = test_service();
        assert_eq!(
            svc.add_serial_and_refresh(1, None, Some("note")).unwrap(),
            Refresh::Nothing
        );
        assert_eq!(
            svc.add_serial_and_refresh(1, Some(""), None).unwrap(),
            Refresh::Nothing
        );
        assert!(svc.list_serials(1).unwrap().is_empty());
    }

    #[test]
    fn add_serial_allows_missing_note() {
        let svc = test_service();
        svc.add_product_and_refresh("Widget", "Hardware", "1", "BC-1")
            .unwrap();

        let refresh = svc.add_serial_and_refresh(1, Some("SN-1"), None).unwrap();
        assert_eq!(refresh, Refresh::Serials(1));

        let serials = svc.list_serials(1).unwrap();
        assert_eq!(serials.len(), 1);
        assert_eq!(serials[0].note, None);
    }

    #[test]
    fn rename_note_cancel_and_clear() {
        let svc = test_service();
        svc.add_serial_and_refresh(1, Some("SN-1"), Some("keep"))
            .unwrap();

        assert_eq!(svc.rename_serial_note(1, None).unwrap(), Refresh::Nothing);
        assert_eq!(
            svc.list_serials(1).unwrap()[0].note.as_deref(),
            Some("keep")
        );

        assert_eq!(
            svc.rename_serial_note(1, Some("")).unwrap(),
            Refresh::Serials(1)
        );
        assert_eq!(svc.list_serials(1).unwrap()[0].note.as_deref(), Some(""));
    }

    #[test]
    fn rename_note_refreshes_owning_product() {
        let svc = test_service();
        svc.add_serial_and_refresh(3, Some("SN-A"), None).unwrap();
        svc.add_serial_and_refresh(8, Some("SN-B"), None).unwrap();

        assert_eq!(
            svc.rename_serial_note(2, Some("moved")).unwrap(),
            Refresh::Serials(8)
        );
        assert_eq!(svc.list_serials(8).unwrap()[0].note.as_deref(), Some("moved"));
        assert_eq!(svc.list_serials(3).unwrap()[0].note, None);
    }

    #[test]
    fn rename_note_on_missing_serial_is_silent() {
        let svc = test_service();
        assert_eq!(
            svc.rename_serial_note(77, Some("x")).unwrap(),
            Refresh::Nothing
        );
        assert!(svc.list_serials(1).unwrap().is_empty());
    }

    #[test]
    fn store_failure_surfaces_as_store_error() {
        let (svc, db) = test_service_with_db();
        db.exec("DROP TABLE products", &[]).unwrap();

        let err = svc
            .add_product_and_refresh("Widget", "Hardware", "1", "BC-1")
            .unwrap_err();
        assert!(
            matches!(err, UserError::Store(ServiceError::Storage(_))),
            "got {err:?}"
        );
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.to_string().contains("no such table"), "got {err}");

        let err = svc.search_products("").unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn store_error_code_follows_service_error() {
        let err: UserError = ServiceError::Storage("disk I/O error".into()).into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert_eq!(err.to_string(), "inventory store error: disk I/O error");

        let err: UserError = ServiceError::Internal("missing id column".into()).into();
        assert_eq!(err.error_code(), "INTERNAL");
    }
}
