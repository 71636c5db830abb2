use std::sync::Arc;

use catalog::{CatalogService, CatalogStore, NewProduct, Refresh, UserError};
use inventory_sql::{SQLStore, SqliteStore};

fn open_service(path: &std::path::Path) -> CatalogService {
    let db: Arc<dyn SQLStore> = Arc::new(SqliteStore::open(path).unwrap());
    CatalogService::new(Arc::new(CatalogStore::new(db).unwrap()))
}

#[test]
fn widget_scenario_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let svc = open_service(&dir.path().join("inventory.db"));

    let id = svc
        .store()
        .add_product(&NewProduct::new("Widget", "Hardware", 10, "BC-1"))
        .unwrap();
    assert_eq!(id, 1);

    let serial_id = svc
        .store()
        .add_serial(1, "SN-001", Some("first batch"))
        .unwrap();
    assert_eq!(serial_id, 1);

    let found = svc.search_products("Widget").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Widget");
    assert_eq!(found[0].barcode, "BC-1");

    let serials = svc.list_serials(1).unwrap();
    assert_eq!(serials.len(), 1);
    assert_eq!(serials[0].serial_number, "SN-001");
    assert_eq!(serials[0].note.as_deref(), Some("first batch"));

    assert_eq!(
        svc.rename_serial_note(1, Some("second batch")).unwrap(),
        Refresh::Serials(1)
    );
    let serials = svc.list_serials(1).unwrap();
    assert_eq!(serials[0].note.as_deref(), Some("second batch"));
}

#[test]
fn front_end_flow_through_service() {
    let dir = tempfile::tempdir().unwrap();
    let svc = open_service(&dir.path().join("inventory.db"));

    // Startup renders the full list.
    assert!(svc.search_products("").unwrap().is_empty());

    assert_eq!(
        svc.add_product_and_refresh("Widget", "Hardware", "10", "BC-1")
            .unwrap(),
        Refresh::Products
    );
    assert_eq!(
        svc.add_product_and_refresh("Cable", "Electrical", "-2", "BC-2")
            .unwrap(),
        Refresh::Products
    );

    let err = svc
        .add_product_and_refresh("Copy", "Hardware", "1", "BC-2")
        .unwrap_err();
    assert!(matches!(err, UserError::DuplicateBarcode { .. }));

    let err = svc
        .add_product_and_refresh("Bad", "Hardware", "1x", "BC-3")
        .unwrap_err();
    assert!(matches!(err, UserError::Format(_)));

    let all = svc.search_products("").unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].quantity, -2);

    assert_eq!(
        svc.add_serial_and_refresh(all[0].id, Some("SN-1"), Some(""))
            .unwrap(),
        Refresh::Serials(all[0].id)
    );
    assert!(svc.list_serials(all[1].id).unwrap().is_empty());
}

#[test]
fn reopening_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("inventory.db");

    {
        let svc = open_service(&path);
        svc.add_product_and_refresh("Widget", "Hardware", "10", "BC-1")
            .unwrap();
        svc.add_serial_and_refresh(1, Some("SN-001"), None).unwrap();
    }
    assert!(path.exists());

    let svc = open_service(&path);
    svc.store().initialize().unwrap();

    let products = svc.search_products("").unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].barcode, "BC-1");
    assert_eq!(svc.list_serials(1).unwrap().len(), 1);

    // Ids keep counting from where the first session stopped.
    svc.add_serial_and_refresh(1, Some("SN-002"), None).unwrap();
    assert_eq!(svc.list_serials(1).unwrap()[1].id, 2);
}

#[test]
fn serial_for_missing_product_is_stored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.db");

    {
        let svc = open_service(&path);
        assert!(svc.search_products("").unwrap().is_empty());
        assert_eq!(
            svc.add_serial_and_refresh(42, Some("SN-ORPHAN"), Some("no product"))
                .unwrap(),
            Refresh::Serials(42)
        );
        assert_eq!(
            svc.rename_serial_note(1, Some("still none")).unwrap(),
            Refresh::Serials(42)
        );
    }

    let svc = open_service(&path);
    let serials = svc.list_serials(42).unwrap();
    assert_eq!(serials.len(), 1);
    assert_eq!(serials[0].serial_number, "SN-ORPHAN");
    assert_eq!(serials[0].note.as_deref(), Some("still none"));
}
