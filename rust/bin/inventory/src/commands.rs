//! Command handlers. Each one makes a single catalog call and renders what
//! the returned [`Refresh`] asks for.

use std::sync::Arc;

use anyhow::Context;
use catalog::{CatalogService, CatalogStore, Refresh};
use inventory_core::ServiceConfig;
use inventory_sql::{SQLStore, SqliteStore};
use tracing::info;

use crate::output::{self, Format};

/// Open the database named by the config and build the service on top of it.
/// Any failure here is fatal for the process.
pub fn open_service(config: &ServiceConfig) -> anyhow::Result<CatalogService> {
    let path = config.resolve_sqlite_path();
    info!("opening inventory at {}", path.display());

    let db: Arc<dyn SQLStore> = Arc::new(
        SqliteStore::open_with_timeout(&path, config.busy_timeout())
            .with_context(|| format!("failed to open inventory database {}", path.display()))?,
    );
    let store = CatalogStore::new(db).context("failed to initialize inventory schema")?;
    Ok(CatalogService::new(Arc::new(store)))
}

pub fn list_products(svc: &CatalogService, filter: &str, format: Format) -> anyhow::Result<()> {
    let products = svc.search_products(filter)?;
    println!("{}", output::products(format, &products)?);
    Ok(())
}

pub fn add_product(
    svc: &CatalogService,
    name: &str,
    product_type: &str,
    quantity: &str,
    barcode: &str,
    format: Format,
) -> anyhow::Result<()> {
    let refresh = svc.add_product_and_refresh(name, product_type, quantity, barcode)?;
    render(svc, refresh, format)
}

pub fn list_serials(svc: &CatalogService, product_id: i64, format: Format) -> anyhow::Result<()> {
    let serials = svc.list_serials(product_id)?;
    println!("{}", output::serials(format, &serials)?);
    Ok(())
}

pub fn add_serial(
    svc: &CatalogService,
    product_id: i64,
    serial: Option<&str>,
    note: Option<&str>,
    format: Format,
) -> anyhow::Result<()> {
    let refresh = svc.add_serial_and_refresh(product_id, serial, note)?;
    render(svc, refresh, format)
}

pub fn set_note(
    svc: &CatalogService,
    serial_id: i64,
    note: Option<&str>,
    format: Format,
) -> anyhow::Result<()> {
    let refresh = svc.rename_serial_note(serial_id, note)?;
    render(svc, refresh, format)
}

fn render(svc: &CatalogService, refresh: Refresh, format: Format) -> anyhow::Result<()> {
    match refresh {
        Refresh::Products => list_products(svc, "", format),
        Refresh::Serials(product_id) => list_serials(svc, product_id, format),
        Refresh::Nothing => {
            eprintln!("Nothing to do.");
            Ok(())
        }
    }
}
