//! Catalog — products, their serial records, and the service the front end calls.

pub mod model;
pub mod schema;
pub mod service;
pub mod store;

pub use model::{NewProduct, Product, SerialRecord};
pub use service::{CatalogService, Refresh, UserError};
pub use store::CatalogStore;
