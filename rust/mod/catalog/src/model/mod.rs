mod product;
mod serial;

pub use product::{NewProduct, Product};
pub use serial::SerialRecord;
