pub mod card;
pub mod store;

pub use card::{Card, Tag};
pub use store::{Catalog, CatalogError};
