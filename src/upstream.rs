pub mod catalog_repo;
pub use catalog_repo::{CatalogSource, UpstreamRepository};
