mod catalog_filter;
mod wrap_id;

pub use catalog_filter::{CatalogCodes, CatalogFilter, Language, Platform};
pub use wrap_id::WrapId;
