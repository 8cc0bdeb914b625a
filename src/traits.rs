use async_trait::async_trait;

use crate::{
    documents::{CatalogFilter, WrapId},
    Status,
};

/// Turns a URL into the markup a visitor would see once the page settled.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<String, Status>;
}

/// A paged view of the catalog, newest releases first.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Where page `page_nr` is read from, for logs.
    fn describe(&self, filter: &CatalogFilter, page_nr: usize, page_size: usize) -> String;

    /// wrapIDs of page `page_nr` that belong to `filter`, in catalog order.
    async fn wrap_ids(
        &self,
        filter: &CatalogFilter,
        page_nr: usize,
        page_size: usize,
    ) -> Result<Vec<WrapId>, Status>;
}
