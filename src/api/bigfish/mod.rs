mod catalog_graphql;
mod catalog_scrape;
mod renderer;

pub use catalog_graphql::CatalogGraphQl;
pub use catalog_scrape::CatalogScrape;
pub use renderer::{ChromeRenderer, HttpRenderer, DEFAULT_TIMEOUT_SECS};
