use async_trait::async_trait;
use itertools::Itertools;
use reqwest::Url;
use soup::prelude::*;
use tracing::{debug, instrument};

use crate::{
    documents::{CatalogFilter, WrapId},
    traits::{CatalogSource, PageRenderer},
    Status,
};

/// Reads the catalog from the rendered listing pages of the storefront.
pub struct CatalogScrape {
    renderer: Box<dyn PageRenderer>,
}

impl CatalogScrape {
    pub fn new(renderer: Box<dyn PageRenderer>) -> Self {
        CatalogScrape { renderer }
    }

    /// Listing page of the catalog, newest releases first.
    pub fn listing_url(filter: &CatalogFilter, page_nr: usize, page_size: usize) -> String {
        format!(
            "{LISTING_URL}?page={page_nr}&page_size={page_size}{}",
            filter.query()
        )
    }

    /// Collects wrapIDs from the anchors of `html` that contain `tag`.
    ///
    /// Hrefs are resolved against `page_url` and deduplicated as URLs in
    /// document order. The returned ids may repeat when different URLs point
    /// at the same game.
    pub fn extract_wrap_ids(html: &str, page_url: &str, tag: &str) -> Vec<WrapId> {
        let base = Url::parse(page_url).ok();
        let soup = Soup::new(html);

        let wrap_ids: Vec<WrapId> = soup
            .tag("a")
            .find_all()
            .filter_map(|anchor| anchor.get("href"))
            .filter_map(|href| resolve(base.as_ref(), &href))
            .unique()
            .filter_map(|url| WrapId::parse(&url))
            .filter(|wrap_id| wrap_id.matches_filter(tag))
            .collect();

        debug!("{} wrapIDs matching '{tag}' on {page_url}", wrap_ids.len());
        wrap_ids
    }
}

#[async_trait]
impl CatalogSource for CatalogScrape {
    fn describe(&self, filter: &CatalogFilter, page_nr: usize, page_size: usize) -> String {
        Self::listing_url(filter, page_nr, page_size)
    }

    /// Renders one listing page and returns the wrapIDs linked from it.
    #[instrument(level = "trace", skip(self))]
    async fn wrap_ids(
        &self,
        filter: &CatalogFilter,
        page_nr: usize,
        page_size: usize,
    ) -> Result<Vec<WrapId>, Status> {
        let url = Self::listing_url(filter, page_nr, page_size);
        let html = self.renderer.render(&url).await?;
        Ok(Self::extract_wrap_ids(&html, &url, &filter.tag()))
    }
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    let url = match base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };
    url.ok().map(String::from)
}

const LISTING_URL: &str = "https://www.bigfishgames.com/games.html";
