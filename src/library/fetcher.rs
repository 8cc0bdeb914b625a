use tracing::{info, instrument};

use crate::{
    documents::{CatalogFilter, WrapId},
    logging::FetchCounters,
    traits::CatalogSource,
    Status,
};

/// Listing entries requested per catalog page.
pub const PAGE_SIZE: usize = 100;

/// Number of listing pages needed to cover `requested` releases.
pub fn pages_count(requested: usize) -> usize {
    requested.div_ceil(PAGE_SIZE)
}

/// Walks the catalog newest first and collects wrapIDs.
pub struct WrapIdFetcher {
    source: Box<dyn CatalogSource>,
    filter: CatalogFilter,
}

impl WrapIdFetcher {
    pub fn new(source: Box<dyn CatalogSource>, filter: CatalogFilter) -> Self {
        WrapIdFetcher { source, filter }
    }

    /// Fetches every page needed for `requested` ids, one after the other,
    /// and returns their wrapIDs concatenated in page order.
    ///
    /// All pages are fetched even if earlier pages already yielded enough
    /// ids. The result may be shorter or longer than `requested`.
    #[instrument(level = "trace", skip(self))]
    pub async fn fetch(&self, requested: usize) -> Result<Vec<WrapId>, Status> {
        let pages_count = pages_count(requested);
        info!("fetching {pages_count} catalog pages for {requested} wrapIDs");

        let mut wrap_ids = vec![];
        for page_nr in 1..=pages_count {
            FetchCounters::page_fetched(
                page_nr,
                pages_count,
                &self.source.describe(&self.filter, page_nr, PAGE_SIZE),
            );

            let page_ids = match self.source.wrap_ids(&self.filter, page_nr, PAGE_SIZE).await {
                Ok(page_ids) => page_ids,
                Err(status) => {
                    FetchCounters::page_fetch_fail(page_nr, &status);
                    return Err(status);
                }
            };

            let count = page_ids.len();
            wrap_ids.extend(page_ids);
            FetchCounters::wrap_ids_extracted(page_nr, count, wrap_ids.len());
        }

        Ok(wrap_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::CatalogScrape,
        documents::{Language, Platform},
        traits::PageRenderer,
    };
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[test]
    fn pages_count_is_ceiling_of_page_size() {
        assert_eq!(pages_count(0), 0);
        assert_eq!(pages_count(1), 1);
        assert_eq!(pages_count(3), 1);
        assert_eq!(pages_count(99), 1);
        assert_eq!(pages_count(100), 1);
        assert_eq!(pages_count(101), 2);
        assert_eq!(pages_count(250), 3);
        assert_eq!(pages_count(1000), 10);
    }

    /// Serves one listing page per page number and records requested URLs.
    struct FakeCatalog {
        pages: Vec<String>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        fn new(pages: Vec<Vec<&str>>) -> Self {
            FakeCatalog {
                pages: pages
                    .into_iter()
                    .map(|ids| {
                        ids.iter()
                            .map(|id| format!(r#"<a href="/us/en/games/{id}/">{id}</a>"#))
                            .collect::<Vec<_>>()
                            .join("\n")
                    })
                    .collect(),
                requests: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl PageRenderer for FakeCatalog {
        async fn render(&self, url: &str) -> Result<String, Status> {
            self.requests.lock().unwrap().push(url.to_owned());
            let page_nr = self.requests.lock().unwrap().len();
            match self.pages.get(page_nr - 1) {
                Some(page) => Ok(format!("<html><body>{page}</body></html>")),
                None => Err(Status::not_found(format!("no page for {url}"))),
            }
        }
    }

    struct SharedCatalog(Arc<FakeCatalog>);

    #[async_trait]
    impl PageRenderer for SharedCatalog {
        async fn render(&self, url: &str) -> Result<String, Status> {
            self.0.render(url).await
        }
    }

    fn scrape(renderer: impl PageRenderer + 'static) -> Box<dyn CatalogSource> {
        Box::new(CatalogScrape::new(Box::new(renderer)))
    }

    fn win_eng() -> CatalogFilter {
        CatalogFilter::new(Platform::Windows, Language::English)
    }

    fn ids(wrap_ids: &[WrapId]) -> Vec<&str> {
        wrap_ids.iter().map(WrapId::as_str).collect()
    }

    #[tokio::test]
    async fn fetch_concatenates_pages_in_order() {
        let catalog = Arc::new(FakeCatalog::new(vec![
            vec!["f3t1l1", "f2t1l1"],
            vec!["f1t1l1", "f9t2l1"],
            vec!["f3t1l1"],
        ]));
        let fetcher = WrapIdFetcher::new(scrape(SharedCatalog(catalog.clone())), win_eng());

        let wrap_ids = fetcher.fetch(250).await.unwrap();
        assert_eq!(ids(&wrap_ids), vec!["F3T1L1", "F2T1L1", "F1T1L1", "F3T1L1"]);

        let requests = catalog.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        for (i, url) in requests.iter().enumerate() {
            assert!(url.contains(&format!("page={}&page_size=100", i + 1)), "{url}");
            assert!(url.contains("platform[filter]=Windows%2C150"), "{url}");
            assert!(url.contains("language[filter]=English%2C114"), "{url}");
        }
    }

    #[tokio::test]
    async fn fetch_does_not_stop_early() {
        let first_page: Vec<String> = (1..=150).map(|i| format!("f{i}t1l1")).collect();
        let catalog = Arc::new(FakeCatalog::new(vec![
            first_page.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["f500t1l1"],
        ]));
        let fetcher = WrapIdFetcher::new(scrape(SharedCatalog(catalog.clone())), win_eng());

        let wrap_ids = fetcher.fetch(101).await.unwrap();
        assert_eq!(wrap_ids.len(), 151);
        assert_eq!(catalog.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn fetch_propagates_page_failure() {
        let fetcher = WrapIdFetcher::new(scrape(FakeCatalog::new(vec![vec!["f1t1l1"]])), win_eng());
        assert!(matches!(
            fetcher.fetch(150).await,
            Err(Status::NotFound(_))
        ));
    }

    /// Catalog that hands out fixed ids per page without any markup.
    struct PagedIds(Vec<Vec<&'static str>>);

    #[async_trait]
    impl CatalogSource for PagedIds {
        fn describe(&self, _filter: &CatalogFilter, page_nr: usize, _page_size: usize) -> String {
            format!("fixture page {page_nr}")
        }

        async fn wrap_ids(
            &self,
            _filter: &CatalogFilter,
            page_nr: usize,
            _page_size: usize,
        ) -> Result<Vec<WrapId>, Status> {
            Ok(self.0[page_nr - 1]
                .iter()
                .filter_map(|id| WrapId::parse(id))
                .collect())
        }
    }

    #[tokio::test]
    async fn fetch_from_any_catalog_source() {
        let fetcher = WrapIdFetcher::new(
            Box::new(PagedIds(vec![vec!["F2T1L1", "F1T1L1"], vec!["F9T1L1"]])),
            win_eng(),
        );
        let wrap_ids = fetcher.fetch(101).await.unwrap();
        assert_eq!(ids(&wrap_ids), vec!["F2T1L1", "F1T1L1", "F9T1L1"]);
    }
}
