use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use crate::{
    documents::{CatalogFilter, WrapId},
    traits::CatalogSource,
    Status,
};

/// Reads the catalog through the storefront's GraphQL API, the same
/// `GetCategories` query the listing page runs in the browser.
pub struct CatalogGraphQl {
    client: Client,
}

impl CatalogGraphQl {
    pub fn new() -> Result<Self, Status> {
        let mut request_headers = header::HeaderMap::new();
        request_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = ClientBuilder::new()
            .default_headers(request_headers)
            .build()?;

        Ok(CatalogGraphQl { client })
    }

    /// Query variables for one page of the games category, newest first.
    pub fn variables(filter: &CatalogFilter, page_nr: usize, page_size: usize) -> serde_json::Value {
        json!({
            "currentPage": page_nr,
            "id": GAMES_CATEGORY_UID,
            "filters": {
                "platform": { "eq": filter.platform.codes().id },
                "language": { "eq": filter.language.codes().id },
                "category_uid": { "eq": GAMES_CATEGORY_UID },
            },
            "pageSize": page_size,
            "sort": { "product_list_date": "DESC" },
        })
    }

    /// Collects the wrapIDs of the products in a `GetCategories` response
    /// that contain `tag`.
    ///
    /// A product's id is taken from its `sku`, falling back to `url_key` and
    /// then `uid`. A response without products yields no ids.
    pub fn extract_wrap_ids(body: &str, tag: &str) -> Result<Vec<WrapId>, Status> {
        let resp = serde_json::from_str::<GraphQlResponse>(body)
            .map_err(|e| Status::new("failed to parse catalog response", e))?;

        let products = match resp.data.and_then(|data| data.products) {
            Some(products) => products,
            None if !resp.errors.is_empty() => {
                let messages: Vec<_> = resp.errors.into_iter().map(|e| e.message).collect();
                return Err(Status::internal(format!(
                    "catalog query failed: {}",
                    messages.join("; ")
                )));
            }
            None => return Ok(vec![]),
        };

        if let Some(page_info) = &products.page_info {
            debug!(
                "catalog holds {} products on {} pages",
                products.total_count.unwrap_or_default(),
                page_info.total_pages.unwrap_or_default()
            );
        }

        let wrap_ids: Vec<WrapId> = products
            .items
            .iter()
            .flatten()
            .filter_map(Product::wrap_id)
            .filter(|wrap_id| wrap_id.matches_filter(tag))
            .collect();

        debug!("{} wrapIDs matching '{tag}' in catalog response", wrap_ids.len());
        Ok(wrap_ids)
    }
}

#[async_trait]
impl CatalogSource for CatalogGraphQl {
    fn describe(&self, filter: &CatalogFilter, page_nr: usize, page_size: usize) -> String {
        format!(
            "{GRAPHQL_URL} {OPERATION_NAME} {}",
            Self::variables(filter, page_nr, page_size)
        )
    }

    #[instrument(level = "trace", skip(self))]
    async fn wrap_ids(
        &self,
        filter: &CatalogFilter,
        page_nr: usize,
        page_size: usize,
    ) -> Result<Vec<WrapId>, Status> {
        let variables = Self::variables(filter, page_nr, page_size).to_string();
        let resp = self
            .client
            .get(GRAPHQL_URL)
            .query(&[
                ("query", QUERY),
                ("operationName", OPERATION_NAME),
                ("variables", variables.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let text = resp.text().await?;
        Self::extract_wrap_ids(&text, &filter.tag())
    }
}

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct GraphQlResponse {
    data: Option<CatalogData>,
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize, Debug)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct CatalogData {
    products: Option<Products>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct Products {
    items: Option<Vec<Product>>,
    total_count: Option<u64>,
    page_info: Option<PageInfo>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct PageInfo {
    total_pages: Option<u64>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct Product {
    uid: Option<String>,
    sku: Option<String>,
    url_key: Option<String>,
}

impl Product {
    fn wrap_id(&self) -> Option<WrapId> {
        [&self.sku, &self.url_key, &self.uid]
            .into_iter()
            .flatten()
            .find_map(|field| WrapId::parse(field))
    }
}

const GRAPHQL_URL: &str = "https://www.bigfishgames.com/graphql";
const OPERATION_NAME: &str = "GetCategories";
const GAMES_CATEGORY_UID: &str = "MTg=";
const QUERY: &str = "query GetCategories($id:String!$pageSize:Int!$currentPage:Int!$filters:ProductAttributeFilterInput!$sort:ProductAttributeSortInput){categories(filters:{category_uid:{in:[$id]}}){items{uid ...CategoryFragmentExtended __typename}__typename}products(pageSize:$pageSize currentPage:$currentPage filter:$filters sort:$sort){...ProductsFragmentExtended __typename}}fragment CategoryFragmentExtended on CategoryTree{...CategoryFragment url_key __typename}fragment CategoryFragment on CategoryTree{uid meta_title meta_keywords meta_description __typename}fragment ProductsFragmentExtended on Products{items{id uid name product_list_date sku platform language url_key __typename}page_info{total_pages __typename}total_count __typename}";
