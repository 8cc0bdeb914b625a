mod export;
mod fetcher;

pub use export::{write_wrap_ids, OutputFormat};
pub use fetcher::{pages_count, WrapIdFetcher, PAGE_SIZE};

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{config::FetcherConfig, documents::WrapId, traits::CatalogSource, Status};

/// Fetches the wrapIDs of the latest releases selected by `config`.
pub async fn fetch_latest(
    config: &FetcherConfig,
    source: Box<dyn CatalogSource>,
) -> Result<Vec<WrapId>, Status> {
    let fetcher = WrapIdFetcher::new(source, config.catalog_filter());
    fetcher.fetch(config.latest_games_count).await
}

/// Writes the downloader input file for `config` into `out_dir`.
pub fn write_latest(
    config: &FetcherConfig,
    wrap_ids: &[WrapId],
    out_dir: &Path,
) -> Result<PathBuf, Status> {
    info!("writing {} of {} wrapIDs", config.latest_games_count, wrap_ids.len());
    write_wrap_ids(
        out_dir,
        wrap_ids,
        config.latest_games_count,
        OutputFormat::from_gen_script(config.gen_script),
    )
}
