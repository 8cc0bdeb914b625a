use std::{path::PathBuf, time::Duration};

use bfg_fetcher::{
    api::{CatalogGraphQl, CatalogScrape, ChromeRenderer, HttpRenderer, DEFAULT_TIMEOUT_SECS},
    config::{FetcherConfig, DEFAULT_CONFIG_FILE},
    documents::{Language, Platform},
    library,
    traits::CatalogSource,
    Status, Tracing,
};
use clap::{Parser, ValueEnum};
use tracing::info;

/// Bigfish Games wrapID fetcher.
///
/// Collects the wrapIDs of the latest releases on Big Fish Games and writes
/// them as a plain list or as a script for the bfg-dl downloader.
#[derive(Parser)]
struct Opts {
    /// File with `platform`, `language`, `gen_script` and
    /// `latest_games_count` settings.
    #[clap(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Platform to fetch (win, mac). Overrides the config file.
    #[clap(short, long)]
    platform: Option<Platform>,

    /// Language to fetch (eng, ger, spa, fre, ita, jap, dut, swe, dan, por).
    /// Overrides the config file.
    #[clap(short, long)]
    language: Option<Language>,

    /// Number of latest releases to fetch. Overrides the config file.
    #[clap(long)]
    count: Option<usize>,

    /// Write wrapidlist.sh (true) or wrapidlist.txt (false). Overrides the
    /// config file.
    #[clap(long)]
    gen_script: Option<bool>,

    /// Where the catalog is read from.
    #[clap(long, value_enum, default_value = "chrome")]
    source: SourceKind,

    /// Seconds to wait for a listing page to become idle in the browser.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Directory that receives the output file.
    #[clap(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceKind {
    /// Listing pages rendered in headless Chromium.
    Chrome,
    /// Listing pages as served, without running scripts.
    Http,
    /// The storefront's GraphQL catalog API, no browser needed.
    Graphql,
}

#[tokio::main]
async fn main() -> Result<(), Status> {
    let opts: Opts = Opts::parse();

    let mut config = FetcherConfig::from_file(&opts.config)?;
    if let Some(platform) = opts.platform {
        config.platform = platform;
    }
    if let Some(language) = opts.language {
        config.language = language;
    }
    if let Some(count) = opts.count {
        if count == 0 {
            return Err(Status::invalid_argument("--count must be at least 1"));
        }
        config.latest_games_count = count;
    }
    if let Some(gen_script) = opts.gen_script {
        config.gen_script = gen_script;
    }

    Tracing::setup("wrapid_fetcher", config.enable_debug_logging)?;

    println!("Bigfish Games wrapID fetcher\n");
    println!("platform: {}", config.platform);
    println!("language: {}", config.language);
    println!("WrapIDs to fetch: {}\n", config.latest_games_count);

    let source: Box<dyn CatalogSource> = match opts.source {
        SourceKind::Chrome => Box::new(CatalogScrape::new(Box::new(ChromeRenderer::new(
            Duration::from_secs(opts.timeout_secs),
        )))),
        SourceKind::Http => Box::new(CatalogScrape::new(Box::new(HttpRenderer::new()?))),
        SourceKind::Graphql => Box::new(CatalogGraphQl::new()?),
    };

    println!("fetching games ...");
    let wrap_ids = library::fetch_latest(&config, source).await?;

    println!("Writing to file ...");
    let path = library::write_latest(&config, &wrap_ids, &opts.output_dir)?;
    info!("wrote {}", path.display());

    println!("Done!");
    Ok(())
}
