use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{
    browser::{Browser, BrowserConfig},
    cdp::browser_protocol::page::{
        EventLifecycleEvent, NavigateParams, SetLifecycleEventsEnabledParams,
    },
};
use futures::StreamExt;
use reqwest::{header, Client, ClientBuilder};
use tracing::{debug, instrument, warn};

use crate::{traits::PageRenderer, Status};

/// Renders pages in a headless Chromium, one browser process per page.
///
/// The listing is assembled client side, so the markup is only read after
/// the page reports `networkIdle`.
pub struct ChromeRenderer {
    timeout: Duration,
}

impl ChromeRenderer {
    pub fn new(timeout: Duration) -> Self {
        ChromeRenderer { timeout }
    }

    async fn load(&self, browser: &Browser, url: &str) -> Result<String, Status> {
        let page = browser.new_page("about:blank").await?;
        page.execute(SetLifecycleEventsEnabledParams::new(true)).await?;
        let mut lifecycle = page.event_listener::<EventLifecycleEvent>().await?;

        let navigation = page.execute(NavigateParams::new(url)).await?.result;
        if let Some(error) = &navigation.error_text {
            return Err(Status::internal(format!("failed to open {url}: {error}")));
        }

        // Only events of this navigation count, not leftovers of about:blank.
        let network_idle = async {
            while let Some(event) = lifecycle.next().await {
                debug!("lifecycle event '{}'", event.name);
                let same_document = match &navigation.loader_id {
                    Some(loader_id) => *loader_id == event.loader_id,
                    None => true,
                };
                if same_document && event.name == NETWORK_IDLE {
                    return true;
                }
            }
            false
        };
        match tokio::time::timeout(self.timeout, network_idle).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(Status::internal(format!(
                    "browser stopped before {url} became idle"
                )))
            }
            Err(_) => {
                return Err(Status::internal(format!(
                    "timed out after {}s waiting for {url}",
                    self.timeout.as_secs()
                )))
            }
        }

        Ok(page.content().await?)
    }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    #[instrument(level = "trace", skip(self))]
    async fn render(&self, url: &str) -> Result<String, Status> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(|e| Status::internal(format!("invalid browser config: {e}")))?;
        let (mut browser, mut handler) = Browser::launch(config).await?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("browser handler: {e}");
                }
            }
        });

        let html = self.load(&browser, url).await;

        shut_down(&mut browser).await?;
        if let Err(e) = handler.await {
            warn!("browser handler task failed: {e}");
        }

        html
    }
}

/// The parts of a launched browser needed to get rid of it again.
#[async_trait]
trait BrowserProcess: Send {
    async fn close(&mut self) -> Result<(), Status>;
    async fn kill(&mut self) -> Result<(), Status>;
    async fn wait(&mut self) -> Result<(), Status>;
}

#[async_trait]
impl BrowserProcess for Browser {
    async fn close(&mut self) -> Result<(), Status> {
        Browser::close(self).await?;
        Ok(())
    }

    async fn kill(&mut self) -> Result<(), Status> {
        match Browser::kill(self).await {
            Some(Err(e)) => Err(Status::new("failed to kill browser", e)),
            _ => Ok(()),
        }
    }

    async fn wait(&mut self) -> Result<(), Status> {
        Browser::wait(self).await?;
        Ok(())
    }
}

/// Closes the browser and waits for its process to exit. A browser that
/// does not take the close command is killed first.
async fn shut_down(browser: &mut impl BrowserProcess) -> Result<(), Status> {
    if let Err(e) = browser.close().await {
        warn!("failed to close browser, killing it: {e}");
        browser.kill().await?;
    }
    browser.wait().await
}

/// Fetches the raw server response without running any scripts.
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new() -> Result<Self, Status> {
        let mut request_headers = header::HeaderMap::new();
        request_headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_static("en-US;en"),
        );

        let client = ClientBuilder::new()
            .default_headers(request_headers)
            .cookie_store(true)
            .build()?;

        Ok(HttpRenderer { client })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    #[instrument(level = "trace", skip(self))]
    async fn render(&self, url: &str) -> Result<String, Status> {
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp.text().await?)
    }
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const NETWORK_IDLE: &str = "networkIdle";
