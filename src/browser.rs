//! Browser-rendered half of the page acquirer.
//!
//! One vendor (Rivals) only materializes its ranking rows after client-side
//! rendering, and lazily loads more of them as the viewport scrolls. Targets
//! in `RenderMode::BrowserRendered` are loaded in a throwaway headless
//! Chromium session, scrolled until the row list fills in (or stops growing),
//! and captured as serialized HTML. Sessions are never pooled; each call
//! launches and fully releases its own.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;

/// Tuning for the incremental scroll loop.
#[derive(Debug, Clone)]
pub struct ScrollSettings {
    /// Pause between scroll ticks.
    pub interval: Duration,
    /// Viewport advance per tick, in pixels.
    pub step_px: u32,
    /// Stop as soon as this many rows are present.
    pub target_rows: usize,
    /// Stop after this many consecutive ticks at the bottom of a page that
    /// is no longer growing. Bounds total wait to at most
    /// `max_stalled_attempts * interval` once scrolling has caught up.
    pub max_stalled_attempts: u32,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            step_px: 100,
            target_rows: 250,
            max_stalled_attempts: 20,
        }
    }
}

/// The narrow capability the scroll loop needs from a rendered page. Keeping
/// it this small means no arbitrary logic crosses the remote execution
/// boundary, and the loop itself is testable without a browser.
#[async_trait]
pub trait ScrollSurface {
    /// Scroll the viewport down by `px` pixels.
    async fn scroll_by(&self, px: u32) -> Result<()>;
    /// Current total scrollable height of the document.
    async fn scroll_height(&self) -> Result<f64>;
    /// Number of elements currently matching `selector`.
    async fn row_count(&self, selector: &str) -> Result<usize>;
}

/// Scroll a lazily-loading page until `row_selector` matches at least
/// `target_rows` elements, or the page stops yielding new content.
///
/// A stall attempt is counted only once the cumulative scrolled distance has
/// caught up to the document's current scrollable height; the counter resets
/// whenever the height grows past the scrolled distance again. Exhaustion is
/// not an error: the row count reached so far is returned either way.
pub async fn scroll_until_loaded<S: ScrollSurface + ?Sized>(
    surface: &S,
    row_selector: &str,
    settings: &ScrollSettings,
) -> Result<usize> {
    let mut scrolled: f64 = 0.0;
    let mut stalled: u32 = 0;

    loop {
        let rows = surface.row_count(row_selector).await?;
        if rows >= settings.target_rows {
            log::debug!("Scroll target reached: {} rows", rows);
            return Ok(rows);
        }

        let height = surface.scroll_height().await?;
        if scrolled >= height {
            stalled += 1;
            if stalled >= settings.max_stalled_attempts {
                log::info!(
                    "Page stopped loading at {} rows (wanted {})",
                    rows,
                    settings.target_rows
                );
                return Ok(rows);
            }
        } else {
            stalled = 0;
        }

        surface.scroll_by(settings.step_px).await?;
        scrolled += f64::from(settings.step_px);

        tokio::time::sleep(settings.interval).await;
    }
}

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const SELECTOR_TIMEOUT: Duration = Duration::from_secs(10);

/// A single-use headless Chromium session.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
}

impl BrowserSession {
    /// Launch a headless Chromium instance with a fresh blank page.
    pub async fn launch() -> Result<Self> {
        let chrome_path = find_chromium().context("Chromium not found on this system")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("failed to launch Chromium")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Navigate to `url` and wait for the load to settle.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        tokio::time::timeout(NAVIGATION_TIMEOUT, self.page.goto(url))
            .await
            .map_err(|_| anyhow::anyhow!("navigation timed out: {url}"))?
            .with_context(|| format!("navigation failed: {url}"))?;

        let _ = self.page.wait_for_navigation().await;
        Ok(())
    }

    /// Wait for `selector` to appear. Hydration can lag the load event; a
    /// missing selector is logged, not fatal, so an empty capture still
    /// flows through extraction.
    pub async fn wait_for_selector(&self, selector: &str) {
        match tokio::time::timeout(SELECTOR_TIMEOUT, self.page.find_element(selector)).await {
            Ok(Ok(_)) => log::debug!("Selector present: {}", selector),
            Ok(Err(e)) => log::warn!("Selector {} not found: {}", selector, e),
            Err(_) => log::warn!("Timed out waiting for selector {}", selector),
        }
    }

    /// Serialized HTML of the rendered document.
    pub async fn html(&self) -> Result<String> {
        let result = self
            .page
            .evaluate("document.documentElement.outerHTML")
            .await
            .context("failed to read rendered HTML")?;

        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert HTML result: {e:?}"))
    }

    /// Close the page and the browser process.
    pub async fn close(mut self) -> Result<()> {
        let _ = self.page.close().await;
        self.browser.close().await.context("failed to close browser")?;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}

#[async_trait]
impl ScrollSurface for BrowserSession {
    async fn scroll_by(&self, px: u32) -> Result<()> {
        self.page
            .evaluate(format!("window.scrollBy(0, {px})"))
            .await
            .context("scroll failed")?;
        Ok(())
    }

    async fn scroll_height(&self) -> Result<f64> {
        let result = self
            .page
            .evaluate("document.body.scrollHeight")
            .await
            .context("failed to read scroll height")?;

        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert scroll height: {e:?}"))
    }

    async fn row_count(&self, selector: &str) -> Result<usize> {
        // serde_json quoting keeps the selector a plain string literal on
        // the remote side.
        let script = format!(
            "document.querySelectorAll({}).length",
            serde_json::to_string(selector)?
        );

        let result = self
            .page
            .evaluate(script)
            .await
            .context("failed to count rows")?;

        result
            .into_value()
            .map_err(|e| anyhow::anyhow!("failed to convert row count: {e:?}"))
    }
}

/// Acquire a browser-rendered target: navigate, scroll until `row_selector`
/// stops yielding rows (or hits the target), capture the document. The
/// session is always released, whether or not the capture succeeded.
pub async fn fetch_rendered(
    url: &str,
    row_selector: &str,
    settings: &ScrollSettings,
) -> Result<String> {
    let session = BrowserSession::launch().await?;

    let result = async {
        session.navigate(url).await?;
        session.wait_for_selector(row_selector).await;
        let rows = scroll_until_loaded(&session, row_selector, settings).await?;
        log::info!("Captured rendered page with {} rows: {}", rows, url);
        session.html().await
    }
    .await;

    if let Err(e) = session.close().await {
        log::warn!("Failed to close browser session: {}", e);
    }

    result
}
