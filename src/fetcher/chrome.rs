//! Chrome-backed fetching over the devtools protocol via chromiumoxide.
//!
//! The browser is not launched here: we attach to an already-running
//! instance through its remote debugging endpoint, the same way you
//! would with `chrome --remote-debugging-port=9222`.

use async_trait::async_trait;
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

use crate::app::{DowserError, Result};
use crate::fetcher::{PageFetcher, SessionFactory};

/// Pulls the company website link off a loaded profile page.
const WEBSITE_LINK_JS: &str = "document.querySelector('.website-link__item')?.href";

/// Shared connection to a remote browser, handing out one page per worker.
pub struct ChromeSessions {
    browser: Mutex<Option<Browser>>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl ChromeSessions {
    /// Attach to a running browser via its remote debugging endpoint.
    ///
    /// Accepts either a `ws://` devtools URL directly or an
    /// `http://host:port` debugging address, resolving the latter
    /// through `/json/version`.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let ws_url = if endpoint.starts_with("ws") {
            endpoint.to_string()
        } else {
            resolve_ws_url(endpoint).await?
        };

        let (browser, mut handler) = Browser::connect(ws_url)
            .await
            .map_err(|e| DowserError::Browser(format!("Failed to connect to browser: {}", e)))?;

        // Drive the connection; chromiumoxide requires the handler stream
        // to be polled for the browser to make progress.
        let handle = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler: Mutex::new(Some(handle)),
        })
    }
}

#[async_trait]
impl SessionFactory for ChromeSessions {
    async fn open(&self) -> Result<Box<dyn PageFetcher>> {
        let guard = self.browser.lock().await;
        let browser = guard
            .as_ref()
            .ok_or_else(|| DowserError::Browser("Browser connection already closed".into()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DowserError::Browser(format!("Failed to create page: {}", e)))?;

        Ok(Box::new(ChromePage { page }))
    }

    async fn close(&self) {
        // Dropping the handle disconnects the devtools session; the
        // browser itself belongs to the user and stays up.
        drop(self.browser.lock().await.take());
        if let Some(handle) = self.handler.lock().await.take() {
            handle.abort();
        }
    }
}

/// One worker's private browsing session.
struct ChromePage {
    page: Page,
}

#[async_trait]
impl PageFetcher for ChromePage {
    async fn fetch(&mut self, url: &str) -> Result<Option<String>> {
        self.page
            .goto(url)
            .await
            .map_err(|e| DowserError::Browser(format!("Navigation failed: {}", e)))?;

        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| DowserError::Browser(format!("Page load failed: {}", e)))?;

        let result = self
            .page
            .evaluate(WEBSITE_LINK_JS)
            .await
            .map_err(|e| DowserError::Browser(format!("Script execution failed: {}", e)))?;

        // `undefined` (no matching element) comes back as an absent value.
        let href = result
            .value()
            .and_then(|v| v.as_str())
            .map(str::to_string);

        match href {
            Some(href) => Ok(Some(normalize_website(&href)?)),
            None => Ok(None),
        }
    }

    async fn close(&mut self) {
        let _ = self.page.clone().close().await;
    }
}

/// Resolve an `http://host:port` debugging address to its websocket URL.
async fn resolve_ws_url(endpoint: &str) -> Result<String> {
    let version_url = format!("{}/json/version", endpoint.trim_end_matches('/'));
    let body = reqwest::get(&version_url)
        .await?
        .error_for_status()?
        .text()
        .await?;

    let version: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| DowserError::Browser(format!("Invalid /json/version response: {}", e)))?;

    version["webSocketDebuggerUrl"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DowserError::Browser("Browser did not report a webSocketDebuggerUrl".into()))
}

/// Reduce a website link to its origin: scheme, host, port, and a bare
/// trailing slash. Profile pages link deep into company sites; the
/// harvest wants the site itself.
fn normalize_website(href: &str) -> Result<String> {
    let url = Url::parse(href)?;
    Ok(url.join("/")?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_website_strips_path_and_query() {
        let normalized = normalize_website("https://example.com/about?ref=directory").unwrap();
        assert_eq!(normalized, "https://example.com/");
    }

    #[test]
    fn test_normalize_website_keeps_scheme_host_and_port() {
        let normalized = normalize_website("http://example.com:8080/deep/page#frag").unwrap();
        assert_eq!(normalized, "http://example.com:8080/");
    }

    #[test]
    fn test_normalize_website_rejects_relative_links() {
        assert!(normalize_website("/contact").is_err());
    }
}
