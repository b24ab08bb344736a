//! Page fetching behind traits so the pipeline can run against fakes.

pub mod chrome;

pub use chrome::ChromeSessions;

use async_trait::async_trait;

use crate::app::Result;

/// Loads a profile page and extracts the company website link.
///
/// Each worker owns its fetcher exclusively, so implementations are free
/// to keep per-session state (a browser page, cookies) without locking.
#[async_trait]
pub trait PageFetcher: Send {
    /// Navigate to `url` and pull the website link out of the loaded page.
    ///
    /// `Ok(None)` means the page has no website link; that is not an
    /// error and produces no output.
    async fn fetch(&mut self, url: &str) -> Result<Option<String>>;

    /// Release any session resources held by this fetcher.
    async fn close(&mut self) {}
}

/// Opens one private fetching session per worker.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PageFetcher>>;

    /// Release the shared connection behind the sessions.
    async fn close(&self) {}
}
