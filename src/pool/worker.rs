use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::Result;
use crate::fetcher::PageFetcher;
use crate::limiter::RateLimiter;
use crate::queue::{Job, WorkQueue};
use crate::sink::SharedSink;

/// One member of the pool.
///
/// Pulls profile links off the shared queue until a stop job arrives,
/// throttling every page load through the shared rate limiter. The
/// fetcher is this worker's private browsing session.
pub struct Worker {
    id: usize,
    queue: Arc<WorkQueue>,
    limiter: Arc<RateLimiter>,
    sink: SharedSink,
    fetcher: Box<dyn PageFetcher>,
}

impl Worker {
    pub fn new(
        id: usize,
        queue: Arc<WorkQueue>,
        limiter: Arc<RateLimiter>,
        sink: SharedSink,
        fetcher: Box<dyn PageFetcher>,
    ) -> Self {
        Self {
            id,
            queue,
            limiter,
            sink,
            fetcher,
        }
    }

    /// Run until a stop job arrives.
    ///
    /// Per-link failures are logged and swallowed; they never take the
    /// worker down. Every `Visit` job gets exactly one `task_done`,
    /// along every path, or the dispatcher's drain wait would hang.
    pub async fn run(mut self) {
        loop {
            let link = match self.queue.get().await {
                Job::Visit(link) => link,
                Job::Stop => break,
            };

            if let Err(e) = self.visit(&link).await {
                warn!(worker = self.id, link = %link, error = %e, "failed to process profile");
            }
            self.queue.task_done();
            debug!(worker = self.id, pending = self.queue.pending(), "queue size");
        }

        self.fetcher.close().await;
        debug!(worker = self.id, "worker stopped");
    }

    async fn visit(&mut self, link: &str) -> Result<()> {
        self.limiter.acquire().await;
        debug!(worker = self.id, link = %link, "start loading");

        match self.fetcher.fetch(link).await? {
            Some(website) => {
                info!(worker = self.id, website = %website, "found website");
                self.sink
                    .lock()
                    .expect("sink mutex poisoned")
                    .write_line(&website)?;
            }
            None => {
                debug!(worker = self.id, link = %link, "no website link on page");
            }
        }
        Ok(())
    }
}
