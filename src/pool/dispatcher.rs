use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::thread_rng;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::app::Result;
use crate::config::Config;
use crate::fetcher::SessionFactory;
use crate::limiter::RateLimiter;
use crate::pool::Worker;
use crate::queue::WorkQueue;
use crate::seeder::Seeder;
use crate::sink::SharedSink;

/// Owns a harvest run end to end.
///
/// Seeds the queue, launches the pool, waits for the drain, then walks
/// every worker through an orderly stop. A fired cancel handle replaces
/// the drain wait with a cooperative abort of the whole pool.
pub struct Dispatcher {
    config: Config,
    seeder: Box<dyn Seeder>,
    sessions: Arc<dyn SessionFactory>,
    sink: SharedSink,
    cancel: Arc<Notify>,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        seeder: Box<dyn Seeder>,
        sessions: Arc<dyn SessionFactory>,
        sink: SharedSink,
    ) -> Self {
        Self {
            config,
            seeder,
            sessions,
            sink,
            cancel: Arc::new(Notify::new()),
        }
    }

    /// Handle that makes [`Dispatcher::run`] abandon the drain and
    /// cancel the pool. Firing it is a shutdown request, not an error.
    pub fn cancel_handle(&self) -> Arc<Notify> {
        self.cancel.clone()
    }

    pub async fn run(&self) -> Result<()> {
        let result = self.execute().await;
        // Single cleanup point: the shared session connection is
        // released on success, on error, and on cancellation alike.
        self.sessions.close().await;
        result
    }

    async fn execute(&self) -> Result<()> {
        // No seeds, no run: discovery failure is fatal. Discovery can
        // stall on the network, so the cancel handle is honored here
        // too, not just during the drain.
        let mut links = tokio::select! {
            result = self.seeder.discover() => result?,
            _ = self.cancel.notified() => {
                info!("cancellation requested during discovery");
                return Ok(());
            }
        };
        info!(total = links.len(), "discovered profile links");

        if self.config.randomize {
            info!("randomizing profile link order");
            links.shuffle(&mut thread_rng());
        }

        let queue = Arc::new(WorkQueue::new());
        for link in links {
            queue.put(link);
        }

        let limiter = Arc::new(RateLimiter::new(
            self.config.rate_limit,
            self.config.rate_period(),
        ));

        // Open every session before spawning anything, so a failed open
        // cannot leave a partial pool blocked on the queue.
        let mut fetchers = Vec::with_capacity(self.config.concurrency);
        for _ in 0..self.config.concurrency {
            fetchers.push(self.sessions.open().await?);
        }

        let mut workers = Vec::with_capacity(self.config.concurrency);
        for (id, fetcher) in fetchers.into_iter().enumerate() {
            let worker = Worker::new(
                id,
                queue.clone(),
                limiter.clone(),
                self.sink.clone(),
                fetcher,
            );
            workers.push(tokio::spawn(worker.run()));
        }

        tokio::select! {
            _ = queue.join() => {
                // Drain first, stop second: stop jobs sit outside the
                // drain accounting, so this order is what lets `join`
                // complete at all.
                for _ in 0..workers.len() {
                    queue.put_stop();
                }
                for handle in workers {
                    if let Err(e) = handle.await {
                        warn!(error = %e, "worker task failed");
                    }
                }
            }
            _ = self.cancel.notified() => {
                info!("cancellation requested, stopping workers");
                for handle in &workers {
                    handle.abort();
                }
                for handle in workers {
                    let _ = handle.await;
                }
            }
        }

        info!("all tasks finished");
        Ok(())
    }
}
