//! # Dowser
//!
//! Harvests company website URLs from a directory site's profile pages
//! through a remotely attached Chrome session.
//!
//! ## Architecture
//!
//! ```text
//! Seeder → WorkQueue → N Workers (RateLimiter, PageFetcher) → Sink
//! ```
//!
//! The dispatcher seeds the queue from the site's sitemap, launches a
//! fixed pool of workers that share one queue, one rate limiter, and one
//! output sink, then shuts the pool down in two phases: wait for the
//! queue drain, then hand each worker a stop job.
//!
//! Browser automation, sitemap discovery, and output handling sit behind
//! traits ([`fetcher::PageFetcher`], [`seeder::Seeder`], [`sink::Sink`])
//! so the pipeline runs against fakes in tests.
//!
//! ## Quick Start
//!
//! ```bash
//! # Attach to a browser started with --remote-debugging-port=9222
//! dowser -o websites.txt
//!
//! # Four workers, two page loads per second, shuffled order
//! dowser -c 4 --limit 2 --rand
//! ```

/// Error types shared across the crate.
///
/// [`DowserError`](app::DowserError) and the crate-wide
/// [`Result`](app::Result) alias.
pub mod app;

/// Command-line interface using clap.
///
/// Flags mirror the configuration file; flags win when both are set.
pub mod cli;

/// Run configuration: defaults, `~/.config/dowser/config.toml`, CLI
/// overrides, and validation of the pool/limiter parameters.
pub mod config;

/// Page fetching behind traits.
///
/// - [`PageFetcher`](fetcher::PageFetcher): one worker's private session
/// - [`SessionFactory`](fetcher::SessionFactory): opens sessions, owns
///   the shared connection
/// - [`ChromeSessions`](fetcher::ChromeSessions): chromiumoxide-based
///   implementation attaching over the devtools protocol
pub mod fetcher;

/// Sliding-window request-rate limiter shared by all workers.
pub mod limiter;

/// The worker pool.
///
/// - [`Dispatcher`](pool::Dispatcher): owns a run and its shutdown
/// - [`Worker`](pool::Worker): the per-task fetch loop
pub mod pool;

/// Shared FIFO work queue with drain tracking and stop jobs.
pub mod queue;

/// Seed discovery.
///
/// - [`Seeder`](seeder::Seeder): trait for producing the initial link list
/// - [`SitemapSeeder`](seeder::SitemapSeeder): sitemap-index based
///   implementation
pub mod seeder;

/// Append-only result sinks (stdout or file), one website URL per line.
pub mod sink;
