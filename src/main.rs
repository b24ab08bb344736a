use std::path::Path;
use std::sync::{Arc, Mutex};

use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dowser::cli::Cli;
use dowser::fetcher::ChromeSessions;
use dowser::pool::Dispatcher;
use dowser::seeder::SitemapSeeder;
use dowser::sink::{FileSink, SharedSink, StdoutSink};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so result output on stdout stays parseable.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.into_config()?;

    let sink: SharedSink = if config.output == "-" {
        Arc::new(Mutex::new(StdoutSink::new()))
    } else {
        Arc::new(Mutex::new(FileSink::create(Path::new(&config.output))?))
    };

    let sessions = Arc::new(ChromeSessions::connect(&config.browser_url).await?);
    let seeder = Box::new(SitemapSeeder::new(config.sitemap_url.clone()));

    let dispatcher = Dispatcher::new(config, seeder, sessions, sink);

    // Ctrl-C triggers the cooperative cancellation path; the run still
    // exits through the dispatcher, cleanly and without a stack trace.
    let cancel = dispatcher.cancel_handle();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            cancel.notify_one();
        }
    });

    dispatcher.run().await?;
    Ok(())
}
