use std::path::PathBuf;

use clap::Parser;

use crate::app::Result;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "dowser")]
#[command(about = "Harvest company websites from directory profile pages", long_about = None)]
#[command(after_help = "Hint: run the browser with --remote-debugging-port=9222.")]
pub struct Cli {
    /// Browser remote debugging URL
    #[arg(short, long)]
    pub browser_url: Option<String>,

    /// Sitemap index to discover profile links from
    #[arg(short, long)]
    pub sitemap_url: Option<String>,

    /// Output file, `-` for stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of concurrent workers
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Page loads per second across all workers
    #[arg(short, long, visible_alias = "limit")]
    pub rate_limit: Option<usize>,

    /// Randomize profile link order
    #[arg(long, visible_alias = "rand")]
    pub randomize: bool,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolve the effective configuration: file values first, flags on top.
    pub fn into_config(self) -> Result<Config> {
        let base = Config::load(self.config.as_deref())?;
        self.apply_to(base)
    }

    fn apply_to(self, mut config: Config) -> Result<Config> {
        if let Some(v) = self.browser_url {
            config.browser_url = v;
        }
        if let Some(v) = self.sitemap_url {
            config.sitemap_url = v;
        }
        if let Some(v) = self.output {
            config.output = v;
        }
        if let Some(v) = self.concurrency {
            config.concurrency = v;
        }
        if let Some(v) = self.rate_limit {
            config.rate_limit = v;
        }
        if self.randomize {
            config.randomize = true;
        }

        config.validate()?;
        Ok(config)
    }
}
