//! Seed discovery from a directory site's sitemap index.
//!
//! The index lists per-section sitemaps; company profiles live in the
//! `sitemap-profile-N.xml` shards. Each shard is a flat list of `<loc>`
//! entries, one per profile page.

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::app::{DowserError, Result};
use crate::seeder::Seeder;

pub struct SitemapSeeder {
    client: reqwest::Client,
    sitemap_url: String,
    loc: Regex,
    profile_shard: Regex,
}

impl SitemapSeeder {
    pub fn new(sitemap_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            sitemap_url: sitemap_url.into(),
            loc: Regex::new(r"<loc>([^<>]+)</loc>").expect("static regex"),
            profile_shard: Regex::new(r"/sitemap-profile-\d+\.xml$").expect("static regex"),
        }
    }

    fn locs(&self, xml: &str) -> Vec<String> {
        self.loc
            .captures_iter(xml)
            .map(|c| c[1].to_string())
            .collect()
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        Ok(self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?)
    }
}

#[async_trait]
impl Seeder for SitemapSeeder {
    async fn discover(&self) -> Result<Vec<String>> {
        let index = self.fetch_text(&self.sitemap_url).await?;

        let shards: Vec<String> = self
            .locs(&index)
            .into_iter()
            .filter(|u| self.profile_shard.is_match(u))
            .collect();

        if shards.is_empty() {
            return Err(DowserError::Seed(format!(
                "no profile sitemaps listed in {}",
                self.sitemap_url
            )));
        }
        debug!(shards = shards.len(), "fetching profile sitemap shards");

        let bodies =
            futures::future::try_join_all(shards.iter().map(|u| self.fetch_text(u))).await?;

        let mut links = Vec::new();
        for body in &bodies {
            links.extend(self.locs(body));
        }
        Ok(links)
    }
}
