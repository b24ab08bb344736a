//! Seed discovery: where the initial list of profile links comes from.

pub mod sitemap;

pub use sitemap::SitemapSeeder;

use async_trait::async_trait;

use crate::app::Result;

/// Discovers the full list of profile page URLs to visit.
///
/// A discovery failure is fatal to the run; without seeds there is no
/// work to do.
#[async_trait]
pub trait Seeder: Send + Sync {
    async fn discover(&self) -> Result<Vec<String>>;
}
