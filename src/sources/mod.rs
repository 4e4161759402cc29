// Series sources - BCB SGS API client and offline fixture directory

pub mod bcb;
pub mod fixtures;

use tracing::info;

use crate::calendar::YearRange;
use crate::config::{Config, IndicatorSpec};
use crate::error::Result;
use crate::series::{self, NormalizedSeries};

pub use bcb::BcbClient;
pub use fixtures::FixtureDir;

/// Something that can return the raw SGS body for a series id
#[allow(async_fn_in_trait)]
pub trait SeriesSource {
    fn name(&self) -> &str;

    /// Raw response body for `series_id`, optionally narrowed to `period`
    async fn fetch_body(&self, series_id: u32, period: Option<YearRange>) -> Result<String>;
}

/// Source selected from configuration
pub enum Source {
    Bcb(BcbClient),
    Fixtures(FixtureDir),
}

impl Source {
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.fixtures_dir {
            Some(dir) => Ok(Source::Fixtures(FixtureDir::new(dir))),
            None => Ok(Source::Bcb(BcbClient::new(
                &config.base_url,
                std::time::Duration::from_secs(config.timeout_secs),
            )?)),
        }
    }
}

impl SeriesSource for Source {
    fn name(&self) -> &str {
        match self {
            Source::Bcb(client) => client.name(),
            Source::Fixtures(dir) => dir.name(),
        }
    }

    async fn fetch_body(&self, series_id: u32, period: Option<YearRange>) -> Result<String> {
        match self {
            Source::Bcb(client) => client.fetch_body(series_id, period).await,
            Source::Fixtures(dir) => dir.fetch_body(series_id, period).await,
        }
    }
}

/// Fetch one indicator and normalize it into a date-sorted series
pub async fn fetch_series<S: SeriesSource>(
    source: &S,
    spec: &IndicatorSpec,
    period: Option<YearRange>,
) -> Result<NormalizedSeries> {
    info!(
        "Fetching {} (series {}) from {}",
        spec.name,
        spec.series_id,
        source.name()
    );
    let body = source.fetch_body(spec.series_id, period).await?;
    let series = series::parse_series_body(spec.series_id, &spec.name, &body)?;
    info!("{}: {} points", spec.name, series.len());
    Ok(series)
}
