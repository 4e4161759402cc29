use std::path::{Path, PathBuf};
use tracing::debug;

use super::SeriesSource;
use crate::calendar::YearRange;
use crate::error::{IndicatorError, Result};

/// Directory of `<series_id>.json` files holding SGS response bodies.
///
/// Used for offline runs and the end-to-end tests. The period is ignored;
/// narrowing happens on the merged table.
pub struct FixtureDir {
    root: PathBuf,
    label: String,
}

impl FixtureDir {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            label: format!("fixtures at {}", root.display()),
        }
    }

    pub fn path_for(&self, series_id: u32) -> PathBuf {
        self.root.join(format!("{}.json", series_id))
    }
}

impl SeriesSource for FixtureDir {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_body(&self, series_id: u32, _period: Option<YearRange>) -> Result<String> {
        let path = self.path_for(series_id);
        debug!("Reading fixture {}", path.display());
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            IndicatorError::fetch(series_id, format!("cannot read {}: {}", path.display(), e))
        })
    }
}
