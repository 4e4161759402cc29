use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::SeriesSource;
use crate::calendar::YearRange;
use crate::error::{IndicatorError, Result};

/// Banco Central do Brasil SGS (Sistema Gerenciador de Séries Temporais) client
pub struct BcbClient {
    client: Client,
    base_url: String,
}

impl BcbClient {
    /// Every request made by this client fails after `timeout`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("indicadores/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| IndicatorError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `{base}/bcdata.sgs.{id}/dados?formato=json[&dataInicial=..][&dataFinal=..]`
    pub fn series_url(&self, series_id: u32, period: Option<YearRange>) -> String {
        let mut url = format!("{}/bcdata.sgs.{}/dados?formato=json", self.base_url, series_id);

        if let Some(range) = period {
            if range.from != i32::MIN {
                url.push_str(&format!("&dataInicial=01/01/{}", range.from));
            }
            if range.to != i32::MAX {
                url.push_str(&format!("&dataFinal=31/12/{}", range.to));
            }
        }

        url
    }
}

impl SeriesSource for BcbClient {
    fn name(&self) -> &str {
        "BCB SGS"
    }

    async fn fetch_body(&self, series_id: u32, period: Option<YearRange>) -> Result<String> {
        let url = self.series_url(series_id, period);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                format!("failed to send request: {}", e)
            };
            IndicatorError::fetch(series_id, reason)
        })?;

        let status = response.status();

        // SGS answers 404 "Value(s) not found" when a narrowed window has no
        // observations. That is an empty series, not a failed fetch.
        if status == StatusCode::NOT_FOUND && period.is_some() {
            let body = response.text().await.unwrap_or_default();
            if body.to_ascii_lowercase().contains("not found") {
                debug!("Series {} has no values in {:?}", series_id, period);
                return Ok("[]".to_string());
            }
            return Err(IndicatorError::fetch(
                series_id,
                format!("BCB returned error status: {}", status),
            ));
        }

        if !status.is_success() {
            return Err(IndicatorError::fetch(
                series_id,
                format!("BCB returned error status: {}", status),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| IndicatorError::fetch(series_id, format!("failed to read body: {}", e)))
    }
}
