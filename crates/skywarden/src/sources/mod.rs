//! Source adapters: one thin client per upstream provider.
//!
//! Each adapter decodes its provider's raw payload exactly once into the
//! canonical per-domain report, behind the [`SourceProvider`] trait so the
//! assembler (and tests) never depend on a concrete transport. Adapters
//! never panic across their boundary: transport and decode failures become
//! `SourceResult::Error`, disabled domains become `SourceResult::Unavailable`.

pub mod events;
pub mod gdacs;
pub mod meteo;
pub mod seismic;
pub mod space_weather;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::{AppConfig, DomainsConfig};
use crate::domain::{
    AirQualityReport, Coordinate, DisasterAlertReport, Domain, FloodReport, MarineReport,
    PollenReport, SeismicReport, SourceResult, SpaceWeatherReport, VolcanicReport, WeatherReport,
    WildfireReport,
};

/// Per-request timeout for upstream feed fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("skywarden/", env!("CARGO_PKG_VERSION"));

/// Errors from upstream feed fetches.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("decode error: {0}")]
    Decode(String),
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// GET a JSON document with query parameters and a bounded timeout.
pub(crate) async fn fetch_json(
    client: &reqwest::Client,
    url: &str,
    params: &[(&str, String)],
) -> FetchResult<Value> {
    let response = client
        .get(url)
        .query(params)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    Ok(response.json().await?)
}

/// The full set of per-domain adapters.
///
/// One method per domain, `(coordinate, radius) -> SourceResult`; radius
/// is omitted where the provider resolves a single grid point. Implemented
/// by [`HttpSources`] for production and by hand-rolled stubs in tests.
#[async_trait]
pub trait SourceProvider: Send + Sync + 'static {
    async fn space_weather(&self, coordinate: Coordinate) -> SourceResult<SpaceWeatherReport>;
    async fn seismic(&self, coordinate: Coordinate, radius_km: f64) -> SourceResult<SeismicReport>;
    async fn wildfire(&self, coordinate: Coordinate, radius_km: f64)
        -> SourceResult<WildfireReport>;
    async fn volcanic(&self, coordinate: Coordinate, radius_km: f64)
        -> SourceResult<VolcanicReport>;
    async fn disaster_alerts(
        &self,
        coordinate: Coordinate,
        radius_km: f64,
    ) -> SourceResult<DisasterAlertReport>;
    async fn weather(&self, coordinate: Coordinate) -> SourceResult<WeatherReport>;
    async fn air_quality(&self, coordinate: Coordinate) -> SourceResult<AirQualityReport>;
    async fn pollen(&self, coordinate: Coordinate) -> SourceResult<PollenReport>;
    async fn flood(&self, coordinate: Coordinate) -> SourceResult<FloodReport>;
    async fn marine(&self, coordinate: Coordinate) -> SourceResult<MarineReport>;
}

/// Production provider: one shared `reqwest::Client`, config fixed at
/// construction.
pub struct HttpSources {
    client: reqwest::Client,
    domains: DomainsConfig,
    open_meteo_api_key: Option<String>,
}

impl HttpSources {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            domains: config.domains.clone(),
            open_meteo_api_key: config.open_meteo_api_key.clone(),
        }
    }

    fn disabled<T>(&self, domain: Domain) -> Option<SourceResult<T>> {
        (!self.domains.is_enabled(domain))
            .then(|| SourceResult::unavailable("disabled in configuration"))
    }

    fn api_key(&self) -> Option<&str> {
        self.open_meteo_api_key.as_deref()
    }
}

#[async_trait]
impl SourceProvider for HttpSources {
    async fn space_weather(&self, coordinate: Coordinate) -> SourceResult<SpaceWeatherReport> {
        if let Some(result) = self.disabled(Domain::SpaceWeather) {
            return result;
        }
        space_weather::fetch(&self.client, coordinate).await
    }

    async fn seismic(&self, coordinate: Coordinate, radius_km: f64) -> SourceResult<SeismicReport> {
        if let Some(result) = self.disabled(Domain::Seismic) {
            return result;
        }
        seismic::fetch(&self.client, coordinate, radius_km).await
    }

    async fn wildfire(
        &self,
        coordinate: Coordinate,
        radius_km: f64,
    ) -> SourceResult<WildfireReport> {
        if let Some(result) = self.disabled(Domain::Wildfire) {
            return result;
        }
        events::fetch_wildfires(&self.client, coordinate, radius_km).await
    }

    async fn volcanic(
        &self,
        coordinate: Coordinate,
        radius_km: f64,
    ) -> SourceResult<VolcanicReport> {
        if let Some(result) = self.disabled(Domain::Volcanic) {
            return result;
        }
        events::fetch_volcanoes(&self.client, coordinate, radius_km).await
    }

    async fn disaster_alerts(
        &self,
        coordinate: Coordinate,
        radius_km: f64,
    ) -> SourceResult<DisasterAlertReport> {
        if let Some(result) = self.disabled(Domain::DisasterAlerts) {
            return result;
        }
        gdacs::fetch(&self.client, coordinate, radius_km).await
    }

    async fn weather(&self, coordinate: Coordinate) -> SourceResult<WeatherReport> {
        if let Some(result) = self.disabled(Domain::Weather) {
            return result;
        }
        meteo::fetch_weather(&self.client, self.api_key(), coordinate).await
    }

    async fn air_quality(&self, coordinate: Coordinate) -> SourceResult<AirQualityReport> {
        if let Some(result) = self.disabled(Domain::AirQuality) {
            return result;
        }
        meteo::fetch_air_quality(&self.client, self.api_key(), coordinate).await
    }

    async fn pollen(&self, coordinate: Coordinate) -> SourceResult<PollenReport> {
        if let Some(result) = self.disabled(Domain::Pollen) {
            return result;
        }
        meteo::fetch_pollen(&self.client, self.api_key(), coordinate).await
    }

    async fn flood(&self, coordinate: Coordinate) -> SourceResult<FloodReport> {
        if let Some(result) = self.disabled(Domain::Flood) {
            return result;
        }
        meteo::fetch_flood(&self.client, self.api_key(), coordinate).await
    }

    async fn marine(&self, coordinate: Coordinate) -> SourceResult<MarineReport> {
        if let Some(result) = self.disabled(Domain::Marine) {
            return result;
        }
        meteo::fetch_marine(&self.client, self.api_key(), coordinate).await
    }
}
