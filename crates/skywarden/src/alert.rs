//! Alert orchestration: the single entry point composing assembler,
//! risk engine, and advisory generator.
//!
//! Pure composition, no additional logic. Total over "all external
//! dependencies failed": only an out-of-range coordinate surfaces as an
//! error; everything else degrades into the snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::advisory::remote::{HttpRemoteClient, RemoteClient};
use crate::advisory::{Advisory, AdvisoryGenerator};
use crate::config::AppConfig;
use crate::domain::{Coordinate, CoordinateError, Domain, FloodRisk, Snapshot};
use crate::locale::Language;
use crate::risk::{self, RiskAssessment};
use crate::snapshot::Assembler;
use crate::sources::{HttpSources, SourceProvider};

/// Default profile tag when the caller supplies none.
pub const DEFAULT_PROFILE: &str = "General Public";

/// Errors from alert requests. Invalid input is the only caller-visible
/// failure class.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
}

/// Caller-facing alert request. Every field is optional; documented
/// defaults apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertRequest {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub profile: Option<String>,
    pub language: Option<String>,
    pub question: Option<String>,
}

/// Flat at-a-glance summary of the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSummary {
    pub kp_index: Option<f64>,
    pub xray_class: Option<String>,
    pub aurora_probability_pct: Option<f64>,
    pub earthquakes_nearby: Option<u32>,
    pub temperature_c: Option<f64>,
    pub condition: Option<String>,
    pub european_aqi: Option<f64>,
    pub uv_index: Option<f64>,
    pub flood_risk: Option<FloodRisk>,
}

impl AlertSummary {
    fn from_snapshot(snapshot: &Snapshot) -> Self {
        let space = snapshot.space_weather.as_ok();
        let weather = snapshot.weather.as_ok();
        let air = snapshot.air_quality.as_ok();
        Self {
            kp_index: space.and_then(|r| r.kp_index),
            xray_class: space.and_then(|r| r.xray_class.clone()),
            aurora_probability_pct: space.and_then(|r| r.aurora_probability_pct),
            earthquakes_nearby: snapshot.seismic.as_ok().map(|r| r.count_nearby),
            temperature_c: weather.and_then(|r| r.temperature_c),
            condition: weather.and_then(|r| r.condition.clone()),
            european_aqi: air.and_then(|r| r.european_aqi),
            uv_index: air.and_then(|r| r.uv_index),
            flood_risk: snapshot.flood.as_ok().map(|r| r.risk),
        }
    }
}

/// The externally-visible alert payload.
#[derive(Debug, Clone, Serialize)]
pub struct AlertResponse {
    pub timestamp: DateTime<Utc>,
    pub location: Coordinate,
    pub profile: String,
    pub language: Language,
    pub risk: RiskAssessment,
    pub advisory: Advisory,
    pub summary: AlertSummary,
    pub snapshot: Snapshot,
}

/// The alert pipeline over pluggable source and remote-client seams.
pub struct AlertService<P, C> {
    assembler: Assembler<P>,
    generator: AdvisoryGenerator<C>,
    default_lat: f64,
    default_lon: f64,
}

/// Production service wiring.
pub type HttpAlertService = AlertService<HttpSources, HttpRemoteClient>;

impl HttpAlertService {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Assembler::new(Arc::new(HttpSources::new(config)), config.domains.radii.clone()),
            AdvisoryGenerator::new(
                HttpRemoteClient::new(),
                config.generators.clone(),
                config.advisory.clone(),
            ),
            config.location.lat,
            config.location.lon,
        )
    }
}

impl<P: SourceProvider, C: RemoteClient> AlertService<P, C> {
    pub fn new(
        assembler: Assembler<P>,
        generator: AdvisoryGenerator<C>,
        default_lat: f64,
        default_lon: f64,
    ) -> Self {
        Self {
            assembler,
            generator,
            default_lat,
            default_lon,
        }
    }

    /// Build one alert: assemble → score → generate → merge.
    pub async fn build_alert(&self, request: AlertRequest) -> Result<AlertResponse, AlertError> {
        let coordinate = Coordinate::new(
            request.lat.unwrap_or(self.default_lat),
            request.lon.unwrap_or(self.default_lon),
        )?;
        let profile = request
            .profile
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        let language = Language::parse(request.language.as_deref().unwrap_or(""));

        let snapshot = self.assembler.assemble(coordinate, &Domain::ALL).await;
        let risk = risk::assess(&snapshot);
        let advisory = self
            .generator
            .generate(&snapshot, &profile, language, request.question.as_deref())
            .await;

        Ok(AlertResponse {
            timestamp: snapshot.captured_at,
            location: coordinate,
            profile,
            language,
            summary: AlertSummary::from_snapshot(&snapshot),
            risk,
            advisory,
            snapshot,
        })
    }
}
