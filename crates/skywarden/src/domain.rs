//! Canonical data model: coordinates, per-domain reports, and the
//! assembled environmental snapshot.
//!
//! Every upstream payload is decoded exactly once at the adapter boundary
//! into one of the report types below; nothing downstream of the snapshot
//! ever touches a provider-specific shape again. Missing values are
//! `Option::None`, never a sentinel number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Coordinate ──────────────────────────────────────────────────────

/// Errors from coordinate validation.
#[derive(Debug, thiserror::Error)]
pub enum CoordinateError {
    #[error("latitude {0} out of range [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    Longitude(f64),
}

/// A validated (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Validate ranges and construct. The only caller-visible input error
    /// in the whole pipeline originates here.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&lat) || lat.is_nan() {
            return Err(CoordinateError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lon) || lon.is_nan() {
            return Err(CoordinateError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

// ── Domains ─────────────────────────────────────────────────────────

/// One category of environmental/hazard data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    SpaceWeather,
    Seismic,
    Wildfire,
    Volcanic,
    DisasterAlerts,
    Weather,
    AirQuality,
    Pollen,
    Flood,
    Marine,
}

impl Domain {
    /// All domains, in the fixed evaluation order used by the risk engine
    /// and the prompt builder.
    pub const ALL: [Domain; 10] = [
        Domain::SpaceWeather,
        Domain::Seismic,
        Domain::Wildfire,
        Domain::Volcanic,
        Domain::DisasterAlerts,
        Domain::Weather,
        Domain::AirQuality,
        Domain::Pollen,
        Domain::Flood,
        Domain::Marine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::SpaceWeather => "space_weather",
            Domain::Seismic => "seismic",
            Domain::Wildfire => "wildfire",
            Domain::Volcanic => "volcanic",
            Domain::DisasterAlerts => "disaster_alerts",
            Domain::Weather => "weather",
            Domain::AirQuality => "air_quality",
            Domain::Pollen => "pollen",
            Domain::Flood => "flood",
            Domain::Marine => "marine",
        }
    }
}

// ── Per-domain status wrapper ───────────────────────────────────────

/// Best-effort result of one source adapter call.
///
/// `Error` means the provider was tried and failed; `Unavailable` means
/// the domain was never attempted (disabled, not requested, or the
/// provider has no data for the location). Downstream consumers must
/// treat both as "exclude from scoring", never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceResult<T> {
    Ok { report: T },
    Error { reason: String },
    Unavailable { reason: String },
}

impl<T> SourceResult<T> {
    pub fn ok(report: T) -> Self {
        SourceResult::Ok { report }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        SourceResult::Error {
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        SourceResult::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn as_ok(&self) -> Option<&T> {
        match self {
            SourceResult::Ok { report } => Some(report),
            _ => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, SourceResult::Ok { .. })
    }

    pub fn status_name(&self) -> &'static str {
        match self {
            SourceResult::Ok { .. } => "ok",
            SourceResult::Error { .. } => "error",
            SourceResult::Unavailable { .. } => "unavailable",
        }
    }
}

// ── Space weather ───────────────────────────────────────────────────

/// Space-weather indices from NOAA SWPC feeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceWeatherReport {
    /// Planetary K-index, latest observation.
    pub kp_index: Option<f64>,
    /// Flare class of the latest X-ray flux sample, e.g. "M2" or "X1".
    pub xray_class: Option<String>,
    pub solar_wind_speed_kms: Option<f64>,
    /// OVATION aurora probability at the nearest grid point, percent.
    pub aurora_probability_pct: Option<f64>,
}

impl SpaceWeatherReport {
    /// NOAA G-scale label for the current Kp.
    pub fn kp_level(&self) -> Option<&'static str> {
        let kp = self.kp_index?;
        Some(if kp >= 8.0 {
            "Extreme Storm (G4-G5)"
        } else if kp >= 7.0 {
            "Severe Storm (G3)"
        } else if kp >= 6.0 {
            "Strong Storm (G2)"
        } else if kp >= 5.0 {
            "Moderate Storm (G1)"
        } else if kp >= 4.0 {
            "Active"
        } else {
            "Quiet"
        })
    }

    /// Leading letter of the X-ray flare class, if any.
    pub fn xray_letter(&self) -> Option<char> {
        self.xray_class.as_ref().and_then(|c| c.chars().next())
    }
}

// ── Seismic / wildfire / volcanic ───────────────────────────────────

/// Earthquakes within the seismic search radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeismicReport {
    pub count_nearby: u32,
    pub max_magnitude: Option<f64>,
    pub nearest_km: Option<f64>,
}

/// Active wildfire hotspots within the search radius. A zero count is a
/// meaningful observation, not an absent value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WildfireReport {
    pub count_nearby: u32,
    pub nearest_km: Option<f64>,
}

/// Active volcanic events within the search radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolcanicReport {
    pub count_nearby: u32,
    pub nearest_km: Option<f64>,
}

// ── Disaster alerts ─────────────────────────────────────────────────

/// GDACS-style alert level, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Green,
    Orange,
    Red,
}

impl AlertLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Some(AlertLevel::Green),
            "orange" => Some(AlertLevel::Orange),
            "red" => Some(AlertLevel::Red),
            _ => None,
        }
    }
}

/// Coordinated disaster alerts within the search radius.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisasterAlertReport {
    pub count: u32,
    pub highest_level: Option<AlertLevel>,
    /// Up to five event headlines, nearest first.
    pub headlines: Vec<String>,
}

// ── Weather ─────────────────────────────────────────────────────────

/// Current surface weather conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_gusts_kmh: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    /// Decoded WMO weather-code label, e.g. "Partly cloudy".
    pub condition: Option<String>,
}

// ── Air quality ─────────────────────────────────────────────────────

/// European AQI category bands (20/40/60/80/100 cutoffs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Hazardous,
}

impl AqiCategory {
    pub fn from_european_aqi(aqi: f64) -> Self {
        if aqi <= 20.0 {
            AqiCategory::Good
        } else if aqi <= 40.0 {
            AqiCategory::Fair
        } else if aqi <= 60.0 {
            AqiCategory::Moderate
        } else if aqi <= 80.0 {
            AqiCategory::Poor
        } else if aqi <= 100.0 {
            AqiCategory::VeryPoor
        } else {
            AqiCategory::Hazardous
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Fair => "Fair",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::Poor => "Poor",
            AqiCategory::VeryPoor => "Very Poor",
            AqiCategory::Hazardous => "Hazardous",
        }
    }
}

/// Air quality and UV from the same provider endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReport {
    pub european_aqi: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub ozone: Option<f64>,
    pub uv_index: Option<f64>,
}

impl AirQualityReport {
    pub fn category(&self) -> Option<AqiCategory> {
        self.european_aqi.map(AqiCategory::from_european_aqi)
    }
}

// ── Pollen ──────────────────────────────────────────────────────────

/// Pollen concentration bands in grains/m³.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PollenLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl PollenLevel {
    pub fn from_grains(grains: f64) -> Self {
        if grains < 10.0 {
            PollenLevel::Low
        } else if grains < 50.0 {
            PollenLevel::Moderate
        } else if grains < 100.0 {
            PollenLevel::High
        } else {
            PollenLevel::VeryHigh
        }
    }
}

/// Per-species pollen concentrations (grains/m³).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollenReport {
    pub grass: Option<f64>,
    pub birch: Option<f64>,
    pub alder: Option<f64>,
    pub mugwort: Option<f64>,
    pub olive: Option<f64>,
    pub ragweed: Option<f64>,
}

impl PollenReport {
    /// Species at High or VeryHigh concentration.
    pub fn elevated_species(&self) -> Vec<&'static str> {
        let species = [
            ("grass", self.grass),
            ("birch", self.birch),
            ("alder", self.alder),
            ("mugwort", self.mugwort),
            ("olive", self.olive),
            ("ragweed", self.ragweed),
        ];
        species
            .iter()
            .filter_map(|(name, value)| {
                let grains = (*value)?;
                (PollenLevel::from_grains(grains) >= PollenLevel::High).then_some(*name)
            })
            .collect()
    }
}

// ── Flood ───────────────────────────────────────────────────────────

/// River flood risk category, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FloodRisk {
    None,
    Low,
    Moderate,
    High,
}

impl FloodRisk {
    /// Derive the risk band from forecast maximum vs. mean discharge.
    pub fn from_discharge(max_forecast: f64, mean: f64) -> Self {
        if mean <= 0.0 {
            return FloodRisk::None;
        }
        if max_forecast > mean * 3.0 {
            FloodRisk::High
        } else if max_forecast > mean * 2.0 {
            FloodRisk::Moderate
        } else if max_forecast > mean * 1.5 {
            FloodRisk::Low
        } else {
            FloodRisk::None
        }
    }
}

/// River discharge forecast for the nearest river cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodReport {
    pub current_discharge: Option<f64>,
    pub max_forecast: Option<f64>,
    pub mean_discharge: Option<f64>,
    pub risk: FloodRisk,
}

impl Default for FloodReport {
    fn default() -> Self {
        Self {
            current_discharge: None,
            max_forecast: None,
            mean_discharge: None,
            risk: FloodRisk::None,
        }
    }
}

// ── Marine ──────────────────────────────────────────────────────────

/// Sea state bands derived from significant wave height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeaState {
    Calm,
    SlightToModerate,
    ModerateToRough,
    Rough,
    VeryRough,
}

impl SeaState {
    pub fn from_wave_height(height_m: f64) -> Self {
        if height_m > 6.0 {
            SeaState::VeryRough
        } else if height_m > 4.0 {
            SeaState::Rough
        } else if height_m > 2.5 {
            SeaState::ModerateToRough
        } else if height_m > 1.0 {
            SeaState::SlightToModerate
        } else {
            SeaState::Calm
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SeaState::Calm => "Calm",
            SeaState::SlightToModerate => "Slight to Moderate",
            SeaState::ModerateToRough => "Moderate to Rough",
            SeaState::Rough => "Rough",
            SeaState::VeryRough => "Very Rough - Dangerous",
        }
    }
}

/// Ocean conditions at a coastal point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarineReport {
    pub wave_height_m: Option<f64>,
    pub wave_period_s: Option<f64>,
    pub swell_height_m: Option<f64>,
}

impl MarineReport {
    pub fn sea_state(&self) -> Option<SeaState> {
        self.wave_height_m.map(SeaState::from_wave_height)
    }
}

// ── Snapshot ────────────────────────────────────────────────────────

/// The merged, per-request view of all domain results for one coordinate.
///
/// One field per domain guarantees total coverage by construction: a
/// domain that was not requested or failed is still present, carrying its
/// status. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub coordinate: Coordinate,
    pub captured_at: DateTime<Utc>,
    pub space_weather: SourceResult<SpaceWeatherReport>,
    pub seismic: SourceResult<SeismicReport>,
    pub wildfire: SourceResult<WildfireReport>,
    pub volcanic: SourceResult<VolcanicReport>,
    pub disaster_alerts: SourceResult<DisasterAlertReport>,
    pub weather: SourceResult<WeatherReport>,
    pub air_quality: SourceResult<AirQualityReport>,
    pub pollen: SourceResult<PollenReport>,
    pub flood: SourceResult<FloodReport>,
    pub marine: SourceResult<MarineReport>,
}

impl Snapshot {
    /// A snapshot with every domain marked unavailable with the given
    /// reason. Starting point for tests and degraded assembly.
    pub fn all_unavailable(coordinate: Coordinate, reason: &str) -> Self {
        Self {
            coordinate,
            captured_at: Utc::now(),
            space_weather: SourceResult::unavailable(reason),
            seismic: SourceResult::unavailable(reason),
            wildfire: SourceResult::unavailable(reason),
            volcanic: SourceResult::unavailable(reason),
            disaster_alerts: SourceResult::unavailable(reason),
            weather: SourceResult::unavailable(reason),
            air_quality: SourceResult::unavailable(reason),
            pollen: SourceResult::unavailable(reason),
            flood: SourceResult::unavailable(reason),
            marine: SourceResult::unavailable(reason),
        }
    }

    pub fn status_of(&self, domain: Domain) -> &'static str {
        match domain {
            Domain::SpaceWeather => self.space_weather.status_name(),
            Domain::Seismic => self.seismic.status_name(),
            Domain::Wildfire => self.wildfire.status_name(),
            Domain::Volcanic => self.volcanic.status_name(),
            Domain::DisasterAlerts => self.disaster_alerts.status_name(),
            Domain::Weather => self.weather.status_name(),
            Domain::AirQuality => self.air_quality.status_name(),
            Domain::Pollen => self.pollen.status_name(),
            Domain::Flood => self.flood.status_name(),
            Domain::Marine => self.marine.status_name(),
        }
    }
}
