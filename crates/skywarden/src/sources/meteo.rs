//! Open-Meteo adapters: weather, air quality (+UV), pollen, river
//! discharge, and marine state.
//!
//! These endpoints have stable shapes, so they decode through fixed serde
//! structs. The optional API key (commercial tier) is appended when
//! configured. Flood and marine report `Unavailable` when the provider
//! has no data for the location (no river cell / inland point).

use serde::Deserialize;

use crate::domain::{
    AirQualityReport, Coordinate, FloodReport, FloodRisk, MarineReport, PollenReport,
    SourceResult, WeatherReport,
};
use crate::sources::{fetch_json, FetchError};

const WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";
const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";
const FLOOD_URL: &str = "https://flood-api.open-meteo.com/v1/flood";
const MARINE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";

fn base_params(api_key: Option<&str>, coordinate: Coordinate) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("latitude", coordinate.lat.to_string()),
        ("longitude", coordinate.lon.to_string()),
        ("timezone", "auto".to_string()),
    ];
    if let Some(key) = api_key {
        params.push(("apikey", key.to_string()));
    }
    params
}

async fn fetch_current<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    params: Vec<(&'static str, String)>,
) -> Result<T, FetchError> {
    let value = fetch_json(client, url, &params).await?;
    serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
}

// ── Weather ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    current: WeatherCurrent,
}

#[derive(Debug, Deserialize)]
struct WeatherCurrent {
    temperature_2m: Option<f64>,
    apparent_temperature: Option<f64>,
    relative_humidity_2m: Option<f64>,
    wind_speed_10m: Option<f64>,
    wind_gusts_10m: Option<f64>,
    precipitation: Option<f64>,
    cloud_cover: Option<f64>,
    weather_code: Option<u32>,
}

pub async fn fetch_weather(
    client: &reqwest::Client,
    api_key: Option<&str>,
    coordinate: Coordinate,
) -> SourceResult<WeatherReport> {
    let mut params = base_params(api_key, coordinate);
    params.push((
        "current",
        "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation,\
         weather_code,cloud_cover,wind_speed_10m,wind_gusts_10m"
            .to_string(),
    ));

    let response: WeatherResponse = match fetch_current(client, WEATHER_URL, params).await {
        Ok(r) => r,
        Err(e) => return SourceResult::error(e.to_string()),
    };
    let current = response.current;

    SourceResult::ok(WeatherReport {
        temperature_c: current.temperature_2m,
        feels_like_c: current.apparent_temperature,
        humidity_pct: current.relative_humidity_2m,
        wind_speed_kmh: current.wind_speed_10m,
        wind_gusts_kmh: current.wind_gusts_10m,
        precipitation_mm: current.precipitation,
        cloud_cover_pct: current.cloud_cover,
        condition: current
            .weather_code
            .map(|code| describe_weather_code(code).to_string()),
    })
}

/// WMO weather interpretation codes.
pub fn describe_weather_code(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

// ── Air quality ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    current: AirQualityCurrent,
}

#[derive(Debug, Deserialize)]
struct AirQualityCurrent {
    european_aqi: Option<f64>,
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    ozone: Option<f64>,
    uv_index: Option<f64>,
}

pub async fn fetch_air_quality(
    client: &reqwest::Client,
    api_key: Option<&str>,
    coordinate: Coordinate,
) -> SourceResult<AirQualityReport> {
    let mut params = base_params(api_key, coordinate);
    params.push((
        "current",
        "european_aqi,pm2_5,pm10,ozone,uv_index".to_string(),
    ));

    let response: AirQualityResponse = match fetch_current(client, AIR_QUALITY_URL, params).await
    {
        Ok(r) => r,
        Err(e) => return SourceResult::error(e.to_string()),
    };
    let current = response.current;

    SourceResult::ok(AirQualityReport {
        european_aqi: current.european_aqi,
        pm2_5: current.pm2_5,
        pm10: current.pm10,
        ozone: current.ozone,
        uv_index: current.uv_index,
    })
}

// ── Pollen ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PollenResponse {
    current: PollenCurrent,
}

#[derive(Debug, Deserialize)]
struct PollenCurrent {
    grass_pollen: Option<f64>,
    birch_pollen: Option<f64>,
    alder_pollen: Option<f64>,
    mugwort_pollen: Option<f64>,
    olive_pollen: Option<f64>,
    ragweed_pollen: Option<f64>,
}

pub async fn fetch_pollen(
    client: &reqwest::Client,
    api_key: Option<&str>,
    coordinate: Coordinate,
) -> SourceResult<PollenReport> {
    let mut params = base_params(api_key, coordinate);
    params.push((
        "current",
        "alder_pollen,birch_pollen,grass_pollen,mugwort_pollen,olive_pollen,ragweed_pollen"
            .to_string(),
    ));

    let response: PollenResponse = match fetch_current(client, AIR_QUALITY_URL, params).await {
        Ok(r) => r,
        Err(e) => return SourceResult::error(e.to_string()),
    };
    let current = response.current;

    // Pollen coverage is Europe-only and seasonal; all-absent means the
    // provider has nothing for this location.
    let report = PollenReport {
        grass: current.grass_pollen,
        birch: current.birch_pollen,
        alder: current.alder_pollen,
        mugwort: current.mugwort_pollen,
        olive: current.olive_pollen,
        ragweed: current.ragweed_pollen,
    };
    if report == PollenReport::default() {
        return SourceResult::unavailable("no pollen data for this location");
    }
    SourceResult::ok(report)
}

// ── Flood ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FloodResponse {
    daily: FloodDaily,
}

#[derive(Debug, Deserialize)]
struct FloodDaily {
    #[serde(default)]
    river_discharge: Vec<Option<f64>>,
}

pub async fn fetch_flood(
    client: &reqwest::Client,
    api_key: Option<&str>,
    coordinate: Coordinate,
) -> SourceResult<FloodReport> {
    let mut params = base_params(api_key, coordinate);
    params.push(("daily", "river_discharge".to_string()));
    params.push(("forecast_days", "7".to_string()));

    let response: FloodResponse = match fetch_current(client, FLOOD_URL, params).await {
        Ok(r) => r,
        Err(e) => return SourceResult::error(e.to_string()),
    };

    match derive_flood_report(&response.daily.river_discharge) {
        Some(report) => SourceResult::ok(report),
        None => SourceResult::unavailable("no river data for this location"),
    }
}

fn derive_flood_report(discharge: &[Option<f64>]) -> Option<FloodReport> {
    let valid: Vec<f64> = discharge.iter().flatten().copied().collect();
    if valid.is_empty() {
        return None;
    }
    let max_forecast = valid.iter().copied().fold(f64::MIN, f64::max);
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    Some(FloodReport {
        current_discharge: valid.first().copied(),
        max_forecast: Some(max_forecast),
        mean_discharge: Some(mean),
        risk: FloodRisk::from_discharge(max_forecast, mean),
    })
}

// ── Marine ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MarineResponse {
    current: MarineCurrent,
}

#[derive(Debug, Deserialize)]
struct MarineCurrent {
    wave_height: Option<f64>,
    wave_period: Option<f64>,
    swell_wave_height: Option<f64>,
}

pub async fn fetch_marine(
    client: &reqwest::Client,
    api_key: Option<&str>,
    coordinate: Coordinate,
) -> SourceResult<MarineReport> {
    let mut params = base_params(api_key, coordinate);
    params.push((
        "current",
        "wave_height,wave_period,swell_wave_height".to_string(),
    ));

    let response: MarineResponse = match fetch_current(client, MARINE_URL, params).await {
        Ok(r) => r,
        Err(e) => return SourceResult::error(e.to_string()),
    };
    let current = response.current;

    if current.wave_height.is_none() {
        return SourceResult::unavailable("location not near a coast");
    }

    SourceResult::ok(MarineReport {
        wave_height_m: current.wave_height,
        wave_period_s: current.wave_period,
        swell_height_m: current.swell_wave_height,
    })
}
