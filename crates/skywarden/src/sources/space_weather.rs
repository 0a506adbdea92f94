//! NOAA SWPC space-weather feeds: planetary Kp, GOES X-ray flux,
//! solar-wind plasma, and the OVATION aurora model.
//!
//! The SWPC products are loosely-shaped JSON (arrays of arrays with a
//! header row), so decoding probes `serde_json::Value` instead of fixed
//! structs. Each sub-feed is best-effort: the report carries whatever
//! subset responded, and only an all-feeds failure is an error.

use serde_json::Value;

use crate::domain::{Coordinate, SourceResult, SpaceWeatherReport};
use crate::sources::fetch_json;

const KP_URL: &str = "https://services.swpc.noaa.gov/products/noaa-planetary-k-index.json";
const XRAY_URL: &str = "https://services.swpc.noaa.gov/json/goes/primary/xrays-6-hour.json";
const PLASMA_URL: &str = "https://services.swpc.noaa.gov/products/solar-wind/plasma-2-hour.json";
const AURORA_URL: &str = "https://services.swpc.noaa.gov/json/ovation_aurora_latest.json";

pub async fn fetch(
    client: &reqwest::Client,
    coordinate: Coordinate,
) -> SourceResult<SpaceWeatherReport> {
    let (kp, xray, plasma, aurora) = futures::join!(
        fetch_json(client, KP_URL, &[]),
        fetch_json(client, XRAY_URL, &[]),
        fetch_json(client, PLASMA_URL, &[]),
        fetch_json(client, AURORA_URL, &[]),
    );

    if kp.is_err() && xray.is_err() && plasma.is_err() && aurora.is_err() {
        return SourceResult::error("no SWPC feed responded");
    }

    let report = SpaceWeatherReport {
        kp_index: kp.ok().as_ref().and_then(decode_kp),
        xray_class: xray.ok().as_ref().and_then(decode_xray_class),
        solar_wind_speed_kms: plasma.ok().as_ref().and_then(decode_wind_speed),
        aurora_probability_pct: aurora
            .ok()
            .as_ref()
            .and_then(|v| decode_aurora_probability(v, coordinate)),
    };

    SourceResult::ok(report)
}

/// Latest Kp from the planetary K-index product. Row 0 is the header;
/// each data row is `[time_tag, kp, a_running, station_count]`.
fn decode_kp(value: &Value) -> Option<f64> {
    let rows = value.as_array()?;
    if rows.len() < 2 {
        return None;
    }
    let latest = rows.last()?.as_array()?;
    as_f64(latest.get(1)?)
}

/// Flare class of the most recent X-ray flux sample, e.g. "M2".
fn decode_xray_class(value: &Value) -> Option<String> {
    let entries = value.as_array()?;
    entries
        .iter()
        .rev()
        .find_map(|entry| entry.get("flux").and_then(as_f64))
        .map(class_from_flux)
}

/// GOES flux (W/m²) to the conventional letter+magnitude flare class.
fn class_from_flux(flux: f64) -> String {
    if flux >= 1e-4 {
        format!("X{}", (flux / 1e-4) as u32)
    } else if flux >= 1e-5 {
        format!("M{}", (flux / 1e-5) as u32)
    } else if flux >= 1e-6 {
        format!("C{}", (flux / 1e-6) as u32)
    } else if flux >= 1e-7 {
        format!("B{}", (flux / 1e-7) as u32)
    } else {
        "A".to_string()
    }
}

/// Latest solar-wind speed from the plasma product. Row 0 is the header
/// `[time_tag, density, speed, temperature]`.
fn decode_wind_speed(value: &Value) -> Option<f64> {
    let rows = value.as_array()?;
    if rows.len() < 2 {
        return None;
    }
    let latest = rows.last()?.as_array()?;
    as_f64(latest.get(2)?)
}

/// Aurora probability (percent) at the OVATION grid point nearest to the
/// coordinate. Grid points are `[lon (0..360), lat, probability]`.
fn decode_aurora_probability(value: &Value, coordinate: Coordinate) -> Option<f64> {
    let points = value.get("coordinates")?.as_array()?;
    let lon_check = if coordinate.lon < 0.0 {
        coordinate.lon + 360.0
    } else {
        coordinate.lon
    };

    let mut best: Option<(f64, f64)> = None;
    for point in points {
        let point = point.as_array()?;
        if point.len() < 3 {
            continue;
        }
        let (p_lon, p_lat, prob) = (
            as_f64(&point[0])?,
            as_f64(&point[1])?,
            as_f64(&point[2])?,
        );
        let dist = (p_lat - coordinate.lat).abs() + (p_lon - lon_check).abs();
        if best.map_or(true, |(d, _)| dist < d) {
            best = Some((dist, prob));
        }
    }
    best.map(|(_, prob)| prob)
}

/// SWPC encodes numbers both as JSON numbers and as strings.
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
