//! NASA EONET open natural events, by category and great-circle radius.
//!
//! Serves both the wildfire and volcanic domains; event geometry may be a
//! point or a polygon, so the location is probed from `serde_json::Value`.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Coordinate, SourceResult, VolcanicReport, WildfireReport};
use crate::geo::distance_km;
use crate::sources::fetch_json;

const EVENTS_URL: &str = "https://eonet.gsfc.nasa.gov/api/v3/events";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct Event {
    #[serde(default)]
    geometry: Vec<EventGeometry>,
}

#[derive(Debug, Deserialize)]
struct EventGeometry {
    #[serde(default)]
    coordinates: Value,
}

pub async fn fetch_wildfires(
    client: &reqwest::Client,
    coordinate: Coordinate,
    radius_km: f64,
) -> SourceResult<WildfireReport> {
    match fetch_category(client, coordinate, radius_km, "wildfires").await {
        Ok((count_nearby, nearest_km)) => SourceResult::ok(WildfireReport {
            count_nearby,
            nearest_km,
        }),
        Err(reason) => SourceResult::error(reason),
    }
}

pub async fn fetch_volcanoes(
    client: &reqwest::Client,
    coordinate: Coordinate,
    radius_km: f64,
) -> SourceResult<VolcanicReport> {
    match fetch_category(client, coordinate, radius_km, "volcanoes").await {
        Ok((count_nearby, nearest_km)) => SourceResult::ok(VolcanicReport {
            count_nearby,
            nearest_km,
        }),
        Err(reason) => SourceResult::error(reason),
    }
}

async fn fetch_category(
    client: &reqwest::Client,
    coordinate: Coordinate,
    radius_km: f64,
    category: &str,
) -> Result<(u32, Option<f64>), String> {
    let params = [
        ("status", "open".to_string()),
        ("limit", "100".to_string()),
        ("category", category.to_string()),
    ];
    let value = fetch_json(client, EVENTS_URL, &params)
        .await
        .map_err(|e| e.to_string())?;
    let feed: Feed = serde_json::from_value(value).map_err(|e| format!("decode error: {e}"))?;
    Ok(nearby(&feed.events, coordinate, radius_km))
}

fn nearby(events: &[Event], center: Coordinate, radius_km: f64) -> (u32, Option<f64>) {
    let mut count = 0;
    let mut nearest: Option<f64> = None;
    for event in events {
        // The most recent geometry entry carries the current location.
        let Some(geometry) = event.geometry.last() else {
            continue;
        };
        let Some((lon, lat)) = point_of(&geometry.coordinates) else {
            continue;
        };
        let Ok(location) = Coordinate::new(lat, lon) else {
            continue;
        };
        let dist = distance_km(center, location);
        if dist <= radius_km {
            count += 1;
            if nearest.map_or(true, |d| dist < d) {
                nearest = Some(dist);
            }
        }
    }
    (count, nearest)
}

/// Extract a `(lon, lat)` point from EONET geometry coordinates, which
/// are either a point `[lon, lat]` or nested polygon rings; polygons
/// collapse to their first vertex.
fn point_of(coordinates: &Value) -> Option<(f64, f64)> {
    let array = coordinates.as_array()?;
    match array.first()? {
        Value::Number(_) => {
            let lon = array.first()?.as_f64()?;
            let lat = array.get(1)?.as_f64()?;
            Some((lon, lat))
        }
        Value::Array(_) => point_of(array.first()?),
        _ => None,
    }
}
