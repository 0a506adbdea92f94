//! USGS earthquake feed, filtered to a great-circle radius.

use serde::Deserialize;

use crate::domain::{Coordinate, SeismicReport, SourceResult};
use crate::geo::distance_km;
use crate::sources::fetch_json;

const FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/2.5_day.geojson";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    mag: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[lon, lat, depth_km]`
    #[serde(default)]
    coordinates: Vec<f64>,
}

pub async fn fetch(
    client: &reqwest::Client,
    coordinate: Coordinate,
    radius_km: f64,
) -> SourceResult<SeismicReport> {
    let value = match fetch_json(client, FEED_URL, &[]).await {
        Ok(v) => v,
        Err(e) => return SourceResult::error(e.to_string()),
    };
    let feed: Feed = match serde_json::from_value(value) {
        Ok(f) => f,
        Err(e) => return SourceResult::error(format!("decode error: {e}")),
    };
    SourceResult::ok(summarize(&feed.features, coordinate, radius_km))
}

fn summarize(features: &[Feature], center: Coordinate, radius_km: f64) -> SeismicReport {
    let mut report = SeismicReport::default();
    for feature in features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let [lon, lat, ..] = geometry.coordinates[..] else {
            continue;
        };
        let Ok(quake) = Coordinate::new(lat, lon) else {
            continue;
        };
        let dist = distance_km(center, quake);
        if dist > radius_km {
            continue;
        }
        report.count_nearby += 1;
        if let Some(mag) = feature.properties.mag {
            if report.max_magnitude.map_or(true, |m| mag > m) {
                report.max_magnitude = Some(mag);
            }
        }
        if report.nearest_km.map_or(true, |d| dist < d) {
            report.nearest_km = Some(dist);
        }
    }
    report
}
