//! GDACS coordinated disaster alerts (Green/Orange/Red), by radius.

use serde::Deserialize;

use crate::domain::{AlertLevel, Coordinate, DisasterAlertReport, SourceResult};
use crate::geo::distance_km;
use crate::sources::fetch_json;

const EVENT_LIST_URL: &str = "https://www.gdacs.org/gdacsapi/api/events/geteventlist/MAP";

/// Cap on headlines carried into the report.
const MAX_HEADLINES: usize = 5;

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
    #[serde(default)]
    alertlevel: Option<String>,
    #[serde(default)]
    eventname: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[lon, lat]`
    #[serde(default)]
    coordinates: Vec<f64>,
}

pub async fn fetch(
    client: &reqwest::Client,
    coordinate: Coordinate,
    radius_km: f64,
) -> SourceResult<DisasterAlertReport> {
    let value = match fetch_json(client, EVENT_LIST_URL, &[]).await {
        Ok(v) => v,
        Err(e) => return SourceResult::error(e.to_string()),
    };
    let feed: Feed = match serde_json::from_value(value) {
        Ok(f) => f,
        Err(e) => return SourceResult::error(format!("decode error: {e}")),
    };
    SourceResult::ok(summarize(&feed.features, coordinate, radius_km))
}

fn summarize(features: &[Feature], center: Coordinate, radius_km: f64) -> DisasterAlertReport {
    let mut within: Vec<(f64, AlertLevel, String)> = Vec::new();

    for feature in features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let [lon, lat, ..] = geometry.coordinates[..] else {
            continue;
        };
        let Ok(location) = Coordinate::new(lat, lon) else {
            continue;
        };
        let dist = distance_km(center, location);
        if dist > radius_km {
            continue;
        }
        let level = feature
            .properties
            .alertlevel
            .as_deref()
            .and_then(AlertLevel::parse)
            .unwrap_or(AlertLevel::Green);
        let headline = feature
            .properties
            .eventname
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| feature.properties.name.clone())
            .unwrap_or_else(|| "unnamed event".to_string());
        within.push((dist, level, headline));
    }

    within.sort_by(|a, b| a.0.total_cmp(&b.0));

    DisasterAlertReport {
        count: within.len() as u32,
        highest_level: within.iter().map(|(_, level, _)| *level).max(),
        headlines: within
            .into_iter()
            .take(MAX_HEADLINES)
            .map(|(_, _, headline)| headline)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(features: serde_json::Value) -> Vec<Feature> {
        serde_json::from_value::<Feed>(json!({ "features": features }))
            .unwrap()
            .features
    }

    #[test]
    fn summarize_tracks_highest_level_and_headlines() {
        let zurich = Coordinate::new(47.3769, 8.5417).unwrap();
        let features = parse(json!([
            {"properties": {"alertlevel": "Orange", "eventname": "Rhine flooding"},
             "geometry": {"coordinates": [7.4474, 46.9480]}},
            {"properties": {"alertlevel": "Red", "eventname": "Po valley flooding"},
             "geometry": {"coordinates": [9.19, 45.4642]}},
            {"properties": {"alertlevel": "Red", "eventname": "Typhoon"},
             "geometry": {"coordinates": [139.65, 35.68]}}
        ]));
        let report = summarize(&features, zurich, 1000.0);
        assert_eq!(report.count, 2);
        assert_eq!(report.highest_level, Some(AlertLevel::Red));
        // Headlines are nearest-first.
        assert_eq!(report.headlines, vec!["Rhine flooding", "Po valley flooding"]);
    }

    #[test]
    fn summarize_empty() {
        let zurich = Coordinate::new(47.3769, 8.5417).unwrap();
        let report = summarize(&[], zurich, 1000.0);
        assert_eq!(report.count, 0);
        assert_eq!(report.highest_level, None);
        assert!(report.headlines.is_empty());
    }

    #[test]
    fn summarize_falls_back_to_name_and_green() {
        let zurich = Coordinate::new(47.3769, 8.5417).unwrap();
        let features = parse(json!([
            {"properties": {"alertlevel": "magenta", "eventname": "", "name": "Minor quake"},
             "geometry": {"coordinates": [8.55, 47.38]}}
        ]));
        let report = summarize(&features, zurich, 1000.0);
        assert_eq!(report.count, 1);
        // Unknown alert levels degrade to Green rather than being dropped.
        assert_eq!(report.highest_level, Some(AlertLevel::Green));
        assert_eq!(report.headlines, vec!["Minor quake"]);
    }

    #[test]
    fn summarize_caps_headlines() {
        let zurich = Coordinate::new(47.3769, 8.5417).unwrap();
        let features: Vec<serde_json::Value> = (0..8)
            .map(|i| {
                json!({"properties": {"alertlevel": "Orange", "eventname": format!("event-{i}")},
                       "geometry": {"coordinates": [8.5 + i as f64 * 0.01, 47.4]}})
            })
            .collect();
        let report = summarize(&parse(json!(features)), zurich, 1000.0);
        assert_eq!(report.count, 8);
        assert_eq!(report.headlines.len(), MAX_HEADLINES);
    }
}
