//! Structured prompt builder for the remote generation cascade.
//!
//! Enumerates every domain's values — absent values are rendered with the
//! localized "not available" marker, never omitted and never zeroed — plus
//! the profile context and the target-language instruction.

use crate::advisory::ProfileKind;
use crate::domain::{Snapshot, SourceResult};
use crate::locale::{lookup, Language};

/// Build the generation prompt for one snapshot.
pub fn build_prompt(
    snapshot: &Snapshot,
    profile: &str,
    language: Language,
    question: Option<&str>,
) -> String {
    let na = lookup(language, "not_available");
    let mut parts = Vec::new();

    parts.push(
        "You are an environmental safety assistant. Translate the observations \
         below into simple, actionable advice for the user. Be concise: two to \
         four sentences, no preamble, no markdown."
            .to_string(),
    );

    parts.push(format!(
        "\n## Observations for {}\n{}",
        snapshot.coordinate,
        domain_lines(snapshot, &na).join("\n")
    ));

    parts.push(format!(
        "\n## User profile\n{} — {}",
        profile,
        ProfileKind::from_tag(profile).context()
    ));

    parts.push(format!(
        "\nRespond in {}.",
        lookup(language, "language_name")
    ));

    match question {
        Some(q) => parts.push(format!(
            "\nThe user asked: \"{q}\"\nAnswer the question directly using the observations above."
        )),
        None => parts.push(
            "\nProduce a short proactive recommendation for the user's day.".to_string(),
        ),
    }

    parts.join("\n")
}

fn domain_lines(snapshot: &Snapshot, na: &str) -> Vec<String> {
    // Fixed order, one line per domain, total coverage.
    vec![
        format!(
            "- space weather: Kp {} ({}), X-ray flare class {}, solar wind {} km/s, aurora probability {}%",
            value(&snapshot.space_weather, na, |r| opt_num(r.kp_index, na)),
            value(&snapshot.space_weather, na, |r| {
                r.kp_level().unwrap_or("Unknown").to_string()
            }),
            value(&snapshot.space_weather, na, |r| {
                r.xray_class.clone().unwrap_or_else(|| na.to_string())
            }),
            value(&snapshot.space_weather, na, |r| {
                opt_num(r.solar_wind_speed_kms, na)
            }),
            value(&snapshot.space_weather, na, |r| {
                opt_num(r.aurora_probability_pct, na)
            }),
        ),
        format!(
            "- seismic: {} earthquake(s) nearby, strongest magnitude {}",
            value(&snapshot.seismic, na, |r| r.count_nearby.to_string()),
            value(&snapshot.seismic, na, |r| opt_num(r.max_magnitude, na)),
        ),
        format!(
            "- wildfire: {} active fire(s) nearby",
            value(&snapshot.wildfire, na, |r| r.count_nearby.to_string()),
        ),
        format!(
            "- volcanic: {} active event(s) nearby",
            value(&snapshot.volcanic, na, |r| r.count_nearby.to_string()),
        ),
        format!(
            "- disaster alerts: {} alert(s), highest level {}",
            value(&snapshot.disaster_alerts, na, |r| r.count.to_string()),
            value(&snapshot.disaster_alerts, na, |r| {
                r.highest_level
                    .map(|l| format!("{l:?}"))
                    .unwrap_or_else(|| na.to_string())
            }),
        ),
        format!(
            "- weather: {} °C (feels like {}), {}, humidity {}%, wind {} km/h, precipitation {} mm",
            value(&snapshot.weather, na, |r| opt_num(r.temperature_c, na)),
            value(&snapshot.weather, na, |r| opt_num(r.feels_like_c, na)),
            value(&snapshot.weather, na, |r| {
                r.condition.clone().unwrap_or_else(|| na.to_string())
            }),
            value(&snapshot.weather, na, |r| opt_num(r.humidity_pct, na)),
            value(&snapshot.weather, na, |r| opt_num(r.wind_speed_kmh, na)),
            value(&snapshot.weather, na, |r| opt_num(r.precipitation_mm, na)),
        ),
        format!(
            "- air quality: European AQI {} ({}), PM2.5 {} μg/m³, UV index {}",
            value(&snapshot.air_quality, na, |r| opt_num(r.european_aqi, na)),
            value(&snapshot.air_quality, na, |r| {
                r.category()
                    .map(|c| c.label().to_string())
                    .unwrap_or_else(|| na.to_string())
            }),
            value(&snapshot.air_quality, na, |r| opt_num(r.pm2_5, na)),
            value(&snapshot.air_quality, na, |r| opt_num(r.uv_index, na)),
        ),
        format!(
            "- pollen: elevated species: {}",
            value(&snapshot.pollen, na, |r| {
                let elevated = r.elevated_species();
                if elevated.is_empty() {
                    "none".to_string()
                } else {
                    elevated.join(", ")
                }
            }),
        ),
        format!(
            "- flood: river discharge {} m³/s, risk {}",
            value(&snapshot.flood, na, |r| opt_num(r.current_discharge, na)),
            value(&snapshot.flood, na, |r| format!("{:?}", r.risk)),
        ),
        format!(
            "- marine: wave height {} m, sea state {}",
            value(&snapshot.marine, na, |r| opt_num(r.wave_height_m, na)),
            value(&snapshot.marine, na, |r| {
                r.sea_state()
                    .map(|s| s.label().to_string())
                    .unwrap_or_else(|| na.to_string())
            }),
        ),
    ]
}

fn value<T>(result: &SourceResult<T>, na: &str, render: impl Fn(&T) -> String) -> String {
    match result.as_ok() {
        Some(report) => render(report),
        None => na.to_string(),
    }
}

fn opt_num(value: Option<f64>, na: &str) -> String {
    match value {
        Some(v) => format!("{v}"),
        None => na.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;

    fn snapshot() -> Snapshot {
        let coord = Coordinate::new(47.3769, 8.5417).unwrap();
        let mut snapshot = Snapshot::all_unavailable(coord, "test");
        snapshot.air_quality = SourceResult::ok(AirQualityReport {
            european_aqi: Some(95.0),
            uv_index: Some(9.0),
            ..Default::default()
        });
        snapshot
    }

    #[test]
    fn prompt_enumerates_every_domain() {
        let prompt = build_prompt(&snapshot(), "General Public", Language::En, None);
        for token in [
            "space weather",
            "seismic",
            "wildfire",
            "volcanic",
            "disaster alerts",
            "weather",
            "air quality",
            "pollen",
            "flood",
            "marine",
        ] {
            assert!(prompt.contains(token), "missing domain line: {token}");
        }
    }

    #[test]
    fn prompt_marks_absent_values_not_available() {
        let prompt = build_prompt(&snapshot(), "General Public", Language::En, None);
        assert!(prompt.contains("not available"));
        // Present values are rendered, not replaced.
        assert!(prompt.contains("95"));
        assert!(prompt.contains("Very Poor"));
    }

    #[test]
    fn prompt_includes_verbatim_question() {
        let prompt = build_prompt(
            &snapshot(),
            "Outdoor/Sports",
            Language::En,
            Some("Is it safe to run at noon?"),
        );
        assert!(prompt.contains("Is it safe to run at noon?"));
        assert!(prompt.contains("Answer the question directly"));
        assert!(!prompt.contains("proactive recommendation"));
    }

    #[test]
    fn prompt_without_question_asks_for_recommendation() {
        let prompt = build_prompt(&snapshot(), "General Public", Language::En, None);
        assert!(prompt.contains("proactive recommendation"));
    }

    #[test]
    fn prompt_names_target_language() {
        let prompt = build_prompt(&snapshot(), "General Public", Language::De, None);
        assert!(prompt.contains("Respond in Deutsch."));
        // Absent markers are localized too.
        assert!(prompt.contains("nicht verfügbar"));
    }

    #[test]
    fn prompt_includes_profile_context() {
        let prompt = build_prompt(&snapshot(), "Pilot/Aviation", Language::En, None);
        assert!(prompt.contains("Pilot/Aviation"));
        assert!(prompt.contains("radio"));
    }
}
