//! Deterministic rule-based advisory compositor.
//!
//! The terminal stage of the cascade: keyed by (profile, language,
//! snapshot fields), total over every input, every phrase drawn from the
//! localization table. Recognized free-form questions get a canned,
//! data-substituted answer; everything else gets the default multi-part
//! message (greeting + conditions, warnings, up to three tips, closing
//! remark when nothing fired).

use crate::advisory::ProfileKind;
use crate::config::AdvisoryTuning;
use crate::domain::{AqiCategory, FloodRisk, SeaState, Snapshot};
use crate::locale::{fill, lookup, Language};

/// Maximum number of positive/neutral tips in the default message.
const MAX_TIPS: usize = 3;

/// Question intents answered directly, independent of profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    AuroraVisibility,
    UvProtection,
    AirQuality,
    ExerciseTiming,
}

fn match_intent(question: &str) -> Option<Intent> {
    let q = question.to_ascii_lowercase();
    if q.contains("aurora") || q.contains("northern lights") {
        Some(Intent::AuroraVisibility)
    } else if q.contains("uv") || q.contains("sunscreen") || q.contains("sunburn") {
        Some(Intent::UvProtection)
    } else if q.contains("air quality") || q.contains("aqi") || q.contains("pollution") {
        Some(Intent::AirQuality)
    } else if q.contains("exercise")
        || q.contains("run")
        || q.contains("jog")
        || q.contains("workout")
        || q.contains("hike")
    {
        Some(Intent::ExerciseTiming)
    } else {
        None
    }
}

/// Compose the advisory text. Total: always returns non-empty text.
pub fn compose(
    snapshot: &Snapshot,
    profile: ProfileKind,
    language: Language,
    question: Option<&str>,
    tuning: &AdvisoryTuning,
) -> String {
    if let Some(intent) = question.and_then(match_intent) {
        return answer(intent, snapshot, language, tuning);
    }

    let mut parts = vec![lookup(language, "greeting"), conditions(snapshot, language)];

    let warnings = collect_warnings(snapshot, language);
    let no_warnings = warnings.is_empty();
    parts.extend(warnings);
    parts.extend(collect_tips(snapshot, profile, language, tuning));

    if no_warnings {
        parts.push(lookup(language, "enjoy_day"));
    }

    parts.join(" ")
}

// ── Question answers ────────────────────────────────────────────────

fn answer(
    intent: Intent,
    snapshot: &Snapshot,
    language: Language,
    tuning: &AdvisoryTuning,
) -> String {
    let na = lookup(language, "not_available");
    match intent {
        Intent::AuroraVisibility => {
            let kp = snapshot
                .space_weather
                .as_ok()
                .and_then(|r| r.kp_index);
            match kp {
                Some(kp) if kp >= tuning.aurora_kp_threshold => fill(
                    &lookup(language, "answer_aurora_yes"),
                    &[("kp", num(kp))],
                ),
                _ => fill(
                    &lookup(language, "answer_aurora_no"),
                    &[
                        ("kp", kp.map(num).unwrap_or(na)),
                        ("threshold", num(tuning.aurora_kp_threshold)),
                    ],
                ),
            }
        }
        Intent::UvProtection => {
            let uv = snapshot.air_quality.as_ok().and_then(|r| r.uv_index);
            fill(
                &lookup(language, "answer_uv"),
                &[
                    ("uv", uv.map(num).unwrap_or_else(|| na.clone())),
                    (
                        "category",
                        uv.map(|v| lookup(language, uv_key(v))).unwrap_or(na),
                    ),
                ],
            )
        }
        Intent::AirQuality => air_answer(snapshot, language, &na),
        Intent::ExerciseTiming => {
            let aqi = snapshot.air_quality.as_ok().and_then(|r| r.european_aqi);
            let uv = snapshot.air_quality.as_ok().and_then(|r| r.uv_index);
            if aqi.is_some_and(|v| v > 80.0) {
                fill(
                    &lookup(language, "answer_exercise_bad"),
                    &[("reason", air_answer(snapshot, language, &na))],
                )
            } else if uv.is_some_and(|v| v >= 11.0) {
                let uv_text = fill(
                    &lookup(language, "answer_uv"),
                    &[
                        ("uv", num(uv.unwrap_or_default())),
                        ("category", lookup(language, "uv_extreme")),
                    ],
                );
                fill(
                    &lookup(language, "answer_exercise_bad"),
                    &[("reason", uv_text)],
                )
            } else {
                let weather = snapshot.weather.as_ok();
                fill(
                    &lookup(language, "answer_exercise_good"),
                    &[
                        (
                            "temp",
                            weather
                                .and_then(|w| w.temperature_c)
                                .map(num)
                                .unwrap_or_else(|| na.clone()),
                        ),
                        (
                            "condition",
                            weather
                                .and_then(|w| w.condition.clone())
                                .unwrap_or(na),
                        ),
                    ],
                )
            }
        }
    }
}

fn air_answer(snapshot: &Snapshot, language: Language, na: &str) -> String {
    let report = snapshot.air_quality.as_ok();
    let aqi = report.and_then(|r| r.european_aqi);
    fill(
        &lookup(language, "answer_air"),
        &[
            ("aqi", aqi.map(num).unwrap_or_else(|| na.to_string())),
            (
                "category",
                report
                    .and_then(|r| r.category())
                    .map(|c| lookup(language, aqi_key(c)))
                    .unwrap_or_else(|| na.to_string()),
            ),
        ],
    )
}

// ── Default composition ─────────────────────────────────────────────

fn conditions(snapshot: &Snapshot, language: Language) -> String {
    match snapshot.weather.as_ok() {
        Some(weather) => {
            let na = lookup(language, "not_available");
            fill(
                &lookup(language, "conditions_summary"),
                &[
                    (
                        "temp",
                        weather.temperature_c.map(num).unwrap_or_else(|| na.clone()),
                    ),
                    ("condition", weather.condition.clone().unwrap_or(na)),
                ],
            )
        }
        None => lookup(language, "conditions_unknown"),
    }
}

/// Triggered hazard warnings in fixed priority order.
fn collect_warnings(snapshot: &Snapshot, language: Language) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(fire) = snapshot.wildfire.as_ok() {
        if fire.count_nearby > 0 {
            warnings.push(fill(
                &lookup(language, "warn_wildfire"),
                &[("count", fire.count_nearby.to_string())],
            ));
        }
    }

    if let Some(seismic) = snapshot.seismic.as_ok() {
        if seismic.count_nearby > 0 {
            if let Some(mag) = seismic.max_magnitude.filter(|m| *m >= 4.0) {
                warnings.push(fill(
                    &lookup(language, "warn_seismic"),
                    &[
                        ("count", seismic.count_nearby.to_string()),
                        ("magnitude", num(mag)),
                    ],
                ));
            }
        }
    }

    if let Some(kp) = snapshot
        .space_weather
        .as_ok()
        .and_then(|r| r.kp_index)
        .filter(|kp| *kp >= 7.0)
    {
        warnings.push(fill(&lookup(language, "warn_storm"), &[("kp", num(kp))]));
    }

    if let Some(aqi) = snapshot
        .air_quality
        .as_ok()
        .and_then(|r| r.european_aqi)
        .filter(|aqi| *aqi > 80.0)
    {
        warnings.push(fill(
            &lookup(language, "warn_air_quality"),
            &[("aqi", num(aqi))],
        ));
    }

    if let Some(uv) = snapshot
        .air_quality
        .as_ok()
        .and_then(|r| r.uv_index)
        .filter(|uv| *uv >= 8.0)
    {
        warnings.push(fill(&lookup(language, "warn_uv"), &[("uv", num(uv))]));
    }

    if let Some(flood) = snapshot.flood.as_ok() {
        let key = match flood.risk {
            FloodRisk::High => Some("flood_high"),
            FloodRisk::Moderate => Some("flood_moderate"),
            _ => None,
        };
        if let Some(key) = key {
            warnings.push(fill(
                &lookup(language, "warn_flood"),
                &[("risk", lookup(language, key))],
            ));
        }
    }

    warnings
}

/// Up to [`MAX_TIPS`] positive/neutral tips, profile-matched tips first.
fn collect_tips(
    snapshot: &Snapshot,
    profile: ProfileKind,
    language: Language,
    tuning: &AdvisoryTuning,
) -> Vec<String> {
    // (bias, text): bias 0 for tips matching the profile's emphasis.
    let mut candidates: Vec<(u8, String)> = Vec::new();

    if let Some(kp) = snapshot
        .space_weather
        .as_ok()
        .and_then(|r| r.kp_index)
        .filter(|kp| *kp >= tuning.aurora_kp_threshold)
    {
        let bias = if profile == ProfileKind::Aurora { 0 } else { 1 };
        candidates.push((
            bias,
            fill(&lookup(language, "tip_aurora"), &[("kp", num(kp))]),
        ));
    }

    if let Some(uv) = snapshot
        .air_quality
        .as_ok()
        .and_then(|r| r.uv_index)
        .filter(|uv| (6.0..8.0).contains(uv))
    {
        let bias = if profile == ProfileKind::Outdoor { 0 } else { 1 };
        candidates.push((
            bias,
            fill(&lookup(language, "tip_sunscreen"), &[("uv", num(uv))]),
        ));
    }

    if profile == ProfileKind::Respiratory {
        if let Some(category) = snapshot
            .air_quality
            .as_ok()
            .and_then(|r| r.category())
            .filter(|c| *c >= AqiCategory::Moderate)
        {
            candidates.push((
                0,
                fill(
                    &lookup(language, "tip_air_sensitive"),
                    &[("category", lookup(language, aqi_key(category)))],
                ),
            ));
        }
    }

    if let Some(humidity) = snapshot.weather.as_ok().and_then(|w| w.humidity_pct) {
        if humidity < tuning.humidifier_below_pct {
            candidates.push((
                1,
                fill(
                    &lookup(language, "tip_humidifier"),
                    &[("humidity", num(humidity))],
                ),
            ));
        } else if humidity > tuning.dehumidifier_above_pct {
            candidates.push((
                1,
                fill(
                    &lookup(language, "tip_dehumidifier"),
                    &[("humidity", num(humidity))],
                ),
            ));
        }
    }

    if profile == ProfileKind::Marine {
        if let Some(state) = snapshot
            .marine
            .as_ok()
            .and_then(|m| m.sea_state())
            .filter(|s| *s <= SeaState::SlightToModerate)
        {
            candidates.push((
                0,
                fill(
                    &lookup(language, "tip_calm_sea"),
                    &[("state", state.label().to_string())],
                ),
            ));
        }
    }

    if profile == ProfileKind::Outdoor {
        if let Some(weather) = snapshot.weather.as_ok() {
            let pleasant = weather.temperature_c.is_some_and(|t| (12.0..=28.0).contains(&t))
                && weather.precipitation_mm.unwrap_or(0.0) < 0.5;
            if pleasant {
                candidates.push((0, lookup(language, "tip_outdoor")));
            }
        }
    }

    candidates.sort_by_key(|(bias, _)| *bias);
    candidates.truncate(MAX_TIPS);
    candidates.into_iter().map(|(_, text)| text).collect()
}

// ── Helpers ─────────────────────────────────────────────────────────

fn num(value: f64) -> String {
    format!("{value}")
}

fn aqi_key(category: AqiCategory) -> &'static str {
    match category {
        AqiCategory::Good => "aqi_good",
        AqiCategory::Fair => "aqi_fair",
        AqiCategory::Moderate => "aqi_moderate",
        AqiCategory::Poor => "aqi_poor",
        AqiCategory::VeryPoor => "aqi_very_poor",
        AqiCategory::Hazardous => "aqi_hazardous",
    }
}

fn uv_key(uv: f64) -> &'static str {
    if uv <= 2.0 {
        "uv_low"
    } else if uv <= 5.0 {
        "uv_moderate"
    } else if uv <= 7.0 {
        "uv_high"
    } else if uv <= 10.0 {
        "uv_very_high"
    } else {
        "uv_extreme"
    }
}
