//! Deterministic rule-based hazard scoring.
//!
//! `assess` is a pure function over the snapshot: a running integer
//! score plus an ordered factor list, evaluated in a fixed domain order
//! so output is reproducible. Only the highest matching step within a
//! domain contributes. Domains whose status is not `ok` contribute
//! nothing — scoring covers what is known, nothing else.
//!
//! The threshold ladder and severity breakpoints are the single frozen
//! scheme documented in DESIGN.md.

use serde::{Deserialize, Serialize};

use crate::domain::{AlertLevel, FloodRisk, Snapshot};

/// Ordinal hazard level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    LowMedium,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::LowMedium => "Low-Medium",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Severity breakpoints over the accumulated score.
    fn from_score(score: u32) -> Self {
        if score >= 8 {
            Severity::Critical
        } else if score >= 4 {
            Severity::High
        } else if score >= 3 {
            Severity::Medium
        } else if score >= 1 {
            Severity::LowMedium
        } else {
            Severity::Low
        }
    }
}

/// One triggered hazard: a short label plus the triggering value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub label: String,
    pub value: String,
}

impl RiskFactor {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Output of the risk engine for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub severity: Severity,
    pub score: u32,
    pub factors: Vec<RiskFactor>,
}

/// Score a snapshot. Pure and idempotent: equal snapshots always yield
/// equal assessments.
pub fn assess(snapshot: &Snapshot) -> RiskAssessment {
    let mut score = 0u32;
    let mut factors = Vec::new();

    let mut apply = |step: Option<(u32, RiskFactor)>| {
        if let Some((delta, factor)) = step {
            score += delta;
            factors.push(factor);
        }
    };

    // Fixed evaluation order; do not reorder.
    apply(geomagnetic_step(snapshot));
    apply(xray_step(snapshot));
    apply(seismic_step(snapshot));
    apply(wildfire_step(snapshot));
    apply(disaster_alert_step(snapshot));
    apply(air_quality_step(snapshot));
    apply(uv_step(snapshot));
    apply(flood_step(snapshot));

    RiskAssessment {
        severity: Severity::from_score(score),
        score,
        factors,
    }
}

fn geomagnetic_step(snapshot: &Snapshot) -> Option<(u32, RiskFactor)> {
    let report = snapshot.space_weather.as_ok()?;
    let kp = report.kp_index?;
    if kp >= 8.0 {
        Some((4, RiskFactor::new("Extreme geomagnetic storm", format!("Kp={kp}"))))
    } else if kp >= 7.0 {
        Some((3, RiskFactor::new("Severe geomagnetic storm", format!("Kp={kp}"))))
    } else if kp >= 5.0 {
        Some((2, RiskFactor::new("Geomagnetic storm", format!("Kp={kp}"))))
    } else {
        None
    }
}

fn xray_step(snapshot: &Snapshot) -> Option<(u32, RiskFactor)> {
    let report = snapshot.space_weather.as_ok()?;
    let class = report.xray_class.as_deref()?;
    match report.xray_letter()? {
        'X' => Some((3, RiskFactor::new("X-class solar flare", class))),
        'M' => Some((2, RiskFactor::new("M-class solar flare", class))),
        _ => None,
    }
}

fn seismic_step(snapshot: &Snapshot) -> Option<(u32, RiskFactor)> {
    let report = snapshot.seismic.as_ok()?;
    if report.count_nearby == 0 {
        return None;
    }
    let mag = report.max_magnitude?;
    if mag >= 6.0 {
        Some((4, RiskFactor::new("Major earthquake nearby", format!("M{mag}"))))
    } else if mag >= 5.0 {
        Some((3, RiskFactor::new("Significant earthquake nearby", format!("M{mag}"))))
    } else if mag >= 4.0 {
        Some((2, RiskFactor::new("Moderate earthquake nearby", format!("M{mag}"))))
    } else {
        None
    }
}

fn wildfire_step(snapshot: &Snapshot) -> Option<(u32, RiskFactor)> {
    let report = snapshot.wildfire.as_ok()?;
    let count = report.count_nearby;
    if count > 5 {
        Some((4, RiskFactor::new("Multiple wildfires nearby", format!("{count} fires"))))
    } else if count > 0 {
        Some((2, RiskFactor::new("Wildfire nearby", format!("{count} fire(s)"))))
    } else {
        None
    }
}

fn disaster_alert_step(snapshot: &Snapshot) -> Option<(u32, RiskFactor)> {
    let report = snapshot.disaster_alerts.as_ok()?;
    match report.highest_level? {
        AlertLevel::Red => Some((
            3,
            RiskFactor::new("Red disaster alert in region", format!("{} alert(s)", report.count)),
        )),
        AlertLevel::Orange => Some((
            1,
            RiskFactor::new("Orange disaster alert in region", format!("{} alert(s)", report.count)),
        )),
        AlertLevel::Green => None,
    }
}

fn air_quality_step(snapshot: &Snapshot) -> Option<(u32, RiskFactor)> {
    let report = snapshot.air_quality.as_ok()?;
    let aqi = report.european_aqi?;
    if aqi > 100.0 {
        Some((3, RiskFactor::new("Hazardous air quality", format!("AQI {aqi}"))))
    } else if aqi > 80.0 {
        Some((2, RiskFactor::new("Very poor air quality", format!("AQI {aqi}"))))
    } else if aqi > 60.0 {
        Some((1, RiskFactor::new("Poor air quality", format!("AQI {aqi}"))))
    } else {
        None
    }
}

fn uv_step(snapshot: &Snapshot) -> Option<(u32, RiskFactor)> {
    let report = snapshot.air_quality.as_ok()?;
    let uv = report.uv_index?;
    if uv >= 11.0 {
        Some((2, RiskFactor::new("Extreme UV", format!("UV {uv}"))))
    } else if uv >= 8.0 {
        Some((1, RiskFactor::new("Very high UV", format!("UV {uv}"))))
    } else {
        None
    }
}

fn flood_step(snapshot: &Snapshot) -> Option<(u32, RiskFactor)> {
    let report = snapshot.flood.as_ok()?;
    match report.risk {
        FloodRisk::High => Some((3, RiskFactor::new("High flood risk", "High"))),
        FloodRisk::Moderate => Some((2, RiskFactor::new("Moderate flood risk", "Moderate"))),
        FloodRisk::Low | FloodRisk::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;

    fn empty_snapshot() -> Snapshot {
        let coord = Coordinate::new(47.3769, 8.5417).unwrap();
        Snapshot::all_unavailable(coord, "test")
    }

    #[test]
    fn all_unavailable_scores_zero() {
        let assessment = assess(&empty_snapshot());
        assert_eq!(assessment.severity, Severity::Low);
        assert_eq!(assessment.score, 0);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn assessment_is_idempotent() {
        let mut snapshot = empty_snapshot();
        snapshot.space_weather = SourceResult::ok(SpaceWeatherReport {
            kp_index: Some(8.0),
            ..Default::default()
        });
        let first = assess(&snapshot);
        let second = assess(&snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn extreme_storm_alone_reaches_high_band() {
        let mut snapshot = empty_snapshot();
        snapshot.space_weather = SourceResult::ok(SpaceWeatherReport {
            kp_index: Some(8.0),
            ..Default::default()
        });
        let assessment = assess(&snapshot);
        assert_eq!(assessment.score, 4);
        assert_eq!(assessment.severity, Severity::High);
        assert_eq!(assessment.factors.len(), 1);
        assert!(assessment.factors[0].label.contains("geomagnetic storm"));
    }

    #[test]
    fn kp_ladder_boundaries() {
        let score_for = |kp: f64| {
            let mut snapshot = empty_snapshot();
            snapshot.space_weather = SourceResult::ok(SpaceWeatherReport {
                kp_index: Some(kp),
                ..Default::default()
            });
            assess(&snapshot).score
        };
        assert_eq!(score_for(4.9), 0);
        assert_eq!(score_for(5.0), 2);
        assert_eq!(score_for(7.0), 3);
        assert_eq!(score_for(8.0), 4);
        assert_eq!(score_for(9.0), 4);
    }

    #[test]
    fn xray_class_scoring() {
        let score_for = |class: &str| {
            let mut snapshot = empty_snapshot();
            snapshot.space_weather = SourceResult::ok(SpaceWeatherReport {
                xray_class: Some(class.to_string()),
                ..Default::default()
            });
            assess(&snapshot).score
        };
        assert_eq!(score_for("X1"), 3);
        assert_eq!(score_for("M5"), 2);
        assert_eq!(score_for("C3"), 0);
        assert_eq!(score_for("A"), 0);
    }

    #[test]
    fn seismic_requires_nearby_count() {
        let mut snapshot = empty_snapshot();
        // A magnitude with zero nearby count must not score.
        snapshot.seismic = SourceResult::ok(SeismicReport {
            count_nearby: 0,
            max_magnitude: Some(6.5),
            nearest_km: None,
        });
        assert_eq!(assess(&snapshot).score, 0);

        snapshot.seismic = SourceResult::ok(SeismicReport {
            count_nearby: 1,
            max_magnitude: Some(6.5),
            nearest_km: Some(120.0),
        });
        let assessment = assess(&snapshot);
        assert_eq!(assessment.score, 4);
        assert!(assessment.factors[0].label.contains("earthquake"));
    }

    #[test]
    fn wildfire_ladder() {
        let score_for = |count: u32| {
            let mut snapshot = empty_snapshot();
            snapshot.wildfire = SourceResult::ok(WildfireReport {
                count_nearby: count,
                nearest_km: None,
            });
            assess(&snapshot).score
        };
        assert_eq!(score_for(0), 0);
        assert_eq!(score_for(1), 2);
        assert_eq!(score_for(5), 2);
        assert_eq!(score_for(6), 4);
    }

    #[test]
    fn disaster_alert_levels() {
        let score_for = |level: Option<AlertLevel>| {
            let mut snapshot = empty_snapshot();
            snapshot.disaster_alerts = SourceResult::ok(DisasterAlertReport {
                count: 1,
                highest_level: level,
                headlines: vec![],
            });
            assess(&snapshot).score
        };
        assert_eq!(score_for(Some(AlertLevel::Red)), 3);
        assert_eq!(score_for(Some(AlertLevel::Orange)), 1);
        assert_eq!(score_for(Some(AlertLevel::Green)), 0);
        assert_eq!(score_for(None), 0);
    }

    #[test]
    fn air_quality_and_uv_are_independent_steps() {
        let mut snapshot = empty_snapshot();
        snapshot.air_quality = SourceResult::ok(AirQualityReport {
            european_aqi: Some(95.0),
            uv_index: Some(9.0),
            ..Default::default()
        });
        let assessment = assess(&snapshot);
        // AQI 95 → +2, UV 9 → +1.
        assert_eq!(assessment.score, 3);
        assert_eq!(assessment.severity, Severity::Medium);
        assert_eq!(assessment.factors.len(), 2);
    }

    #[test]
    fn flood_risk_scoring() {
        let score_for = |risk: FloodRisk| {
            let mut snapshot = empty_snapshot();
            snapshot.flood = SourceResult::ok(FloodReport {
                risk,
                ..Default::default()
            });
            assess(&snapshot).score
        };
        assert_eq!(score_for(FloodRisk::High), 3);
        assert_eq!(score_for(FloodRisk::Moderate), 2);
        assert_eq!(score_for(FloodRisk::Low), 0);
        assert_eq!(score_for(FloodRisk::None), 0);
    }

    #[test]
    fn severity_breakpoints() {
        assert_eq!(Severity::from_score(0), Severity::Low);
        assert_eq!(Severity::from_score(1), Severity::LowMedium);
        assert_eq!(Severity::from_score(2), Severity::LowMedium);
        assert_eq!(Severity::from_score(3), Severity::Medium);
        assert_eq!(Severity::from_score(4), Severity::High);
        assert_eq!(Severity::from_score(7), Severity::High);
        assert_eq!(Severity::from_score(8), Severity::Critical);
        assert_eq!(Severity::from_score(20), Severity::Critical);
    }

    #[test]
    fn raising_one_domain_never_lowers_the_score() {
        // Monotonicity: hold every other domain fixed and sweep seismic
        // magnitude upward.
        let mut base = empty_snapshot();
        base.air_quality = SourceResult::ok(AirQualityReport {
            european_aqi: Some(70.0),
            uv_index: Some(5.0),
            ..Default::default()
        });

        let mut previous = 0;
        for mag in [3.0, 4.0, 4.5, 5.0, 5.9, 6.0, 7.5] {
            let mut snapshot = base.clone();
            snapshot.seismic = SourceResult::ok(SeismicReport {
                count_nearby: 2,
                max_magnitude: Some(mag),
                nearest_km: Some(80.0),
            });
            let score = assess(&snapshot).score;
            assert!(score >= previous, "score dropped at M{mag}");
            previous = score;
        }
    }

    #[test]
    fn factor_order_follows_evaluation_order() {
        let mut snapshot = empty_snapshot();
        snapshot.flood = SourceResult::ok(FloodReport {
            risk: FloodRisk::High,
            ..Default::default()
        });
        snapshot.space_weather = SourceResult::ok(SpaceWeatherReport {
            kp_index: Some(7.2),
            ..Default::default()
        });
        snapshot.wildfire = SourceResult::ok(WildfireReport {
            count_nearby: 2,
            nearest_km: Some(40.0),
        });

        let assessment = assess(&snapshot);
        let labels: Vec<&str> = assessment.factors.iter().map(|f| f.label.as_str()).collect();
        // Geomagnetic before wildfire before flood, regardless of which
        // snapshot field was set first.
        assert_eq!(
            labels,
            vec!["Severe geomagnetic storm", "Wildfire nearby", "High flood risk"]
        );
    }

    #[test]
    fn error_status_domain_contributes_nothing() {
        let mut snapshot = empty_snapshot();
        snapshot.air_quality = SourceResult::error("upstream returned status 502");
        assert_eq!(assess(&snapshot).score, 0);
    }
}
