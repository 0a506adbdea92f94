//! End-to-end pipeline tests over stubbed sources and remote clients.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use skywarden::advisory::remote::{RemoteClient, RemoteError};
use skywarden::advisory::{AdvisoryGenerator, Provenance};
use skywarden::alert::{AlertRequest, AlertService};
use skywarden::config::{AdvisoryTuning, EndpointConfig, RadiusConfig, ResponseFormat};
use skywarden::domain::*;
use skywarden::risk::{self, Severity};
use skywarden::snapshot::Assembler;
use skywarden::sources::SourceProvider;

// ── Fixtures ────────────────────────────────────────────────────────

/// Source provider returning pre-baked per-domain results.
#[derive(Clone)]
struct FixtureSources {
    space_weather: SourceResult<SpaceWeatherReport>,
    seismic: SourceResult<SeismicReport>,
    wildfire: SourceResult<WildfireReport>,
    volcanic: SourceResult<VolcanicReport>,
    disaster_alerts: SourceResult<DisasterAlertReport>,
    weather: SourceResult<WeatherReport>,
    air_quality: SourceResult<AirQualityReport>,
    pollen: SourceResult<PollenReport>,
    flood: SourceResult<FloodReport>,
    marine: SourceResult<MarineReport>,
}

impl FixtureSources {
    fn all_unavailable() -> Self {
        Self {
            space_weather: SourceResult::unavailable("provider not configured"),
            seismic: SourceResult::unavailable("provider not configured"),
            wildfire: SourceResult::unavailable("provider not configured"),
            volcanic: SourceResult::unavailable("provider not configured"),
            disaster_alerts: SourceResult::unavailable("provider not configured"),
            weather: SourceResult::unavailable("provider not configured"),
            air_quality: SourceResult::unavailable("provider not configured"),
            pollen: SourceResult::unavailable("provider not configured"),
            flood: SourceResult::unavailable("provider not configured"),
            marine: SourceResult::unavailable("provider not configured"),
        }
    }

    /// All ten domains ok with neutral, benign values.
    fn benign() -> Self {
        Self {
            space_weather: SourceResult::ok(SpaceWeatherReport {
                kp_index: Some(1.7),
                xray_class: Some("B4".to_string()),
                solar_wind_speed_kms: Some(360.0),
                aurora_probability_pct: Some(2.0),
            }),
            seismic: SourceResult::ok(SeismicReport::default()),
            wildfire: SourceResult::ok(WildfireReport::default()),
            volcanic: SourceResult::ok(VolcanicReport::default()),
            disaster_alerts: SourceResult::ok(DisasterAlertReport::default()),
            weather: SourceResult::ok(WeatherReport {
                temperature_c: Some(19.0),
                feels_like_c: Some(18.5),
                humidity_pct: Some(55.0),
                wind_speed_kmh: Some(8.0),
                wind_gusts_kmh: Some(14.0),
                precipitation_mm: Some(0.0),
                cloud_cover_pct: Some(30.0),
                condition: Some("Mainly clear".to_string()),
            }),
            air_quality: SourceResult::ok(AirQualityReport {
                european_aqi: Some(15.0),
                pm2_5: Some(4.0),
                pm10: Some(8.0),
                ozone: Some(40.0),
                uv_index: Some(1.0),
            }),
            pollen: SourceResult::ok(PollenReport::default()),
            flood: SourceResult::ok(FloodReport::default()),
            marine: SourceResult::ok(MarineReport {
                wave_height_m: Some(0.3),
                wave_period_s: Some(4.0),
                swell_height_m: Some(0.2),
            }),
        }
    }
}

#[async_trait]
impl SourceProvider for FixtureSources {
    async fn space_weather(&self, _c: Coordinate) -> SourceResult<SpaceWeatherReport> {
        self.space_weather.clone()
    }
    async fn seismic(&self, _c: Coordinate, _r: f64) -> SourceResult<SeismicReport> {
        self.seismic.clone()
    }
    async fn wildfire(&self, _c: Coordinate, _r: f64) -> SourceResult<WildfireReport> {
        self.wildfire.clone()
    }
    async fn volcanic(&self, _c: Coordinate, _r: f64) -> SourceResult<VolcanicReport> {
        self.volcanic.clone()
    }
    async fn disaster_alerts(&self, _c: Coordinate, _r: f64) -> SourceResult<DisasterAlertReport> {
        self.disaster_alerts.clone()
    }
    async fn weather(&self, _c: Coordinate) -> SourceResult<WeatherReport> {
        self.weather.clone()
    }
    async fn air_quality(&self, _c: Coordinate) -> SourceResult<AirQualityReport> {
        self.air_quality.clone()
    }
    async fn pollen(&self, _c: Coordinate) -> SourceResult<PollenReport> {
        self.pollen.clone()
    }
    async fn flood(&self, _c: Coordinate) -> SourceResult<FloodReport> {
        self.flood.clone()
    }
    async fn marine(&self, _c: Coordinate) -> SourceResult<MarineReport> {
        self.marine.clone()
    }
}

/// Remote client scripted per attempt, counting invocations.
struct ScriptedRemote {
    outcomes: Vec<Result<String, ()>>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl RemoteClient for ScriptedRemote {
    async fn attempt(
        &self,
        _endpoint: &EndpointConfig,
        _prompt: &str,
    ) -> Result<String, RemoteError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcomes.get(index) {
            Some(Ok(text)) => Ok(text.clone()),
            _ => Err(RemoteError::EmptyText),
        }
    }
}

fn endpoint(id: &str) -> EndpointConfig {
    EndpointConfig {
        id: id.to_string(),
        url: format!("https://inference.example.com/{id}"),
        api_key: None,
        model: None,
        format: ResponseFormat::ChatCompletions,
        timeout_secs: 5,
        max_tokens: 128,
    }
}

fn service(
    sources: FixtureSources,
    outcomes: Vec<Result<String, ()>>,
    endpoints: Vec<EndpointConfig>,
) -> (
    AlertService<FixtureSources, ScriptedRemote>,
    Arc<AtomicUsize>,
) {
    let calls = Arc::new(AtomicUsize::new(0));
    let remote = ScriptedRemote {
        outcomes,
        calls: calls.clone(),
    };
    (
        AlertService::new(
            Assembler::new(Arc::new(sources), RadiusConfig::default()),
            AdvisoryGenerator::new(remote, endpoints, AdvisoryTuning::default()),
            47.3769,
            8.5417,
        ),
        calls,
    )
}

// ── End-to-end examples ─────────────────────────────────────────────

#[tokio::test]
async fn extreme_geomagnetic_storm_everything_else_dark() {
    let mut sources = FixtureSources::all_unavailable();
    sources.space_weather = SourceResult::ok(SpaceWeatherReport {
        kp_index: Some(8.0),
        ..Default::default()
    });

    let (service, _) = service(sources, vec![], vec![]);
    let response = service.build_alert(AlertRequest::default()).await.unwrap();

    assert!(
        matches!(response.risk.severity, Severity::High | Severity::Critical),
        "got {:?}",
        response.risk.severity
    );
    assert_eq!(response.risk.factors.len(), 1);
    assert!(response.risk.factors[0].label.to_lowercase().contains("storm"));

    // Scoring the same snapshot again yields an identical assessment.
    let again = risk::assess(&response.snapshot);
    assert_eq!(again, response.risk);
}

#[tokio::test]
async fn respiratory_profile_rule_based_advisory() {
    let mut sources = FixtureSources::all_unavailable();
    sources.air_quality = SourceResult::ok(AirQualityReport {
        european_aqi: Some(95.0),
        uv_index: Some(9.0),
        ..Default::default()
    });

    let (service, _) = service(sources, vec![], vec![]);
    let response = service
        .build_alert(AlertRequest {
            profile: Some("Asthma/Respiratory".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.advisory.provenance, Provenance::RuleBased);
    let text = &response.advisory.text;
    assert!(text.contains("Air quality is poor"), "text: {text}");
    assert!(text.contains("Very high UV index"), "text: {text}");
    let lower = text.to_lowercase();
    assert!(!lower.contains("earthquake"), "text: {text}");
    assert!(!lower.contains("seismic"), "text: {text}");
    assert!(!lower.contains("wildfire"), "text: {text}");
}

#[tokio::test]
async fn benign_day_scores_low_with_no_warnings() {
    let (service, _) = service(FixtureSources::benign(), vec![], vec![]);
    let response = service.build_alert(AlertRequest::default()).await.unwrap();

    assert_eq!(response.risk.severity, Severity::Low);
    assert_eq!(response.risk.score, 0);
    assert!(response.risk.factors.is_empty());

    let text = &response.advisory.text;
    assert!(text.contains("enjoy your day"), "text: {text}");
    let lower = text.to_lowercase();
    for token in ["wildfire", "seismic", "storm", "flood risk"] {
        assert!(!lower.contains(token), "unexpected '{token}' in: {text}");
    }
    // Summary mirrors the benign snapshot.
    assert_eq!(response.summary.temperature_c, Some(19.0));
    assert_eq!(response.summary.earthquakes_nearby, Some(0));
    assert_eq!(response.summary.european_aqi, Some(15.0));
}

// ── Cascade behavior through the full service ───────────────────────

#[tokio::test]
async fn remote_success_short_circuits_and_records_provenance() {
    let (service, calls) = service(
        FixtureSources::benign(),
        vec![Ok(
            "Quiet conditions today; a pleasant day for anything outdoors.".to_string()
        )],
        vec![endpoint("primary"), endpoint("secondary")],
    );
    let response = service.build_alert(AlertRequest::default()).await.unwrap();

    assert_eq!(
        response.advisory.provenance,
        Provenance::Remote("primary".to_string())
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1, "secondary must not be tried");
}

#[tokio::test]
async fn all_remotes_fail_masked_by_rule_based_fallback() {
    let (service, calls) = service(
        FixtureSources::benign(),
        vec![Err(()), Err(())],
        vec![endpoint("primary"), endpoint("secondary")],
    );
    let response = service.build_alert(AlertRequest::default()).await.unwrap();

    assert_eq!(response.advisory.provenance, Provenance::RuleBased);
    assert!(!response.advisory.text.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2, "each endpoint tried once");
}

#[tokio::test]
async fn question_is_answered_in_requested_language() {
    let (service, _) = service(FixtureSources::benign(), vec![], vec![]);
    let response = service
        .build_alert(AlertRequest {
            language: Some("de".to_string()),
            question: Some("Brauche ich heute Sonnencreme? uv".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.language, skywarden::Language::De);
    assert!(
        response.advisory.text.contains("UV-Index"),
        "text: {}",
        response.advisory.text
    );
}

#[tokio::test]
async fn snapshot_keeps_total_domain_coverage_in_response() {
    let (service, _) = service(FixtureSources::all_unavailable(), vec![], vec![]);
    let response = service.build_alert(AlertRequest::default()).await.unwrap();
    for domain in Domain::ALL {
        assert_eq!(response.snapshot.status_of(domain), "unavailable", "{domain:?}");
    }
    // Degraded output, not failure: risk and advisory still present.
    assert_eq!(response.risk.severity, Severity::Low);
    assert!(!response.advisory.text.is_empty());
}
