//! Snapshot assembly: fan out to the source adapters, fan back in.
//!
//! Every adapter call runs in its own spawned task, so a panicking or
//! failing adapter degrades only its own domain — the other domains
//! always assemble. There is no ordering between domains; the snapshot
//! is a fixed mapping, total over all domains by construction.

use chrono::Utc;
use std::future::Future;
use std::sync::Arc;

use crate::config::RadiusConfig;
use crate::domain::{Coordinate, Domain, Snapshot, SourceResult};
use crate::sources::SourceProvider;

/// Builds one [`Snapshot`] per alert request.
pub struct Assembler<P> {
    provider: Arc<P>,
    radii: RadiusConfig,
}

impl<P: SourceProvider> Assembler<P> {
    pub fn new(provider: Arc<P>, radii: RadiusConfig) -> Self {
        Self { provider, radii }
    }

    /// Fetch every requested domain concurrently and merge the results.
    ///
    /// Domains not listed in `requested` are marked unavailable without
    /// being attempted. This never fails: the worst case is a snapshot
    /// where every domain carries an error status.
    pub async fn assemble(&self, coordinate: Coordinate, requested: &[Domain]) -> Snapshot {
        let want = |domain: Domain| requested.contains(&domain);
        let p = &self.provider;
        let radii = &self.radii;

        let (
            space_weather,
            seismic,
            wildfire,
            volcanic,
            disaster_alerts,
            weather,
            air_quality,
            pollen,
            flood,
            marine,
        ) = tokio::join!(
            isolated(want(Domain::SpaceWeather), {
                let p = p.clone();
                async move { p.space_weather(coordinate).await }
            }),
            isolated(want(Domain::Seismic), {
                let p = p.clone();
                let radius = radii.seismic_km;
                async move { p.seismic(coordinate, radius).await }
            }),
            isolated(want(Domain::Wildfire), {
                let p = p.clone();
                let radius = radii.wildfire_km;
                async move { p.wildfire(coordinate, radius).await }
            }),
            isolated(want(Domain::Volcanic), {
                let p = p.clone();
                let radius = radii.volcanic_km;
                async move { p.volcanic(coordinate, radius).await }
            }),
            isolated(want(Domain::DisasterAlerts), {
                let p = p.clone();
                let radius = radii.disaster_alerts_km;
                async move { p.disaster_alerts(coordinate, radius).await }
            }),
            isolated(want(Domain::Weather), {
                let p = p.clone();
                async move { p.weather(coordinate).await }
            }),
            isolated(want(Domain::AirQuality), {
                let p = p.clone();
                async move { p.air_quality(coordinate).await }
            }),
            isolated(want(Domain::Pollen), {
                let p = p.clone();
                async move { p.pollen(coordinate).await }
            }),
            isolated(want(Domain::Flood), {
                let p = p.clone();
                async move { p.flood(coordinate).await }
            }),
            isolated(want(Domain::Marine), {
                let p = p.clone();
                async move { p.marine(coordinate).await }
            }),
        );

        Snapshot {
            coordinate,
            captured_at: Utc::now(),
            space_weather,
            seismic,
            wildfire,
            volcanic,
            disaster_alerts,
            weather,
            air_quality,
            pollen,
            flood,
            marine,
        }
    }
}

/// Run one adapter call in its own task, converting a panic into an
/// error-status result for that domain only.
async fn isolated<T, F>(requested: bool, fut: F) -> SourceResult<T>
where
    F: Future<Output = SourceResult<T>> + Send + 'static,
    T: Send + 'static,
{
    if !requested {
        return SourceResult::unavailable("not requested");
    }
    match tokio::spawn(fut).await {
        Ok(result) => result,
        Err(e) => {
            log::warn!("[ASSEMBLE] adapter task failed: {e}");
            SourceResult::error(format!("adapter task failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;
    use async_trait::async_trait;

    /// Stub provider: benign values everywhere, with an optional
    /// panicking wildfire adapter.
    struct StubSources {
        panic_on_wildfire: bool,
    }

    #[async_trait]
    impl SourceProvider for StubSources {
        async fn space_weather(&self, _c: Coordinate) -> SourceResult<SpaceWeatherReport> {
            SourceResult::ok(SpaceWeatherReport {
                kp_index: Some(2.0),
                ..Default::default()
            })
        }

        async fn seismic(&self, _c: Coordinate, radius_km: f64) -> SourceResult<SeismicReport> {
            assert_eq!(radius_km, 500.0, "default seismic radius");
            SourceResult::ok(SeismicReport::default())
        }

        async fn wildfire(&self, _c: Coordinate, _r: f64) -> SourceResult<WildfireReport> {
            if self.panic_on_wildfire {
                panic!("wildfire adapter exploded");
            }
            SourceResult::ok(WildfireReport::default())
        }

        async fn volcanic(&self, _c: Coordinate, _r: f64) -> SourceResult<VolcanicReport> {
            SourceResult::ok(VolcanicReport::default())
        }

        async fn disaster_alerts(
            &self,
            _c: Coordinate,
            _r: f64,
        ) -> SourceResult<DisasterAlertReport> {
            SourceResult::ok(DisasterAlertReport::default())
        }

        async fn weather(&self, _c: Coordinate) -> SourceResult<WeatherReport> {
            SourceResult::ok(WeatherReport {
                temperature_c: Some(18.0),
                ..Default::default()
            })
        }

        async fn air_quality(&self, _c: Coordinate) -> SourceResult<AirQualityReport> {
            SourceResult::ok(AirQualityReport {
                european_aqi: Some(15.0),
                ..Default::default()
            })
        }

        async fn pollen(&self, _c: Coordinate) -> SourceResult<PollenReport> {
            SourceResult::ok(PollenReport::default())
        }

        async fn flood(&self, _c: Coordinate) -> SourceResult<FloodReport> {
            SourceResult::ok(FloodReport::default())
        }

        async fn marine(&self, _c: Coordinate) -> SourceResult<MarineReport> {
            SourceResult::unavailable("location not near a coast")
        }
    }

    fn assembler(panic_on_wildfire: bool) -> Assembler<StubSources> {
        Assembler::new(
            Arc::new(StubSources { panic_on_wildfire }),
            RadiusConfig::default(),
        )
    }

    fn zurich() -> Coordinate {
        Coordinate::new(47.3769, 8.5417).unwrap()
    }

    #[tokio::test]
    async fn assembles_all_requested_domains() {
        let snapshot = assembler(false).assemble(zurich(), &Domain::ALL).await;
        assert!(snapshot.space_weather.is_ok());
        assert!(snapshot.weather.is_ok());
        assert_eq!(snapshot.marine.status_name(), "unavailable");
        assert_eq!(snapshot.coordinate, zurich());
    }

    #[tokio::test]
    async fn panicking_adapter_degrades_only_its_domain() {
        let snapshot = assembler(true).assemble(zurich(), &Domain::ALL).await;
        assert_eq!(snapshot.wildfire.status_name(), "error");
        // All other domains are unaffected.
        assert!(snapshot.space_weather.is_ok());
        assert!(snapshot.seismic.is_ok());
        assert!(snapshot.volcanic.is_ok());
        assert!(snapshot.disaster_alerts.is_ok());
        assert!(snapshot.weather.is_ok());
        assert!(snapshot.air_quality.is_ok());
        assert!(snapshot.pollen.is_ok());
        assert!(snapshot.flood.is_ok());
    }

    #[tokio::test]
    async fn unrequested_domains_are_marked_not_requested() {
        let requested = [Domain::Weather, Domain::AirQuality];
        let snapshot = assembler(false).assemble(zurich(), &requested).await;
        assert!(snapshot.weather.is_ok());
        assert!(snapshot.air_quality.is_ok());
        match &snapshot.seismic {
            SourceResult::Unavailable { reason } => assert_eq!(reason, "not requested"),
            other => panic!("expected Unavailable, got {other:?}"),
        }
        // Total coverage holds even for a narrow request.
        for domain in Domain::ALL {
            assert_ne!(snapshot.status_of(domain), "", "{domain:?}");
        }
    }
}
