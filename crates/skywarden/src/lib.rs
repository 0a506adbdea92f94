//! Skywarden — environmental & space-weather alert engine.
//!
//! Ingests heterogeneous, unreliable third-party feeds (space weather,
//! seismic, wildfire, volcanic, disaster alerts, weather, air quality,
//! pollen, flood, marine) for a geographic point, reduces them to one
//! normalized snapshot, scores the combined hazard level, and emits a
//! short natural-language advisory tailored to an activity profile and
//! language.
//!
//! Pipeline: [`snapshot::Assembler`] fans out to the source adapters and
//! merges their best-effort results; [`risk::assess`] scores the snapshot
//! deterministically; [`advisory::AdvisoryGenerator`] tries a cascade of
//! remote generation endpoints and falls back to a rule-based compositor;
//! [`alert::AlertService`] composes the three into the externally-visible
//! response.

pub mod advisory;
pub mod alert;
pub mod api;
pub mod config;
pub mod domain;
pub mod geo;
pub mod locale;
pub mod risk;
pub mod snapshot;
pub mod sources;

pub use alert::{AlertError, AlertRequest, AlertResponse, AlertService, HttpAlertService};
pub use config::AppConfig;
pub use domain::{Coordinate, Domain, Snapshot, SourceResult};
pub use locale::Language;
pub use risk::{RiskAssessment, Severity};
