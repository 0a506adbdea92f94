//! Advisory generation: prompt construction, the remote cascade, and the
//! deterministic rule-based fallback.
//!
//! Remote generation is a quality enhancement, never a required path: the
//! cascade tries each configured endpoint once in order, short-circuits on
//! the first usable text, and otherwise hands over to the rule-based
//! generator — so `generate` always returns some appropriate text.

pub mod fallback;
pub mod prompt;
pub mod remote;

use serde::{Deserialize, Serialize};

use crate::config::{AdvisoryTuning, EndpointConfig};
use crate::domain::Snapshot;
use crate::locale::Language;
use remote::RemoteClient;

/// Remote text shorter than this is treated as a failed attempt.
const MIN_USABLE_LEN: usize = 20;

/// Activity emphasis recognized from the free-form profile tag. Unknown
/// tags fall back to the general-public emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Outdoor,
    Respiratory,
    Aviation,
    Aurora,
    Marine,
    General,
}

impl ProfileKind {
    pub fn from_tag(tag: &str) -> Self {
        let t = tag.to_ascii_lowercase();
        if t.contains("pilot") || t.contains("aviation") || t.contains("drone") {
            ProfileKind::Aviation
        } else if t.contains("aurora") || t.contains("northern lights") {
            ProfileKind::Aurora
        } else if t.contains("asthma") || t.contains("respiratory") || t.contains("allergy") {
            ProfileKind::Respiratory
        } else if t.contains("outdoor") || t.contains("sport") || t.contains("hiking") {
            ProfileKind::Outdoor
        } else if t.contains("marine") || t.contains("sailing") || t.contains("boat") {
            ProfileKind::Marine
        } else {
            ProfileKind::General
        }
    }

    /// Profile description injected into the generation prompt.
    pub fn context(&self) -> &'static str {
        match self {
            ProfileKind::Aviation => {
                "a pilot; emphasize geomagnetic activity, solar flares, radio/GPS \
                 degradation, and severe weather"
            }
            ProfileKind::Aurora => {
                "an aurora hunter; emphasize Kp index, aurora probability, and \
                 viewing conditions"
            }
            ProfileKind::Respiratory => {
                "a person with respiratory sensitivity; emphasize air quality, \
                 pollen, and whether outdoor activity is advisable"
            }
            ProfileKind::Outdoor => {
                "an outdoor athlete; emphasize UV, air quality, weather, and any \
                 nearby hazards"
            }
            ProfileKind::Marine => {
                "a sailor; emphasize sea state, wind, and GPS reliability"
            }
            ProfileKind::General => {
                "a member of the general public; mention only what matters today"
            }
        }
    }
}

/// Which generator produced an advisory's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// A remote endpoint, identified by its configured id.
    Remote(String),
    RuleBased,
}

impl Provenance {
    pub fn as_str(&self) -> &str {
        match self {
            Provenance::Remote(id) => id,
            Provenance::RuleBased => "rule-based",
        }
    }
}

impl Serialize for Provenance {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provenance {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(if s == "rule-based" {
            Provenance::RuleBased
        } else {
            Provenance::Remote(s)
        })
    }
}

/// The generated advisory plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub text: String,
    pub language: Language,
    pub profile: String,
    pub provenance: Provenance,
}

/// Per-request advisory pipeline over a remote client seam.
pub struct AdvisoryGenerator<C> {
    remote: C,
    endpoints: Vec<EndpointConfig>,
    tuning: AdvisoryTuning,
}

impl<C: RemoteClient> AdvisoryGenerator<C> {
    pub fn new(remote: C, endpoints: Vec<EndpointConfig>, tuning: AdvisoryTuning) -> Self {
        Self {
            remote,
            endpoints,
            tuning,
        }
    }

    /// Generate an advisory. Total: the rule-based path cannot fail.
    pub async fn generate(
        &self,
        snapshot: &Snapshot,
        profile: &str,
        language: Language,
        question: Option<&str>,
    ) -> Advisory {
        let rendered_prompt = prompt::build_prompt(snapshot, profile, language, question);

        for endpoint in &self.endpoints {
            match self.remote.attempt(endpoint, &rendered_prompt).await {
                Ok(text) => {
                    let text = text.trim().to_string();
                    if text.len() >= MIN_USABLE_LEN {
                        log::info!("[ADVISORY] endpoint '{}' produced the advisory", endpoint.id);
                        return Advisory {
                            text,
                            language,
                            profile: profile.to_string(),
                            provenance: Provenance::Remote(endpoint.id.clone()),
                        };
                    }
                    log::warn!(
                        "[ADVISORY] endpoint '{}' returned text below {} chars, trying next",
                        endpoint.id,
                        MIN_USABLE_LEN
                    );
                }
                Err(e) => {
                    log::warn!("[ADVISORY] endpoint '{}' failed: {}, trying next", endpoint.id, e);
                }
            }
        }

        let text = fallback::compose(
            snapshot,
            ProfileKind::from_tag(profile),
            language,
            question,
            &self.tuning,
        );
        Advisory {
            text,
            language,
            profile: profile.to_string(),
            provenance: Provenance::RuleBased,
        }
    }
}
