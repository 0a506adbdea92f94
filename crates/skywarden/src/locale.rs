//! Per-language string table with graceful fallback.
//!
//! Lookup order: requested language → English → the key itself, verbatim.
//! An empty entry counts as missing, so partially-translated languages
//! degrade per key instead of per language. Both the rule-based generator
//! and the prompt builder draw every user-facing phrase from here.

use serde::{Deserialize, Serialize};

/// Supported output languages. Unrecognized tags coerce to English.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    De,
    Fr,
    It,
}

impl Language {
    pub const DEFAULT: Language = Language::En;

    /// Parse a language tag, silently coercing unknown values to the
    /// default. Accepts bare tags ("de") and region-qualified ("de-CH").
    pub fn parse(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match primary.as_str() {
            "de" => Language::De,
            "fr" => Language::Fr,
            "it" => Language::It,
            _ => Language::En,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
            Language::Fr => "fr",
            Language::It => "it",
        }
    }
}

struct Entry {
    key: &'static str,
    en: &'static str,
    de: &'static str,
    fr: &'static str,
    it: &'static str,
}

// An empty string marks an untranslated entry; lookup() falls back to en.
#[rustfmt::skip]
static TABLE: &[Entry] = &[
    Entry { key: "language_name",
        en: "English", de: "Deutsch", fr: "Français", it: "Italiano" },
    Entry { key: "greeting",
        en: "Hello!",
        de: "Hallo!",
        fr: "Bonjour !",
        it: "Ciao!" },
    Entry { key: "conditions_summary",
        en: "Current conditions: {temp}°C, {condition}.",
        de: "Aktuelle Bedingungen: {temp}°C, {condition}.",
        fr: "Conditions actuelles : {temp}°C, {condition}.",
        it: "Condizioni attuali: {temp}°C, {condition}." },
    Entry { key: "conditions_unknown",
        en: "Current weather conditions are not available right now.",
        de: "Aktuelle Wetterdaten sind derzeit nicht verfügbar.",
        fr: "Les conditions météo actuelles ne sont pas disponibles.",
        it: "Le condizioni meteo attuali non sono disponibili." },
    Entry { key: "not_available",
        en: "not available",
        de: "nicht verfügbar",
        fr: "non disponible",
        it: "non disponibile" },

    // Warnings
    Entry { key: "warn_wildfire",
        en: "Wildfire activity nearby: {count} active fire(s) in the area. Follow local guidance.",
        de: "Waldbrände in der Nähe: {count} aktive(s) Feuer in der Region. Beachten Sie lokale Hinweise.",
        fr: "Feux de forêt à proximité : {count} incendie(s) actif(s). Suivez les consignes locales.",
        it: "Incendi nelle vicinanze: {count} incendi attivi nella zona. Seguire le indicazioni locali." },
    Entry { key: "warn_seismic",
        en: "Seismic activity: {count} recent earthquake(s) nearby, strongest M{magnitude}.",
        de: "Seismische Aktivität: {count} Erdbeben in der Nähe, stärkstes M{magnitude}.",
        fr: "Activité sismique : {count} séisme(s) récent(s) à proximité, le plus fort M{magnitude}.",
        it: "Attività sismica: {count} terremoti recenti nelle vicinanze, il più forte M{magnitude}." },
    Entry { key: "warn_storm",
        en: "Severe geomagnetic storm in progress (Kp {kp}). GPS and radio may be degraded.",
        de: "Schwerer geomagnetischer Sturm (Kp {kp}). GPS und Funk können gestört sein.",
        fr: "Forte tempête géomagnétique en cours (Kp {kp}). GPS et radio peuvent être perturbés.",
        it: "Forte tempesta geomagnetica in corso (Kp {kp}). GPS e radio potrebbero essere disturbati." },
    Entry { key: "warn_air_quality",
        en: "Air quality is poor (AQI {aqi}). Limit outdoor exertion.",
        de: "Die Luftqualität ist schlecht (AQI {aqi}). Anstrengung im Freien vermeiden.",
        fr: "La qualité de l'air est mauvaise (AQI {aqi}). Limitez les efforts en extérieur.",
        it: "La qualità dell'aria è scarsa (AQI {aqi}). Limitare gli sforzi all'aperto." },
    Entry { key: "warn_uv",
        en: "Very high UV index ({uv}). Avoid midday sun and use SPF 50+.",
        de: "Sehr hoher UV-Index ({uv}). Mittagssonne meiden und LSF 50+ verwenden.",
        fr: "Indice UV très élevé ({uv}). Évitez le soleil de midi et utilisez un SPF 50+.",
        it: "Indice UV molto alto ({uv}). Evitare il sole di mezzogiorno e usare SPF 50+." },
    Entry { key: "warn_flood",
        en: "Elevated river flood risk: {risk}. Keep clear of riverbanks.",
        de: "Erhöhtes Hochwasserrisiko: {risk}. Flussufer meiden.",
        fr: "Risque de crue élevé : {risk}. Tenez-vous à l'écart des berges.",
        it: "Rischio di piena elevato: {risk}. Stare lontani dagli argini." },

    // Tips
    Entry { key: "tip_aurora",
        en: "Aurora may be visible tonight (Kp {kp}) - find a dark sky after midnight.",
        de: "Polarlichter sind heute Nacht möglich (Kp {kp}) - dunklen Himmel nach Mitternacht suchen.",
        fr: "Des aurores sont possibles cette nuit (Kp {kp}) - cherchez un ciel sombre après minuit.",
        it: "Possibili aurore stanotte (Kp {kp}) - cercare un cielo buio dopo mezzanotte." },
    Entry { key: "tip_sunscreen",
        en: "UV index {uv}: sunglasses and SPF 30+ recommended.",
        de: "UV-Index {uv}: Sonnenbrille und LSF 30+ empfohlen.",
        fr: "Indice UV {uv} : lunettes de soleil et SPF 30+ recommandés.",
        it: "Indice UV {uv}: occhiali da sole e SPF 30+ consigliati." },
    Entry { key: "tip_air_sensitive",
        en: "Air quality is {category}; sensitive groups should keep medication at hand.",
        de: "Luftqualität ist {category}; empfindliche Personen sollten Medikamente bereithalten.",
        fr: "Qualité de l'air {category} ; les personnes sensibles doivent garder leur traitement à portée.",
        it: "" },
    Entry { key: "tip_humidifier",
        en: "Indoor air is dry ({humidity}% humidity) - a humidifier can help.",
        de: "Die Raumluft ist trocken ({humidity}% Luftfeuchtigkeit) - ein Luftbefeuchter kann helfen.",
        fr: "L'air est sec ({humidity}% d'humidité) - un humidificateur peut aider.",
        it: "" },
    Entry { key: "tip_dehumidifier",
        en: "Humidity is high ({humidity}%) - a dehumidifier keeps indoor air comfortable.",
        de: "Hohe Luftfeuchtigkeit ({humidity}%) - ein Luftentfeuchter sorgt für angenehme Raumluft.",
        fr: "Humidité élevée ({humidity}%) - un déshumidificateur garde l'air intérieur agréable.",
        it: "" },
    Entry { key: "tip_calm_sea",
        en: "Sea state is {state} - good conditions on the water.",
        de: "Seegang: {state} - gute Bedingungen auf dem Wasser.",
        fr: "État de la mer : {state} - bonnes conditions en mer.",
        it: "" },
    Entry { key: "tip_outdoor",
        en: "Pleasant conditions for outdoor activity.",
        de: "Angenehme Bedingungen für Aktivitäten im Freien.",
        fr: "Conditions agréables pour les activités en plein air.",
        it: "Condizioni piacevoli per le attività all'aperto." },
    Entry { key: "enjoy_day",
        en: "No environmental concerns for your area - enjoy your day!",
        de: "Keine Umweltgefahren in Ihrer Region - geniessen Sie den Tag!",
        fr: "Aucun risque environnemental dans votre région - profitez de votre journée !",
        it: "Nessun rischio ambientale nella tua zona - goditi la giornata!" },

    // Question-intent answers
    Entry { key: "answer_exercise_good",
        en: "Conditions look good for outdoor exercise: {temp}°C, {condition}.",
        de: "Gute Bedingungen für Sport im Freien: {temp}°C, {condition}.",
        fr: "Bonnes conditions pour le sport en extérieur : {temp}°C, {condition}.",
        it: "Buone condizioni per l'attività all'aperto: {temp}°C, {condition}." },
    Entry { key: "answer_exercise_bad",
        en: "Outdoor exercise is not ideal right now: {reason}.",
        de: "Sport im Freien ist derzeit nicht ideal: {reason}.",
        fr: "Le sport en extérieur n'est pas idéal pour le moment : {reason}.",
        it: "" },
    Entry { key: "answer_uv",
        en: "The UV index is currently {uv} ({category}).",
        de: "Der UV-Index liegt derzeit bei {uv} ({category}).",
        fr: "L'indice UV est actuellement de {uv} ({category}).",
        it: "L'indice UV è attualmente {uv} ({category})." },
    Entry { key: "answer_aurora_yes",
        en: "Good aurora chances: Kp is {kp}. Get away from city lights after midnight.",
        de: "Gute Chancen auf Polarlichter: Kp liegt bei {kp}. Nach Mitternacht Stadtlichter meiden.",
        fr: "Bonnes chances d'aurores : Kp est à {kp}. Éloignez-vous des lumières après minuit.",
        it: "Buone probabilità di aurora: Kp è {kp}. Allontanarsi dalle luci dopo mezzanotte." },
    Entry { key: "answer_aurora_no",
        en: "Aurora is unlikely: Kp is {kp}, below the visibility threshold of {threshold}.",
        de: "Polarlichter sind unwahrscheinlich: Kp liegt bei {kp}, unter der Sichtbarkeitsschwelle von {threshold}.",
        fr: "Les aurores sont improbables : Kp est à {kp}, sous le seuil de visibilité de {threshold}.",
        it: "Aurora improbabile: Kp è {kp}, sotto la soglia di visibilità di {threshold}." },
    Entry { key: "answer_air",
        en: "The air quality index is {aqi} ({category}).",
        de: "Der Luftqualitätsindex liegt bei {aqi} ({category}).",
        fr: "L'indice de qualité de l'air est de {aqi} ({category}).",
        it: "L'indice di qualità dell'aria è {aqi} ({category})." },

    // Flood risk labels
    Entry { key: "flood_moderate", en: "moderate", de: "erhöht",  fr: "modéré", it: "moderato" },
    Entry { key: "flood_high",     en: "high",     de: "hoch",    fr: "élevé",  it: "alto" },

    // AQI category labels
    Entry { key: "aqi_good",      en: "good",        de: "gut",          fr: "bon",        it: "buona" },
    Entry { key: "aqi_fair",      en: "fair",        de: "mässig",       fr: "correct",    it: "discreta" },
    Entry { key: "aqi_moderate",  en: "moderate",    de: "mittel",       fr: "moyen",      it: "moderata" },
    Entry { key: "aqi_poor",      en: "poor",        de: "schlecht",     fr: "mauvais",    it: "scarsa" },
    Entry { key: "aqi_very_poor", en: "very poor",   de: "sehr schlecht", fr: "très mauvais", it: "molto scarsa" },
    Entry { key: "aqi_hazardous", en: "hazardous",   de: "gefährlich",   fr: "dangereux",  it: "pericolosa" },

    // UV category labels
    Entry { key: "uv_low",       en: "low",       de: "niedrig",   fr: "faible",     it: "basso" },
    Entry { key: "uv_moderate",  en: "moderate",  de: "mittel",    fr: "modéré",     it: "moderato" },
    Entry { key: "uv_high",      en: "high",      de: "hoch",      fr: "élevé",      it: "alto" },
    Entry { key: "uv_very_high", en: "very high", de: "sehr hoch", fr: "très élevé", it: "molto alto" },
    Entry { key: "uv_extreme",   en: "extreme",   de: "extrem",    fr: "extrême",    it: "estremo" },
];

/// Look up a phrase for a language. Never raises, never returns empty:
/// falls back to English, then to the key itself.
pub fn lookup(language: Language, key: &str) -> String {
    let Some(entry) = TABLE.iter().find(|e| e.key == key) else {
        return key.to_string();
    };
    let localized = match language {
        Language::En => entry.en,
        Language::De => entry.de,
        Language::Fr => entry.fr,
        Language::It => entry.it,
    };
    if !localized.is_empty() {
        localized.to_string()
    } else if !entry.en.is_empty() {
        entry.en.to_string()
    } else {
        key.to_string()
    }
}

/// Substitute `{name}` placeholders in a template.
pub fn fill(template: &str, substitutions: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in substitutions {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
