//! Route data model
//!
//! `RouteSuggestion` is both the result of one query and, once stamped with
//! a timestamp, a history entry. Wire names follow the JSON shape the
//! suggestion provider is asked to produce (`startPoint`, `suggestedBuses`,
//! `estimatedFare`, `travelTime`).

use serde::{Deserialize, Serialize};

/// The two supported languages. Governs both UI labels and the language
/// the provider is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Bengali
    #[default]
    Bn,
    /// English
    En,
}

impl Language {
    /// Locale code as used on the provider boundary and in message tables
    pub fn code(&self) -> &'static str {
        match self {
            Language::Bn => "bn",
            Language::En => "en",
        }
    }

    /// English name of the language, used inside the provider prompt
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Language::Bn => "Bengali",
            Language::En => "English",
        }
    }

    pub fn toggled(&self) -> Language {
        match self {
            Language::Bn => Language::En,
            Language::En => Language::Bn,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bn" => Ok(Language::Bn),
            "en" => Ok(Language::En),
            other => Err(format!("Unsupported language '{}': expected bn or en", other)),
        }
    }
}

/// One candidate bus line for a trip.
///
/// `start_point`/`end_point` are the absolute termini of the line, which may
/// lie beyond the queried origin and destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusDetail {
    pub name: String,
    pub start_point: String,
    pub end_point: String,
}

/// The result of one query.
///
/// Values are never mutated in place once built; `with_timestamp` returns a
/// new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSuggestion {
    pub from: String,
    pub to: String,
    pub suggested_buses: Vec<BusDetail>,
    pub distance: String,
    pub estimated_fare: String,
    pub travel_time: String,
    pub tips: String,
    /// Epoch milliseconds; present on history entries only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl RouteSuggestion {
    /// Copy of this suggestion stamped with `timestamp` (epoch millis)
    pub fn with_timestamp(&self, timestamp: i64) -> RouteSuggestion {
        RouteSuggestion {
            timestamp: Some(timestamp),
            ..self.clone()
        }
    }

    /// History identity: exact, case-sensitive `(from, to)`
    pub fn same_route(&self, other: &RouteSuggestion) -> bool {
        self.from == other.from && self.to == other.to
    }
}
