use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit system sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location ({:.1}, {:.1})", self.latitude, self.longitude)
    }
}

/// The active location: a free-text city or a device position.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Name used when the query has to be answered from demo data.
    pub fn demo_label(&self) -> String {
        match self {
            LocationQuery::City(name) => name.clone(),
            LocationQuery::Coordinates(coords) => coords.to_string(),
        }
    }
}

/// Coarse weather classification driving icon and background selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Other,
}

impl ConditionCategory {
    /// Parse the upstream `main` label ("Clear", "Clouds", ...).
    pub fn from_label(label: &str) -> Self {
        match label {
            "Clear" => ConditionCategory::Clear,
            "Clouds" => ConditionCategory::Clouds,
            "Rain" => ConditionCategory::Rain,
            "Drizzle" => ConditionCategory::Drizzle,
            "Thunderstorm" => ConditionCategory::Thunderstorm,
            "Snow" => ConditionCategory::Snow,
            "Mist" => ConditionCategory::Mist,
            "Fog" => ConditionCategory::Fog,
            _ => ConditionCategory::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionCategory::Clear => "Clear",
            ConditionCategory::Clouds => "Clouds",
            ConditionCategory::Rain => "Rain",
            ConditionCategory::Drizzle => "Drizzle",
            ConditionCategory::Thunderstorm => "Thunderstorm",
            ConditionCategory::Snow => "Snow",
            ConditionCategory::Mist => "Mist",
            ConditionCategory::Fog => "Fog",
            ConditionCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized current conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location: String,
    pub temperature: i64,
    pub feels_like: i64,
    /// Always within 0..=100.
    pub humidity: u8,
    pub wind_kmh: i64,
    pub pressure_hpa: i64,
    pub description: String,
    pub category: ConditionCategory,
    /// Upstream icon code, e.g. "01d".
    pub icon: String,
}

/// One forecast period or one aggregated day.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub label: String,
    pub temperature: i64,
    pub category: ConditionCategory,
    pub description: String,
    pub icon: String,
}
