//! Upstream OpenWeather payload shapes.
//!
//! Everything below the top-level blocks defaults when absent so a sparse
//! payload normalizes to zeros instead of failing.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwMain {
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub pressure: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwCondition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwWind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwSys {
    #[serde(default)]
    pub country: Option<String>,
}

/// `/data/2.5/weather`
#[derive(Debug, Clone, Deserialize)]
pub struct OwCurrentResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: OwSys,
    pub main: OwMain,
    #[serde(default)]
    pub wind: OwWind,
    #[serde(default)]
    pub weather: Vec<OwCondition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastPeriod {
    pub dt: i64,
    #[serde(default)]
    pub main: OwMain,
    #[serde(default)]
    pub weather: Vec<OwCondition>,
}

/// `/data/2.5/forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastResponse {
    pub list: Vec<OwForecastPeriod>,
}

/// One element of the `/geo/1.0/reverse` array.
#[derive(Debug, Clone, Deserialize)]
pub struct OwPlace {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}
