use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};
use tracing::{debug, instrument, warn};

use crate::{
    config::{DashboardConfig, ForecastMode},
    credential::Credential,
    error::WeatherError,
    model::{Coordinates, ForecastEntry, LocationQuery, Units, WeatherSnapshot},
    normalize::{location_label, normalize_current, normalize_forecast},
    payload::{OwCurrentResponse, OwForecastResponse, OwPlace},
};

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";
const REVERSE_GEOCODE_PATH: &str = "/geo/1.0/reverse";

/// Remote source of live weather. Implementations never retry and never
/// substitute data; falling back is the caller's job.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current(
        &self,
        query: &LocationQuery,
        credential: &Credential,
    ) -> Result<WeatherSnapshot, WeatherError>;

    async fn fetch_forecast(
        &self,
        query: &LocationQuery,
        credential: &Credential,
    ) -> Result<Vec<ForecastEntry>, WeatherError>;

    /// Place name for a position, if the service knows one.
    async fn reverse_geocode(
        &self,
        coords: Coordinates,
        credential: &Credential,
    ) -> Result<Option<String>, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    units: Units,
    forecast_mode: ForecastMode,
}

impl OpenWeatherClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            units: config.units,
            forecast_mode: config.forecast_mode,
        })
    }

    fn location_params(query: &LocationQuery) -> Vec<(&'static str, String)> {
        match query {
            // reqwest percent-encodes query values
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates(c) => {
                vec![("lat", c.latitude.to_string()), ("lon", c.longitude.to_string())]
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
        credential: &Credential,
    ) -> Result<T, WeatherError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending OpenWeather request");

        params.push(("appid", credential.as_str().to_string()));

        let res = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.without_url().to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Network(e.without_url().to_string()))?;

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                body = %truncate_body(&body),
                "OpenWeather request failed"
            );
            return Err(WeatherError::Remote {
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::Schema(e.to_string()))
    }

    fn unit_params(&self, query: &LocationQuery) -> Vec<(&'static str, String)> {
        let mut params = Self::location_params(query);
        params.push(("units", self.units.as_str().to_string()));
        params
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    #[instrument(skip(self, credential))]
    async fn fetch_current(
        &self,
        query: &LocationQuery,
        credential: &Credential,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let parsed: OwCurrentResponse =
            self.get_json(CURRENT_PATH, self.unit_params(query), credential).await?;

        Ok(normalize_current(&parsed, self.units))
    }

    #[instrument(skip(self, credential), fields(mode = ?self.forecast_mode))]
    async fn fetch_forecast(
        &self,
        query: &LocationQuery,
        credential: &Credential,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let parsed: OwForecastResponse =
            self.get_json(FORECAST_PATH, self.unit_params(query), credential).await?;

        Ok(normalize_forecast(&parsed, self.forecast_mode, &Local))
    }

    #[instrument(skip(self, credential))]
    async fn reverse_geocode(
        &self,
        coords: Coordinates,
        credential: &Credential,
    ) -> Result<Option<String>, WeatherError> {
        let mut params = Self::location_params(&LocationQuery::Coordinates(coords));
        params.push(("limit", "1".to_string()));

        let places: Vec<OwPlace> = self.get_json(REVERSE_GEOCODE_PATH, params, credential).await?;

        Ok(places
            .into_iter()
            .next()
            .filter(|place| !place.name.trim().is_empty())
            .map(|place| location_label(&place.name, place.country.as_deref())))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
