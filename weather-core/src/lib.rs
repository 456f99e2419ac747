//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration, the persisted key-value store and credential resolution
//! - The OpenWeather client and the payload normalizer
//! - Synthetic demo data used whenever live data is unavailable
//! - The dashboard controller that sequences fetch cycles into a render target
//!
//! It is used by `weather-dashboard`, but the controller only talks to traits,
//! so other hosts can drive it with their own store, prompt and renderer.

pub mod client;
pub mod config;
pub mod controller;
pub mod credential;
pub mod demo;
pub mod error;
pub mod model;
pub mod normalize;
pub mod payload;
pub mod render;
pub mod store;
pub mod visual;

pub use client::{OpenWeatherClient, WeatherClient};
pub use config::{DashboardConfig, ForecastMode};
pub use controller::{CycleOutcome, CyclePhase, DashboardController, FallbackReason, Geolocator};
pub use credential::{Credential, CredentialPrompt, CredentialResolver};
pub use demo::DemoDataProvider;
pub use error::{GeolocationError, WeatherError};
pub use model::{
    ConditionCategory, Coordinates, ForecastEntry, LocationQuery, Units, WeatherSnapshot,
};
pub use render::{CurrentSlots, ForecastCard, Notice, NoticeLevel, RenderTarget};
pub use store::{FileStore, KeyValueStore, MemoryStore};
