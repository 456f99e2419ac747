//! Fetch-cycle orchestration.
//!
//! Every cycle takes a sequence number before its first await. A result is
//! rendered unless a newer cycle has already rendered, so concurrent cycles
//! settle on the most recently started one that completed.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    client::WeatherClient,
    config::DashboardConfig,
    credential::Credential,
    demo::DemoDataProvider,
    error::{GeolocationError, WeatherError},
    model::{Coordinates, ForecastEntry, LocationQuery, Units, WeatherSnapshot},
    render::{CurrentSlots, ForecastCard, Notice, RenderTarget},
};

/// Device position source.
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Loading,
    Success,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoCredential,
    FetchFailed { kind: &'static str },
}

impl FallbackReason {
    fn notice(&self) -> Notice {
        match self {
            FallbackReason::NoCredential => {
                Notice::info("Running in demo mode. Add API key for real weather data.")
            }
            FallbackReason::FetchFailed { .. } => {
                Notice::error("Could not fetch real weather. Using demo data.")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Live,
    Fallback(FallbackReason),
    /// A newer cycle had already rendered; this result was dropped.
    Stale,
}

enum Fetched {
    Live(WeatherSnapshot, Vec<ForecastEntry>),
    NoCredential,
    Failed(WeatherError),
}

struct DashboardState<R> {
    query: LocationQuery,
    credential: Option<Credential>,
    snapshot: Option<WeatherSnapshot>,
    forecast: Vec<ForecastEntry>,
    last_updated: Option<DateTime<Local>>,
    rendered_seq: u64,
    phase: CyclePhase,
    demo: DemoDataProvider,
    render: R,
}

pub struct DashboardController<C, R> {
    client: C,
    units: Units,
    default_city: String,
    next_seq: AtomicU64,
    state: Mutex<DashboardState<R>>,
}

impl<C: fmt::Debug, R> fmt::Debug for DashboardController<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardController")
            .field("client", &self.client)
            .field("units", &self.units)
            .field("default_city", &self.default_city)
            .field("next_seq", &self.next_seq)
            .finish_non_exhaustive()
    }
}

impl<C, R> DashboardController<C, R>
where
    C: WeatherClient,
    R: RenderTarget,
{
    pub fn new(
        client: C,
        render: R,
        config: &DashboardConfig,
        credential: Option<Credential>,
    ) -> Self {
        Self::with_demo(client, render, config, credential, DemoDataProvider::new())
    }

    pub fn with_demo(
        client: C,
        render: R,
        config: &DashboardConfig,
        credential: Option<Credential>,
        demo: DemoDataProvider,
    ) -> Self {
        Self {
            client,
            units: config.units,
            default_city: config.default_city.clone(),
            next_seq: AtomicU64::new(0),
            state: Mutex::new(DashboardState {
                query: LocationQuery::City(config.default_city.clone()),
                credential,
                snapshot: None,
                forecast: Vec::new(),
                last_updated: None,
                rendered_seq: 0,
                phase: CyclePhase::Idle,
                demo,
                render,
            }),
        }
    }

    /// Initial load for the default city.
    pub async fn start(&self) -> CycleOutcome {
        info!(city = %self.default_city, "Starting weather dashboard");
        self.run_cycle(LocationQuery::City(self.default_city.clone())).await
    }

    /// New cycle for a typed city. Blank input is ignored.
    pub async fn search(&self, city: &str) -> Option<CycleOutcome> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }
        Some(self.run_cycle(LocationQuery::City(city.to_string())).await)
    }

    /// Re-run the active query, e.g. from a periodic timer.
    pub async fn refresh(&self) -> CycleOutcome {
        let query = self.state.lock().await.query.clone();
        self.run_cycle(query).await
    }

    /// Locate the device and load weather there. Any location failure falls
    /// back to the default city.
    pub async fn use_geolocation(&self, geolocator: &dyn Geolocator) -> CycleOutcome {
        self.notify(Notice::info("Getting your location...")).await;

        let query = match geolocator.locate().await {
            Ok(coords) => self.place_query(coords).await,
            Err(e) => {
                warn!(error = %WeatherError::from(e), "Geolocation failed, using default city");
                self.notify(Notice::error(format!("Location error: {e}"))).await;
                LocationQuery::City(self.default_city.clone())
            }
        };

        self.run_cycle(query).await
    }

    /// Install or clear the credential. Installing one reloads the active
    /// query straight away; clearing it takes effect from the next cycle.
    pub async fn set_credential(&self, credential: Option<Credential>) -> Option<CycleOutcome> {
        {
            let mut state = self.state.lock().await;
            let installed = credential.is_some();
            state.credential = credential;
            if !installed {
                return None;
            }
            state.render.notify(&Notice::success("API key saved! Loading real weather data..."));
        }

        Some(self.refresh().await)
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn has_credential(&self) -> bool {
        self.state.lock().await.credential.is_some()
    }

    pub async fn snapshot(&self) -> Option<WeatherSnapshot> {
        self.state.lock().await.snapshot.clone()
    }

    pub async fn forecast(&self) -> Vec<ForecastEntry> {
        self.state.lock().await.forecast.clone()
    }

    pub async fn last_updated(&self) -> Option<DateTime<Local>> {
        self.state.lock().await.last_updated
    }

    pub async fn phase(&self) -> CyclePhase {
        self.state.lock().await.phase
    }

    pub async fn query(&self) -> LocationQuery {
        self.state.lock().await.query.clone()
    }

    async fn notify(&self, notice: Notice) {
        self.state.lock().await.render.notify(&notice);
    }

    /// Reverse-geocode when possible so the query carries a place name.
    async fn place_query(&self, coords: Coordinates) -> LocationQuery {
        let credential = self.state.lock().await.credential.clone();
        let Some(credential) = credential else {
            return LocationQuery::Coordinates(coords);
        };

        match self.client.reverse_geocode(coords, &credential).await {
            Ok(Some(place)) => {
                debug!(place = %place, "Resolved position to place");
                LocationQuery::City(place)
            }
            Ok(None) => LocationQuery::Coordinates(coords),
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed, querying by coordinates");
                LocationQuery::Coordinates(coords)
            }
        }
    }

    #[instrument(skip(self), fields(seq = tracing::field::Empty))]
    async fn run_cycle(&self, query: LocationQuery) -> CycleOutcome {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("seq", seq);

        let credential = {
            let mut state = self.state.lock().await;
            state.query = query.clone();
            state.phase = CyclePhase::Loading;
            state.credential.clone()
        };

        let fetched = match credential {
            None => Fetched::NoCredential,
            Some(credential) => {
                let live = tokio::try_join!(
                    self.client.fetch_current(&query, &credential),
                    self.client.fetch_forecast(&query, &credential),
                );
                match live {
                    Ok((snapshot, forecast)) => Fetched::Live(snapshot, forecast),
                    Err(e) => Fetched::Failed(e),
                }
            }
        };

        self.apply(seq, &query, fetched).await
    }

    async fn apply(&self, seq: u64, query: &LocationQuery, fetched: Fetched) -> CycleOutcome {
        let mut state = self.state.lock().await;

        if seq < state.rendered_seq {
            debug!(seq, rendered = state.rendered_seq, "Discarding stale result");
            return CycleOutcome::Stale;
        }

        let (snapshot, forecast, outcome) = match fetched {
            Fetched::Live(snapshot, forecast) => (snapshot, forecast, CycleOutcome::Live),
            Fetched::NoCredential => {
                let (snapshot, forecast) = demo_reading(&mut state.demo, query);
                (snapshot, forecast, CycleOutcome::Fallback(FallbackReason::NoCredential))
            }
            Fetched::Failed(e) => {
                warn!(kind = e.kind(), error = %e, "Weather fetch failed, using demo data");
                if e.is_unauthorized() {
                    warn!("API key rejected, dropping it for this session");
                    state.credential = None;
                }
                let (snapshot, forecast) = demo_reading(&mut state.demo, query);
                let reason = FallbackReason::FetchFailed { kind: e.kind() };
                (snapshot, forecast, CycleOutcome::Fallback(reason))
            }
        };

        let now = Local::now();
        let slots = CurrentSlots::from_snapshot(&snapshot, self.units);
        let cards: Vec<_> =
            forecast.iter().map(|entry| ForecastCard::from_entry(entry, self.units)).collect();

        state.render.show_current(&slots);
        state.render.show_forecast(&cards);
        state.render.show_last_updated(now);
        match outcome {
            CycleOutcome::Fallback(reason) => state.render.notify(&reason.notice()),
            _ => state.render.notify(&Notice::success("Real weather data loaded!")),
        }

        state.snapshot = Some(snapshot);
        state.forecast = forecast;
        state.last_updated = Some(now);
        state.rendered_seq = seq;
        state.phase = match outcome {
            CycleOutcome::Live => CyclePhase::Success,
            _ => CyclePhase::Fallback,
        };

        info!(seq, outcome = ?outcome, location = %slots.city, "Fetch cycle rendered");
        outcome
    }
}

fn demo_reading(
    demo: &mut DemoDataProvider,
    query: &LocationQuery,
) -> (WeatherSnapshot, Vec<ForecastEntry>) {
    let label = query.demo_label();
    debug!(location = %label, "Using demo data");
    (demo.current_for(&label), demo.forecast())
}
