use thiserror::Error;

/// Reasons a device position could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
}

/// Failures surfaced by a weather client. None of them is fatal: the
/// controller answers every one of them with demo data.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport-level failure (DNS, connect, timeout, offline).
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("weather service returned HTTP {status}")]
    Remote { status: u16 },

    /// The body did not decode as the expected payload.
    #[error("unexpected payload: {0}")]
    Schema(String),

    #[error("geolocation failed: {0}")]
    Geolocation(#[from] GeolocationError),
}

impl WeatherError {
    /// Short machine-friendly name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => "network",
            WeatherError::Remote { .. } => "remote",
            WeatherError::Schema(_) => "schema",
            WeatherError::Geolocation(_) => "geolocation",
        }
    }

    /// True when the service rejected the credential itself.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, WeatherError::Remote { status: 401 })
    }
}
