//! Synthetic readings used when no credential exists or a fetch fails.

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    model::{ConditionCategory, ForecastEntry, WeatherSnapshot},
    visual::DEMO_ICON_CODE,
};

pub const HUMIDITY_RANGE: RangeInclusive<u8> = 50..=80;
pub const WIND_KMH_RANGE: RangeInclusive<i64> = 5..=35;
pub const PRESSURE_HPA_RANGE: RangeInclusive<i64> = 1000..=1050;
pub const FORECAST_TEMPERATURE_RANGE: RangeInclusive<i64> = 18..=25;
pub const FORECAST_LABELS: [&str; 5] = ["Now", "15:00", "18:00", "21:00", "00:00"];

const DEFAULT_DESCRIPTION: &str = "Partly cloudy";

struct CityProfile {
    temperature: i64,
    description: &'static str,
    category: ConditionCategory,
    icon: &'static str,
}

const DEFAULT_PROFILE: CityProfile = CityProfile {
    temperature: 20,
    description: DEFAULT_DESCRIPTION,
    category: ConditionCategory::Clouds,
    icon: DEMO_ICON_CODE,
};

fn profile_for(city: &str) -> CityProfile {
    match city {
        "London" => CityProfile {
            temperature: 15,
            description: "Cloudy with occasional rain",
            category: ConditionCategory::Rain,
            icon: "10d",
        },
        "Paris" => CityProfile {
            temperature: 18,
            description: "Partly cloudy",
            category: ConditionCategory::Clouds,
            icon: "02d",
        },
        "New York" => CityProfile {
            temperature: 20,
            description: "Sunny",
            category: ConditionCategory::Clear,
            icon: "01d",
        },
        "Tokyo" => CityProfile {
            temperature: 22,
            description: "Clear skies",
            category: ConditionCategory::Clear,
            icon: "01d",
        },
        _ => DEFAULT_PROFILE,
    }
}

/// Never fails. Random fields are uniform within the published ranges.
#[derive(Debug)]
pub struct DemoDataProvider {
    rng: StdRng,
}

impl Default for DemoDataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoDataProvider {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible provider for tests and screenshots.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn current_for(&mut self, city: &str) -> WeatherSnapshot {
        let profile = profile_for(city);

        WeatherSnapshot {
            location: city.to_string(),
            temperature: profile.temperature,
            feels_like: profile.temperature - 2,
            humidity: self.rng.random_range(HUMIDITY_RANGE),
            wind_kmh: self.rng.random_range(WIND_KMH_RANGE),
            pressure_hpa: self.rng.random_range(PRESSURE_HPA_RANGE),
            description: profile.description.to_string(),
            category: profile.category,
            icon: profile.icon.to_string(),
        }
    }

    /// The demo forecast does not depend on the city.
    pub fn forecast(&mut self) -> Vec<ForecastEntry> {
        FORECAST_LABELS
            .iter()
            .map(|label| ForecastEntry {
                label: (*label).to_string(),
                temperature: self.rng.random_range(FORECAST_TEMPERATURE_RANGE),
                category: ConditionCategory::Clouds,
                description: DEFAULT_DESCRIPTION.to_string(),
                icon: DEMO_ICON_CODE.to_string(),
            })
            .collect()
    }
}
