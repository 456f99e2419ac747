//! Pure mapping from upstream payloads to [`WeatherSnapshot`] and [`ForecastEntry`].

use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::config::ForecastMode;
use crate::model::{ConditionCategory, ForecastEntry, Units, WeatherSnapshot};
use crate::payload::{OwCondition, OwCurrentResponse, OwForecastPeriod, OwForecastResponse};

/// Maximum number of forecast entries in either mode.
pub const FORECAST_LIMIT: usize = 5;

const MPS_TO_KMH: f64 = 3.6;
const MPH_TO_KMH: f64 = 1.609_344;

pub fn normalize_current(payload: &OwCurrentResponse, units: Units) -> WeatherSnapshot {
    let (category, description, icon) = condition_fields(payload.weather.first());

    WeatherSnapshot {
        location: location_label(&payload.name, payload.sys.country.as_deref()),
        temperature: round(payload.main.temp),
        feels_like: round(payload.main.feels_like),
        humidity: payload.main.humidity.round().clamp(0.0, 100.0) as u8,
        wind_kmh: wind_kmh(payload.wind.speed, units),
        pressure_hpa: round(payload.main.pressure),
        description,
        category,
        icon,
    }
}

/// `"<name>, <country>"`, or the bare name when the country is missing or blank.
pub fn location_label(name: &str, country: Option<&str>) -> String {
    match country.map(str::trim).filter(|c| !c.is_empty()) {
        Some(country) => format!("{name}, {country}"),
        None => name.to_string(),
    }
}

/// Wind speed in km/h. Metric payloads report m/s, imperial ones mph.
pub fn wind_kmh(speed: f64, units: Units) -> i64 {
    match units {
        Units::Metric => round(speed * MPS_TO_KMH),
        Units::Imperial => round(speed * MPH_TO_KMH),
    }
}

pub fn normalize_forecast<Tz>(
    payload: &OwForecastResponse,
    mode: ForecastMode,
    tz: &Tz,
) -> Vec<ForecastEntry>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match mode {
        ForecastMode::Windowed => windowed_forecast(&payload.list, tz),
        ForecastMode::Daily => daily_forecast(&payload.list, tz),
    }
}

/// First [`FORECAST_LIMIT`] periods verbatim, labelled with their local hour.
pub fn windowed_forecast<Tz>(periods: &[OwForecastPeriod], tz: &Tz) -> Vec<ForecastEntry>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    periods
        .iter()
        .filter_map(|period| {
            let local = local_time(period.dt, tz)?;
            let (category, description, icon) = condition_fields(period.weather.first());
            Some(ForecastEntry {
                label: local.format("%H:00").to_string(),
                temperature: round(period.main.temp),
                category,
                description,
                icon,
            })
        })
        .take(FORECAST_LIMIT)
        .collect()
}

#[derive(Default)]
struct DayBucket<'a> {
    temperatures: Vec<f64>,
    conditions: Vec<Option<&'a OwCondition>>,
}

/// One entry per local calendar day: mean temperature and modal condition.
pub fn daily_forecast<Tz>(periods: &[OwForecastPeriod], tz: &Tz) -> Vec<ForecastEntry>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut buckets: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();

    for period in periods {
        let Some(local) = local_time(period.dt, tz) else {
            continue;
        };
        let bucket = buckets.entry(local.date_naive()).or_default();
        bucket.temperatures.push(period.main.temp);
        bucket.conditions.push(period.weather.first());
    }

    buckets
        .into_iter()
        .take(FORECAST_LIMIT)
        .map(|(day, bucket)| {
            let mean = bucket.temperatures.iter().sum::<f64>() / bucket.temperatures.len() as f64;
            let category = modal_category(&bucket.conditions);
            let representative = bucket
                .conditions
                .iter()
                .copied()
                .find(|c| category_of(*c) == category)
                .flatten();
            let (_, description, icon) = condition_fields(representative);

            ForecastEntry {
                label: day.format("%a, %b %-d").to_string(),
                temperature: round(mean),
                category,
                description,
                icon,
            }
        })
        .collect()
}

/// Most frequent category; ties go to the one seen first.
fn modal_category(conditions: &[Option<&OwCondition>]) -> ConditionCategory {
    let mut counts: Vec<(ConditionCategory, usize)> = Vec::new();
    for condition in conditions {
        let category = category_of(*condition);
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }

    counts
        .into_iter()
        .fold(None, |best: Option<(ConditionCategory, usize)>, (category, n)| match best {
            Some((_, best_n)) if best_n >= n => best,
            _ => Some((category, n)),
        })
        .map(|(category, _)| category)
        .unwrap_or(ConditionCategory::Other)
}

fn category_of(condition: Option<&OwCondition>) -> ConditionCategory {
    condition.map_or(ConditionCategory::Other, |c| ConditionCategory::from_label(&c.main))
}

fn condition_fields(condition: Option<&OwCondition>) -> (ConditionCategory, String, String) {
    match condition {
        Some(c) => (ConditionCategory::from_label(&c.main), c.description.clone(), c.icon.clone()),
        None => (ConditionCategory::Other, String::new(), String::new()),
    }
}

fn local_time<Tz: TimeZone>(ts: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp(ts, 0).map(|utc| utc.with_timezone(tz))
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{OwMain, OwSys, OwWind};
    use chrono::{FixedOffset, Utc};

    fn condition(main: &str, description: &str, icon: &str) -> OwCondition {
        OwCondition {
            main: main.into(),
            description: description.into(),
            icon: icon.into(),
        }
    }

    fn period(dt: i64, temp: f64, main: &str) -> OwForecastPeriod {
        OwForecastPeriod {
            dt,
            main: OwMain {
                temp,
                ..Default::default()
            },
            weather: vec![condition(main, &main.to_lowercase(), "03d")],
        }
    }

    fn current(name: &str, country: Option<&str>) -> OwCurrentResponse {
        OwCurrentResponse {
            name: name.into(),
            sys: OwSys {
                country: country.map(Into::into),
            },
            main: OwMain {
                temp: 14.6,
                feels_like: 13.4,
                humidity: 72.0,
                pressure: 1012.0,
            },
            wind: OwWind { speed: 5.0 },
            weather: vec![condition("Rain", "light rain", "10d")],
        }
    }

    // 2024-01-15T03:00:00Z
    const BASE: i64 = 1_705_287_600;
    const HOUR: i64 = 3_600;

    #[test]
    fn current_payload_is_rounded_and_converted() {
        let snapshot = normalize_current(&current("London", Some("GB")), Units::Metric);

        assert_eq!(snapshot.location, "London, GB");
        assert_eq!(snapshot.temperature, 15);
        assert_eq!(snapshot.feels_like, 13);
        assert_eq!(snapshot.humidity, 72);
        assert_eq!(snapshot.wind_kmh, 18);
        assert_eq!(snapshot.pressure_hpa, 1012);
        assert_eq!(snapshot.category, ConditionCategory::Rain);
        assert_eq!(snapshot.description, "light rain");
        assert_eq!(snapshot.icon, "10d");
    }

    #[test]
    fn missing_country_leaves_bare_name() {
        let snapshot = normalize_current(&current("Atlantis", None), Units::Metric);
        assert_eq!(snapshot.location, "Atlantis");
        assert!(!snapshot.location.contains("undefined"));

        assert_eq!(location_label("Atlantis", Some("  ")), "Atlantis");
    }

    #[test]
    fn empty_condition_list_maps_to_other() {
        let mut payload = current("London", Some("GB"));
        payload.weather.clear();

        let snapshot = normalize_current(&payload, Units::Metric);
        assert_eq!(snapshot.category, ConditionCategory::Other);
        assert!(snapshot.description.is_empty());
    }

    #[test]
    fn humidity_is_clamped() {
        let mut payload = current("London", Some("GB"));
        payload.main.humidity = 140.0;
        assert_eq!(normalize_current(&payload, Units::Metric).humidity, 100);

        payload.main.humidity = -3.0;
        assert_eq!(normalize_current(&payload, Units::Metric).humidity, 0);
    }

    #[test]
    fn wind_conversion() {
        assert_eq!(wind_kmh(5.0, Units::Metric), 18);
        assert_eq!(wind_kmh(0.0, Units::Metric), 0);
        assert_eq!(wind_kmh(10.0, Units::Imperial), 16);
    }

    #[test]
    fn windowed_takes_first_five_with_hour_labels() {
        let periods: Vec<_> =
            (0..8).map(|i| period(BASE + i * 3 * HOUR, 10.0 + i as f64, "Clouds")).collect();

        let entries = windowed_forecast(&periods, &Utc);

        assert_eq!(entries.len(), FORECAST_LIMIT);
        let labels: Vec<_> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["03:00", "06:00", "09:00", "12:00", "15:00"]);
        assert_eq!(entries[4].temperature, 14);
    }

    #[test]
    fn windowed_labels_follow_the_given_timezone() {
        let periods = vec![period(BASE, 10.0, "Clear")];
        let tz = FixedOffset::east_opt(2 * 3_600).unwrap();

        assert_eq!(windowed_forecast(&periods, &tz)[0].label, "05:00");
    }

    #[test]
    fn daily_aggregation_averages_per_calendar_day() {
        let hours = [0, 3, 6, 21, 24, 27];
        let temps = [10.0, 12.0, 14.0, 8.0, 9.0, 11.0];
        let periods: Vec<_> = hours
            .iter()
            .zip(temps)
            .map(|(h, t)| period(BASE + h * HOUR, t, "Clouds"))
            .collect();

        let entries = daily_forecast(&periods, &Utc);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].temperature, 12);
        assert_eq!(entries[1].temperature, 9);
        assert_eq!(entries[0].label, "Mon, Jan 15");
        assert_eq!(entries[1].label, "Tue, Jan 16");
    }

    #[test]
    fn daily_mode_picks_modal_category_with_first_seen_tiebreak() {
        let periods = vec![
            period(BASE, 10.0, "Rain"),
            period(BASE + 3 * HOUR, 10.0, "Clear"),
            period(BASE + 6 * HOUR, 10.0, "Clear"),
            period(BASE + 9 * HOUR, 10.0, "Rain"),
            // next day: Snow and Clouds tie, Snow came first
            period(BASE + 24 * HOUR, 0.0, "Snow"),
            period(BASE + 27 * HOUR, 0.0, "Clouds"),
        ];

        let entries = daily_forecast(&periods, &Utc);

        assert_eq!(entries[0].category, ConditionCategory::Rain);
        assert_eq!(entries[0].description, "rain");
        assert_eq!(entries[1].category, ConditionCategory::Snow);
    }

    #[test]
    fn daily_mode_is_chronological_and_capped() {
        // out of order on purpose, spanning seven days
        let mut periods: Vec<_> =
            (0..7).map(|d| period(BASE + d * 24 * HOUR, d as f64, "Clear")).collect();
        periods.reverse();

        let entries = daily_forecast(&periods, &Utc);

        assert_eq!(entries.len(), FORECAST_LIMIT);
        let temps: Vec<_> = entries.iter().map(|e| e.temperature).collect();
        assert_eq!(temps, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn forecast_mode_dispatch_is_deterministic() {
        let payload = OwForecastResponse {
            list: (0..15).map(|i| period(BASE + i * 3 * HOUR, 5.0, "Mist")).collect(),
        };

        let first = normalize_forecast(&payload, ForecastMode::Daily, &Utc);
        let second = normalize_forecast(&payload, ForecastMode::Daily, &Utc);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);

        assert_eq!(normalize_forecast(&payload, ForecastMode::Windowed, &Utc).len(), 5);
    }
}
