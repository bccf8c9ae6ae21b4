//! Weather tool backed by Open-Meteo.
//!
//! A lookup is two calls: geocode the city name, then fetch current
//! conditions for the coordinates. Finished reports are cached per city for
//! `cache_ttl_secs`; the cache is private to this tool.

use crate::tools::registry::{ArgSpec, Tool, ToolArgs, ToolError};
use crate::utils::toml_config::WeatherConfig;
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

const WEATHER_ARGS: &[ArgSpec] = &[ArgSpec::string("city")];
const CURRENT_VARIABLES: &str = "temperature_2m,apparent_temperature,precipitation,wind_speed_10m";

pub struct WeatherTool {
    http: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
    ttl: Duration,
    cache: Mutex<LruCache<String, (Instant, String)>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<Location>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Location {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    apparent_temperature: f64,
    precipitation: f64,
    wind_speed_10m: f64,
}

impl WeatherTool {
    pub fn new(http: reqwest::Client, config: &WeatherConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
            ttl: Duration::from_secs(config.cache_ttl_secs),
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn cached(&self, key: &str) -> Option<String> {
        let mut cache = self.cache.lock();
        let entry = cache
            .get(key)
            .map(|(stored_at, report)| (stored_at.elapsed() < self.ttl, report.clone()));
        match entry {
            Some((true, report)) => Some(report),
            Some((false, _)) => {
                cache.pop(key);
                None
            }
            None => None,
        }
    }

    async fn geocode(&self, city: &str) -> Result<Option<Location>, ToolError> {
        let response: GeocodingResponse = self
            .http
            .get(&self.geocoding_url)
            .query(&[
                ("name", city),
                ("count", "1"),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(city, results = ?response.results, "Geocoding response");
        Ok(response.results.and_then(|r| r.into_iter().next()))
    }

    async fn current(&self, location: &Location) -> Result<CurrentConditions, ToolError> {
        let response: ForecastResponse = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_VARIABLES.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.current)
    }

    async fn report(&self, city: &str) -> Result<String, ToolError> {
        let key = city.trim().to_lowercase();
        if let Some(report) = self.cached(&key) {
            tracing::debug!(city, "Weather cache hit");
            return Ok(report);
        }

        let Some(location) = self.geocode(city).await? else {
            tracing::warn!(city, "Geocoding returned no results");
            return Ok(format!(
                "Could not find a location for '{}'. Please provide a more specific name or check for typos.",
                city
            ));
        };

        let current = self.current(&location).await?;
        let report = format_report(city, &location, &current);
        self.cache.lock().put(key, (Instant::now(), report.clone()));
        Ok(report)
    }
}

fn format_report(city: &str, location: &Location, current: &CurrentConditions) -> String {
    let name = location.name.as_deref().unwrap_or(city);
    let country = location.country.as_deref().unwrap_or("");
    format!(
        "Current weather in {}, {}: Temperature: {:.2}°C Feels like: {:.2}°C \
         Precipitation: {:.2}mm Wind Speed: {:.2}km/h",
        name,
        country,
        current.temperature_2m,
        current.apparent_temperature,
        current.precipitation,
        current.wind_speed_10m
    )
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Provides the current weather, climate, or forecast for a given city."
    }

    fn arguments(&self) -> &[ArgSpec] {
        WEATHER_ARGS
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        self.report(args.str("city")?).await
    }
}
