//! HTTP-backed environmental source.
//!
//! One shared [`reqwest::Client`] serves every domain. Each domain talks to
//! its own provider:
//!
//! | Domain        | Provider                          | Credentials            |
//! |---------------|-----------------------------------|------------------------|
//! | weather       | `OpenWeatherMap` current weather  | `weather_api_key`      |
//! | soil          | Open-Meteo soil variables         | none                   |
//! | vegetation    | `AppEEARS` point sample           | `vegetation_token`     |
//! | precipitation | Open-Meteo 30-day daily history   | none                   |
//! | geocoding     | Nominatim-compatible reverse API  | `geocoding_url` is set |
//!
//! Response bodies are decoded by the pure `decode_*` functions so payload
//! handling is testable without a network.

use std::time::Duration;

use chrono::{Datelike, Utc};
use harvest_types::{
    ClimateBand, Coordinates, EnvironmentDomain, PrecipitationKind, PrecipitationRecord,
    SoilRecord, VegetationHealth, VegetationRecord, WeatherRecord,
};
use serde_json::Value;

use crate::config::SourcesConfig;
use crate::error::SourceError;
use crate::solar;
use crate::source::EnvironmentSource;
use crate::synthetic::{baseline_fertility, baseline_organic_matter};

/// Metres per second to kilometres per hour.
const MS_TO_KMH: f64 = 3.6;

/// Environmental source that queries public HTTP APIs.
#[derive(Debug, Clone)]
pub struct HttpEnvironmentSource {
    client: reqwest::Client,
    config: SourcesConfig,
}

impl HttpEnvironmentSource {
    /// Build a source from endpoint configuration.
    ///
    /// `timeout` bounds each individual request; the aggregator applies its
    /// own deadline on top.
    ///
    /// # Errors
    ///
    /// Returns the builder error if the TLS backend cannot be initialized.
    pub fn new(config: &SourcesConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Send a GET and return the body text of a successful response.
    async fn get_text(
        &self,
        domain: EnvironmentDomain,
        request: reqwest::RequestBuilder,
    ) -> Result<String, SourceError> {
        let response = request
            .send()
            .await
            .map_err(|source| SourceError::Http { domain, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                domain,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| SourceError::Http { domain, source })
    }
}

impl EnvironmentSource for HttpEnvironmentSource {
    async fn fetch_weather(&self, at: Coordinates) -> Result<WeatherRecord, SourceError> {
        let domain = EnvironmentDomain::Weather;
        let Some(key) = self.config.weather_api_key.as_deref() else {
            return Err(SourceError::NotConfigured { domain });
        };

        let url = format!("{}/data/2.5/weather", self.config.weather_url);
        let request = self.client.get(&url).query(&[
            ("lat", at.lat.to_string()),
            ("lon", at.lon.to_string()),
            ("appid", key.to_owned()),
            ("units", "metric".to_owned()),
        ]);
        let body = self.get_text(domain, request).await?;
        decode_weather(&body, at.lat, Utc::now().ordinal())
    }

    async fn fetch_soil(&self, at: Coordinates) -> Result<SoilRecord, SourceError> {
        let url = format!("{}/v1/forecast", self.config.soil_url);
        let request = self.client.get(&url).query(&[
            ("latitude", at.lat.to_string()),
            ("longitude", at.lon.to_string()),
            (
                "current",
                "soil_moisture_0_to_1cm,soil_moisture_9_to_27cm,soil_temperature_0cm".to_owned(),
            ),
        ]);
        let body = self.get_text(EnvironmentDomain::Soil, request).await?;
        decode_soil(&body, ClimateBand::from_latitude(at.lat))
    }

    async fn fetch_vegetation(&self, at: Coordinates) -> Result<VegetationRecord, SourceError> {
        let domain = EnvironmentDomain::Vegetation;
        let Some(token) = self.config.vegetation_token.as_deref() else {
            return Err(SourceError::NotConfigured { domain });
        };

        let url = format!("{}/point/{},{}", self.config.vegetation_url, at.lat, at.lon);
        let request = self.client.get(&url).bearer_auth(token);
        let body = self.get_text(domain, request).await?;
        decode_vegetation(&body)
    }

    async fn fetch_precipitation(
        &self,
        at: Coordinates,
    ) -> Result<PrecipitationRecord, SourceError> {
        let url = format!("{}/v1/forecast", self.config.precipitation_url);
        let request = self.client.get(&url).query(&[
            ("latitude", at.lat.to_string()),
            ("longitude", at.lon.to_string()),
            ("daily", "precipitation_sum".to_owned()),
            ("past_days", "30".to_owned()),
            ("forecast_days", "1".to_owned()),
        ]);
        let body = self.get_text(EnvironmentDomain::Precipitation, request).await?;
        decode_precipitation(&body)
    }

    async fn reverse_geocode(&self, at: Coordinates) -> Result<Option<String>, SourceError> {
        let Some(base) = self.config.geocoding_url.as_deref() else {
            return Ok(None);
        };

        let url = format!("{base}/reverse");
        let request = self.client.get(&url).query(&[
            ("format", "json".to_owned()),
            ("lat", at.lat.to_string()),
            ("lon", at.lon.to_string()),
        ]);
        let response = request.send().await.map_err(|e| SourceError::Geocoding {
            reason: e.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Geocoding {
                reason: format!("status {status}"),
            });
        }
        let body = response.text().await.map_err(|e| SourceError::Geocoding {
            reason: e.to_string(),
        })?;
        Ok(decode_place(&body))
    }
}

// ---------------------------------------------------------------------------
// Payload decoding
// ---------------------------------------------------------------------------

fn parse(domain: EnvironmentDomain, body: &str) -> Result<Value, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Decode {
        domain,
        reason: format!("invalid JSON: {e}"),
    })
}

fn number(domain: EnvironmentDomain, json: &Value, path: &[&str]) -> Result<f64, SourceError> {
    path.iter()
        .try_fold(json, |node, key| node.get(*key))
        .and_then(Value::as_f64)
        .ok_or_else(|| SourceError::Decode {
            domain,
            reason: format!("missing numeric field {}", path.join(".")),
        })
}

/// Decode an `OpenWeatherMap` current-weather body.
///
/// Wind arrives in m/s and is converted to km/h. Solar radiation is not
/// part of the payload and is derived from latitude, date, and cloud cover.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if a required field is missing.
pub fn decode_weather(
    body: &str,
    lat: f64,
    day_of_year: u32,
) -> Result<WeatherRecord, SourceError> {
    let domain = EnvironmentDomain::Weather;
    let json = parse(domain, body)?;

    let temperature = number(domain, &json, &["main", "temp"])?;
    let humidity = number(domain, &json, &["main", "humidity"])?;
    let pressure = number(domain, &json, &["main", "pressure"])?;
    let wind_speed = number(domain, &json, &["wind", "speed"])? * MS_TO_KMH;
    let cloud_cover = number(domain, &json, &["clouds", "all"])
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);

    Ok(WeatherRecord {
        temperature,
        humidity,
        wind_speed,
        pressure,
        cloud_cover,
        solar_radiation: solar::solar_radiation(lat, day_of_year, cloud_cover),
        source: "OpenWeatherMap".to_owned(),
    })
}

/// Decode an Open-Meteo soil body.
///
/// Only moisture and temperature are measured. Fertility and chemistry
/// come from the climate band baseline.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if surface moisture or soil
/// temperature is missing.
pub fn decode_soil(body: &str, band: ClimateBand) -> Result<SoilRecord, SourceError> {
    let domain = EnvironmentDomain::Soil;
    let json = parse(domain, body)?;

    let surface_moisture =
        number(domain, &json, &["current", "soil_moisture_0_to_1cm"])?.clamp(0.0, 1.0);
    let root_zone_moisture = number(domain, &json, &["current", "soil_moisture_9_to_27cm"])
        .map_or(surface_moisture * 0.8, |m| m.clamp(0.0, 1.0));
    let soil_temperature = number(domain, &json, &["current", "soil_temperature_0cm"])?;

    Ok(SoilRecord {
        surface_moisture,
        root_zone_moisture,
        soil_temperature,
        organic_matter: baseline_organic_matter(band),
        ph: 6.5,
        salinity: 1.0,
        fertility: baseline_fertility(band),
        source: "Open-Meteo".to_owned(),
        resolution: "11km".to_owned(),
    })
}

/// Decode an `AppEEARS` point sample of the form
/// `{"ndvi": 0.61, "evi": 0.48, "lai": 3.2}`.
///
/// `evi` and `lai` are optional and derived from NDVI when absent.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if NDVI is missing or outside `[-1, 1]`.
pub fn decode_vegetation(body: &str) -> Result<VegetationRecord, SourceError> {
    let domain = EnvironmentDomain::Vegetation;
    let json = parse(domain, body)?;

    let ndvi = number(domain, &json, &["ndvi"])?;
    if !(-1.0..=1.0).contains(&ndvi) {
        return Err(SourceError::Decode {
            domain,
            reason: format!("ndvi {ndvi} outside [-1, 1]"),
        });
    }
    let evi = number(domain, &json, &["evi"]).unwrap_or(0.8 * ndvi);
    let lai = number(domain, &json, &["lai"]).unwrap_or_else(|_| (6.0 * ndvi).max(0.0));

    Ok(VegetationRecord {
        ndvi,
        evi,
        lai,
        health: VegetationHealth::from_ndvi(ndvi),
        source: "NASA MODIS (AppEEARS)".to_owned(),
        resolution: "250m".to_owned(),
    })
}

/// Decode an Open-Meteo daily precipitation history.
///
/// Daily is the most recent value, weekly the sum of the last seven, and
/// monthly the sum of everything returned. Null entries are skipped.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if the series is missing or empty.
pub fn decode_precipitation(body: &str) -> Result<PrecipitationRecord, SourceError> {
    let domain = EnvironmentDomain::Precipitation;
    let json = parse(domain, body)?;

    let series: Vec<f64> = json
        .get("daily")
        .and_then(|d| d.get("precipitation_sum"))
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();

    let Some(&daily) = series.last() else {
        return Err(SourceError::Decode {
            domain,
            reason: "empty precipitation_sum series".to_owned(),
        });
    };

    let weekly_total = series.iter().rev().take(7).sum();
    let monthly_total = series.iter().sum();

    Ok(PrecipitationRecord {
        daily,
        weekly_total,
        monthly_total,
        kind: PrecipitationKind::from_daily_mm(daily),
        source: "Open-Meteo".to_owned(),
        resolution: "11km".to_owned(),
    })
}

/// Extract `display_name` from a Nominatim reverse-geocoding body.
pub fn decode_place(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("display_name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .map(ToOwned::to_owned)
}
