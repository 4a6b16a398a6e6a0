//! JSON payload decoding for WAQI station feeds.
//!
//! A feed response is an envelope `{ "status": ..., "data": ... }`. When the
//! status is `"ok"`, `data` holds the station object; otherwise it is usually a
//! plain error string such as `"Unknown station"`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::validate::validate_aqi;

/// Envelope status marking a usable payload.
pub const STATUS_OK: &str = "ok";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Value,
}

/// The `data` object of a successful station response.
///
/// Every field is optional; `aqi` is kept raw and only interpreted through
/// [`validate_aqi`]. The display-only sub-objects decode leniently: a
/// mistyped value reads as absent and never rejects the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationData {
    #[serde(default)]
    pub aqi: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<StationTime>,
    #[serde(default, deserialize_with = "lenient")]
    pub city: Option<StationCity>,
    #[serde(default, deserialize_with = "lenient")]
    pub forecast: Option<Forecast>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationTime {
    /// Local observation time as formatted by the provider.
    #[serde(default, deserialize_with = "lenient")]
    pub s: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationCity {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    #[serde(default, deserialize_with = "lenient")]
    pub daily: Option<DailyForecast>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Days missing a date or a numeric average are skipped.
    #[serde(default, deserialize_with = "lenient_days")]
    pub pm25: Option<Vec<ForecastDay>>,
}

/// One day of the PM2.5 forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub avg: f64,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_days<'de, D>(deserializer: D) -> Result<Option<Vec<ForecastDay>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

impl StationData {
    /// The validated AQI, if the station reported a usable one.
    pub fn aqi(&self) -> Option<i64> {
        validate_aqi(&self.aqi)
    }

    /// Station display name, `"Unknown"` when the payload omits it.
    pub fn city_name(&self) -> &str {
        self.city
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn observed_at(&self) -> Option<&str> {
        self.time.as_ref().and_then(|t| t.s.as_deref())
    }

    /// Daily PM2.5 forecast; `None` when missing or empty.
    pub fn pm25_forecast(&self) -> Option<&[ForecastDay]> {
        self.forecast
            .as_ref()
            .and_then(|f| f.daily.as_ref())
            .and_then(|d| d.pm25.as_deref())
            .filter(|days| !days.is_empty())
    }
}

/// Decodes a station response body.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] for malformed JSON and
/// [`FetchError::Provider`] when the envelope status is not `"ok"`.
pub fn parse_payload(bytes: &[u8]) -> Result<StationData, FetchError> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;

    if envelope.status != STATUS_OK {
        let message = envelope.data.as_str().unwrap_or_default().to_string();
        return Err(FetchError::Provider {
            status: envelope.status,
            message,
        });
    }

    Ok(serde_json::from_value(envelope.data)?)
}
