//! Data types used by the ranking pipeline and the dashboard report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::severity::Severity;
use crate::payload::{ForecastDay, StationData};

/// A validated reading for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AqiReading {
    /// Display name (from the payload, or the configured featured name).
    pub city: String,
    /// The list entry this reading was fetched for.
    pub query: String,
    pub aqi: i64,
    pub observed_at: Option<String>,
    pub forecast: Option<Vec<ForecastDay>>,
}

impl AqiReading {
    /// Builds a reading from a station payload; `None` without a valid AQI.
    pub fn from_station(query: &str, data: &StationData) -> Option<Self> {
        let aqi = data.aqi()?;
        Some(Self {
            city: data.city_name().to_string(),
            query: query.to_string(),
            aqi,
            observed_at: data.observed_at().map(str::to_string),
            forecast: data.pm25_forecast().map(<[ForecastDay]>::to_vec),
        })
    }

    /// Replaces the display name.
    pub fn named(mut self, city: &str) -> Self {
        self.city = city.to_string();
        self
    }
}

/// A city whose fetch failed at the transport level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub city: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DensityPoint {
    pub x: f64,
    pub y: f64,
}

/// Sampled kernel density of the combined AQI values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DensityCurve {
    Smooth { points: Vec<DensityPoint> },
    /// Every value is identical (or there is only one), so no bandwidth exists.
    Degenerate { at: f64 },
}

impl DensityCurve {
    /// Highest sampled point, if any.
    pub fn peak(&self) -> Option<DensityPoint> {
        match self {
            DensityCurve::Smooth { points } => points
                .iter()
                .copied()
                .max_by(|a, b| a.y.total_cmp(&b.y)),
            DensityCurve::Degenerate { .. } => None,
        }
    }
}

/// Percentile rank of the featured value plus the density for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankResult {
    pub featured: i64,
    pub percentile: f64,
    pub sample_size: usize,
    pub density: DensityCurve,
}

/// Forecast data for the featured card chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSeries {
    pub days: Vec<String>,
    pub values: Vec<f64>,
    /// Position of today's date among `days`, highlighted on the chart.
    pub today_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCard {
    pub city: String,
    pub aqi: i64,
    pub severity: Severity,
    pub color: &'static str,
    pub observed_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedCard {
    #[serde(flatten)]
    pub card: CityCard,
    pub forecast: Option<ForecastSeries>,
}

/// Everything the presentation layer needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    pub featured_city: String,
    pub featured: Option<FeaturedCard>,
    pub ranking: Option<RankResult>,
    pub best: Vec<CityCard>,
    pub worst: Vec<CityCard>,
    pub cities: Vec<String>,
    pub failures: Vec<FetchFailure>,
}
