use chrono::{DateTime, NaiveDate, Utc};

use crate::aggregate::Aggregation;
use crate::analyzers::rank::{TOP_N, best, rank, worst};
use crate::analyzers::severity::Severity;
use crate::analyzers::types::{AqiReading, CityCard, Dashboard, FeaturedCard, ForecastSeries};
use crate::payload::ForecastDay;

/// Bumped whenever the serialized report changes shape.
pub const SCHEMA_VERSION: u8 = 1;

impl CityCard {
    pub fn from_reading(reading: &AqiReading) -> Self {
        let severity = Severity::from_aqi(reading.aqi);
        CityCard {
            city: reading.city.clone(),
            aqi: reading.aqi,
            severity,
            color: severity.color(),
            observed_at: reading
                .observed_at
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

impl ForecastSeries {
    /// `None` for an empty forecast.
    pub fn from_days(days: &[ForecastDay], today: NaiveDate) -> Option<Self> {
        if days.is_empty() {
            return None;
        }

        let today = today.format("%Y-%m-%d").to_string();
        Some(ForecastSeries {
            days: days.iter().map(|d| d.day.clone()).collect(),
            values: days.iter().map(|d| d.avg).collect(),
            today_index: days.iter().position(|d| d.day == today),
        })
    }
}

impl Dashboard {
    /// Assembles the report for one run.
    ///
    /// The featured card and the ranking only appear when the featured city
    /// produced a usable reading; the best/worst lists only when at least one
    /// other city did.
    pub fn build(
        aggregation: &Aggregation,
        cities: &[String],
        generated_at: DateTime<Utc>,
        today: NaiveDate,
    ) -> Self {
        let anchor = aggregation.ranking_anchor();

        let featured = anchor.map(|reading| FeaturedCard {
            card: CityCard::from_reading(reading),
            forecast: reading
                .forecast
                .as_deref()
                .and_then(|days| ForecastSeries::from_days(days, today)),
        });

        let ranking = anchor.map(|reading| rank(reading.aqi, &aggregation.other_values()));

        let cards = |list: Vec<AqiReading>| -> Vec<CityCard> {
            list.iter().map(CityCard::from_reading).collect()
        };

        Dashboard {
            schema_version: SCHEMA_VERSION,
            generated_at,
            featured_city: aggregation.featured_city.clone(),
            featured,
            ranking,
            best: cards(best(&aggregation.others, TOP_N)),
            worst: cards(worst(&aggregation.others, TOP_N)),
            cities: cities.to_vec(),
            failures: aggregation.failures.clone(),
        }
    }
}
