//! Collection of readings for the configured city list.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{Instrument, debug, error, warn};

use crate::analyzers::types::{AqiReading, FetchFailure};
use crate::error::FetchError;
use crate::payload::StationData;
use crate::services::station_api::StationApi;

/// Readings gathered in one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub featured_city: String,
    /// The featured city's reading, if its fetch and validation succeeded.
    pub featured: Option<AqiReading>,
    /// Raw payload of the featured city (forecast and timestamp source).
    pub featured_payload: Option<StationData>,
    /// Other cities in list order, failures and invalid readings removed.
    pub others: Vec<AqiReading>,
    /// Transport-level failures, in the order they were observed.
    pub failures: Vec<FetchFailure>,
}

impl Aggregation {
    /// The featured reading when it can anchor a ranking.
    ///
    /// A zero AQI counts as missing, matching how the dashboard has always
    /// guarded the featured city.
    pub fn ranking_anchor(&self) -> Option<&AqiReading> {
        self.featured.as_ref().filter(|r| r.aqi != 0)
    }

    pub fn other_values(&self) -> Vec<i64> {
        self.others.iter().map(|r| r.aqi).collect()
    }
}

/// Fetches the featured city, then every other city in `cities`.
///
/// Up to `concurrency` fetches run at once (at least one). Results are
/// reassembled in list order, so the output does not depend on completion
/// order. Entries equal to `featured` are skipped. Failed cities are logged
/// and left out; nothing here is fatal.
#[tracing::instrument(skip(api, cities), fields(city_count = cities.len()))]
pub async fn aggregate(
    api: Arc<dyn StationApi>,
    cities: &[String],
    featured: &str,
    concurrency: usize,
) -> Aggregation {
    let mut failures = Vec::new();

    let featured_payload = match api.fetch_station(featured).await {
        Ok(data) => Some(data),
        Err(e) => {
            record_failure(featured, e, &mut failures);
            None
        }
    };
    let featured_reading = featured_payload
        .as_ref()
        .and_then(|data| AqiReading::from_station(featured, data))
        .map(|r| r.named(featured));

    if featured_reading.is_none() {
        warn!(city = featured, "No usable reading for featured city");
    }

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = Vec::new();

    for city in cities.iter().filter(|c| c.as_str() != featured) {
        let api = Arc::clone(&api);
        let sem = Arc::clone(&semaphore);
        let query = city.clone();

        let span = tracing::info_span!("fetch_city", city = %city);
        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire().await;
                api.fetch_station(&query).await
            }
            .instrument(span),
        );

        tasks.push((city.clone(), task));
    }

    let mut others = Vec::new();
    for (city, task) in tasks {
        match task.await {
            Ok(Ok(data)) => match AqiReading::from_station(&city, &data) {
                Some(reading) => others.push(reading),
                None => debug!(city = %city, raw = %data.aqi, "Dropping reading without a valid AQI"),
            },
            Ok(Err(e)) => record_failure(&city, e, &mut failures),
            Err(e) => {
                error!(city = %city, error = %e, "Fetch task failed");
                failures.push(FetchFailure {
                    city,
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        collected = others.len(),
        failed = failures.len(),
        "Aggregation finished"
    );

    Aggregation {
        featured_city: featured.to_string(),
        featured: featured_reading,
        featured_payload,
        others,
        failures,
    }
}

fn record_failure(city: &str, err: FetchError, failures: &mut Vec<FetchFailure>) {
    if err.is_reportable() {
        warn!(city, error = %err, "City fetch failed");
        failures.push(FetchFailure {
            city: city.to_string(),
            reason: err.to_string(),
        });
    } else {
        debug!(city, error = %err, "Provider returned no data");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Serves canned station data; unknown cities get a provider error.
    struct FakeApi {
        stations: HashMap<String, Result<StationData, u16>>,
        delays: HashMap<String, u64>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                stations: HashMap::new(),
                delays: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn station(mut self, city: &str, aqi: serde_json::Value) -> Self {
            let data = StationData {
                aqi,
                city: Some(crate::payload::StationCity {
                    name: Some(format!("{city} station")),
                }),
                ..Default::default()
            };
            self.stations.insert(city.to_string(), Ok(data));
            self
        }

        fn failing(mut self, city: &str, status: u16) -> Self {
            self.stations.insert(city.to_string(), Err(status));
            self
        }

        fn delayed(mut self, city: &str, millis: u64) -> Self {
            self.delays.insert(city.to_string(), millis);
            self
        }
    }

    #[async_trait]
    impl StationApi for FakeApi {
        async fn fetch_station(&self, city: &str) -> Result<StationData, FetchError> {
            self.calls.lock().unwrap().push(city.to_string());
            if let Some(ms) = self.delays.get(city) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            match self.stations.get(city) {
                Some(Ok(data)) => Ok(data.clone()),
                Some(Err(status)) => Err(FetchError::Status(
                    reqwest::StatusCode::from_u16(*status).unwrap(),
                )),
                None => Err(FetchError::Provider {
                    status: "error".to_string(),
                    message: "Unknown station".to_string(),
                }),
            }
        }
    }

    fn cities(names: &[&str]) -> Vec<String> {
        names.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_featured_is_fetched_first_and_skipped_in_list() {
        let api = Arc::new(
            FakeApi::new()
                .station("Bangkok", json!(150))
                .station("Tokyo", json!(40))
                .station("Paris", json!("55")),
        );

        let agg = aggregate(
            api.clone(),
            &cities(&["Bangkok", "Tokyo", "Paris"]),
            "Bangkok",
            1,
        )
        .await;

        assert_eq!(
            api.calls.lock().unwrap().clone(),
            vec!["Bangkok", "Tokyo", "Paris"]
        );
        let featured = agg.featured.as_ref().unwrap();
        assert_eq!(featured.city, "Bangkok");
        assert_eq!(featured.aqi, 150);
        assert_eq!(agg.other_values(), vec![40, 55]);
        assert_eq!(agg.others[0].city, "Tokyo station");
        assert_eq!(agg.others[0].query, "Tokyo");
        assert!(agg.featured_payload.is_some());
        assert!(agg.failures.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_and_failed_cities_are_dropped() {
        let api = Arc::new(
            FakeApi::new()
                .station("Bangkok", json!(90))
                .station("Tokyo", json!("N/A"))
                .failing("Lagos", 502)
                .station("Rome", json!(33)),
        );

        let agg = aggregate(
            api,
            &cities(&["Tokyo", "Lagos", "Atlantis", "Rome"]),
            "Bangkok",
            3,
        )
        .await;

        assert_eq!(agg.other_values(), vec![33]);
        assert_eq!(agg.failures.len(), 1);
        assert_eq!(agg.failures[0].city, "Lagos");
        assert!(agg.failures[0].reason.contains("502"));
    }

    #[tokio::test]
    async fn test_featured_failure_is_not_fatal() {
        let api = Arc::new(
            FakeApi::new()
                .failing("Bangkok", 504)
                .station("Tokyo", json!(12)),
        );

        let agg = aggregate(api, &cities(&["Bangkok", "Tokyo"]), "Bangkok", 2).await;

        assert!(agg.featured.is_none());
        assert!(agg.featured_payload.is_none());
        assert!(agg.ranking_anchor().is_none());
        assert_eq!(agg.other_values(), vec![12]);
        assert_eq!(agg.failures[0].city, "Bangkok");
    }

    #[tokio::test]
    async fn test_order_follows_list_not_completion() {
        let api = Arc::new(
            FakeApi::new()
                .station("Bangkok", json!(70))
                .station("Slow", json!(1))
                .station("Fast", json!(2))
                .station("Medium", json!(3))
                .delayed("Slow", 60)
                .delayed("Medium", 20),
        );

        let agg = aggregate(api, &cities(&["Slow", "Fast", "Medium"]), "Bangkok", 8).await;

        assert_eq!(agg.other_values(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_fetches() {
        let api = Arc::new(
            FakeApi::new()
                .station("Bangkok", json!(70))
                .station("Tokyo", json!(5)),
        );

        let agg = aggregate(api, &cities(&["Tokyo"]), "Bangkok", 0).await;

        assert_eq!(agg.other_values(), vec![5]);
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let api = Arc::new(
            FakeApi::new()
                .station("Bangkok", json!(101))
                .station("Tokyo", json!(44))
                .station("Delhi", json!(250)),
        );
        let list = cities(&["Bangkok", "Tokyo", "Delhi"]);

        let first = aggregate(api.clone(), &list, "Bangkok", 4).await;
        let second = aggregate(api, &list, "Bangkok", 4).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_zero_featured_reading_has_no_anchor() {
        let api = Arc::new(FakeApi::new().station("Bangkok", json!(0)));

        let agg = aggregate(api, &[], "Bangkok", 1).await;

        assert_eq!(agg.featured.as_ref().map(|r| r.aqi), Some(0));
        assert!(agg.ranking_anchor().is_none());
    }
}
