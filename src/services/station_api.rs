//! Trait for sources of per-city air-quality readings.

use crate::error::FetchError;
use crate::payload::StationData;

/// Abstraction over an air-quality provider (e.g., WAQI).
///
/// Implementations return the provider payload for one city or a
/// [`FetchError`]; callers treat every error as "no reading".
#[async_trait::async_trait]
pub trait StationApi: Send + Sync {
    /// Fetches the current station data for `city`.
    async fn fetch_station(&self, city: &str) -> Result<StationData, FetchError>;
}
