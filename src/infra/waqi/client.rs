use async_trait::async_trait;
use reqwest::Url;

use crate::error::FetchError;
use crate::fetch::auth::UrlParam;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::payload::{StationData, parse_payload};
use crate::services::station_api::StationApi;

/// Public WAQI API root.
pub const DEFAULT_ENDPOINT: &str = "https://api.waqi.info";

/// Client for the WAQI city feed, `GET {endpoint}/feed/{city}/?token={token}`.
///
/// The token is injected once at construction through [`UrlParam`]; nothing
/// is read from the process environment here.
pub struct WaqiClient<C> {
    http: UrlParam<C>,
    endpoint: Url,
}

impl<C: HttpClient> WaqiClient<C> {
    pub fn new(inner: C, endpoint: &str, token: String) -> Result<Self, FetchError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))?;
        if endpoint.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(endpoint.to_string()));
        }

        Ok(Self {
            http: UrlParam::token(inner, token),
            endpoint,
        })
    }

    /// Builds the feed URL for `city` (without the token).
    ///
    /// The city becomes a single percent-encoded path segment, so names with
    /// spaces or non-ASCII characters are safe.
    pub fn station_url(&self, city: &str) -> Result<Url, FetchError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(self.endpoint.to_string()))?
            .pop_if_empty()
            .extend(["feed", city, ""]);
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> StationApi for WaqiClient<C> {
    #[tracing::instrument(skip(self))]
    async fn fetch_station(&self, city: &str) -> Result<StationData, FetchError> {
        let url = self.station_url(city)?;
        let bytes = fetch_bytes(&self.http, url).await?;
        tracing::debug!(bytes = bytes.len(), "Station payload received");
        parse_payload(&bytes)
    }
}
