//! Run configuration.
//!
//! The provider token and everything else a run depends on travel in an
//! explicit [`Config`] value handed to the client at construction.

use std::fmt;

use anyhow::{Result, bail};

use crate::infra::waqi::DEFAULT_ENDPOINT;

/// Environment variable holding the WAQI token.
pub const TOKEN_ENV: &str = "API_TOKEN";

pub const DEFAULT_FEATURED_CITY: &str = "Bangkok";

pub const DEFAULT_CONCURRENCY: usize = 5;

/// Cities shown on the dashboard, featured city included.
pub const DEFAULT_CITIES: &[&str] = &[
    "Bangkok",
    "Tokyo",
    "Delhi",
    "New York",
    "London",
    "Paris",
    "Beijing",
    "Moscow",
    "Dubai",
    "Singapore",
    "Los Angeles",
    "Chicago",
    "Sydney",
    "Istanbul",
    "Seoul",
    "Mumbai",
    "Karachi",
    "Shanghai",
    "Mexico City",
    "São Paulo",
    "Jakarta",
    "Lagos",
    "Cairo",
    "Buenos Aires",
    "Kolkata",
    "Lima",
    "Tehran",
    "Kinshasa",
    "Rio de Janeiro",
    "Baghdad",
    "Santiago",
    "Madrid",
    "Bangladesh",
    "Berlin",
    "Riyadh",
    "Houston",
    "Toronto",
    "Philadelphia",
    "Dallas",
    "San Francisco",
    "Boston",
    "Atlanta",
    "Miami",
    "Barcelona",
    "Johannesburg",
    "Nairobi",
    "Melbourne",
    "Montreal",
    "Rome",
    "Cape Town",
];

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub endpoint: String,
    pub featured_city: String,
    pub cities: Vec<String>,
    pub concurrency: usize,
}

impl Config {
    /// Default settings around the given token.
    ///
    /// # Errors
    ///
    /// Fails when the token is blank.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            bail!("{TOKEN_ENV} is empty");
        }

        Ok(Self {
            token,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            featured_city: DEFAULT_FEATURED_CITY.to_string(),
            cities: DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
            concurrency: DEFAULT_CONCURRENCY,
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_featured_city(mut self, city: &str) -> Self {
        self.featured_city = city.to_string();
        self
    }

    /// Replaces the city list; an empty list keeps the current one.
    pub fn with_cities(mut self, cities: Vec<String>) -> Self {
        if !cities.is_empty() {
            self.cities = cities;
        }
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("featured_city", &self.featured_city)
            .field("cities", &self.cities.len())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}
