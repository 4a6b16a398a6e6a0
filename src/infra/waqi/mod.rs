mod client;

pub use client::{DEFAULT_ENDPOINT, WaqiClient};
