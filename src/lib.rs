pub mod aggregate;
pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod payload;
pub mod services;
pub mod validate;
