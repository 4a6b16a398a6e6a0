//! Concrete provider clients.

pub mod waqi;
