//! Data-access core for a secondhand marketplace: sale offers, search,
//! saved offers, messaging threads and the surrounding auth/geo/blob
//! service boundaries.

pub mod app;
pub mod auth;
pub mod blobs;
pub mod config;
pub mod db;
pub mod geo;
pub mod models;
pub mod search;
pub mod session;
pub mod telemetry;
pub mod util;
