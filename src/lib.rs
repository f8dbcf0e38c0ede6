//! # Pricewatch Core Library
//!
//! Background synchronization and price-monitoring engine for an e-commerce
//! catalog admin tool: sync jobs against an external commerce platform,
//! cached settings and FX rates, encrypted API token governance, and a
//! margin monitoring pass over published products.

pub mod clock;
pub mod config;
pub mod context;
pub mod crypto;
pub mod db;
pub mod error;
pub mod fx;
pub mod models;
pub mod monitor;
pub mod platform;
pub mod repositories;
pub mod settings_cache;
pub mod sync_engine;
pub mod telemetry;
pub mod tokens;
pub use migration;
