//! trendlens - Search-trend aggregation engine
//!
//! Queries an interest-over-time trends provider for one or more keywords,
//! gathers related-topic, related-query and regional breakdowns, and
//! synthesizes the results into a single structured report.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`provider`] - Rate-limited HTTP provider client with retry logic
//! - [`analysis`] - Time-series, related-data and regional analyzers
//! - [`engine`] - Aggregation orchestrator with partial-failure isolation
//! - [`models`] - Core data structures and the report schema
//!
//! # Example
//!
//! ```no_run
//! use trendlens::config::EngineConfig;
//! use trendlens::engine::TrendEngine;
//! use trendlens::models::Query;
//! use trendlens::provider::{Pacer, TrendsClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = EngineConfig::from_env()?;
//!     let pacer = Arc::new(Pacer::new(config.provider.min_call_interval()));
//!     let client = TrendsClient::new(&config.provider, pacer)?;
//!     let engine = TrendEngine::new(Arc::new(client), &config);
//!
//!     let query = Query::new(["rust", "golang"])?;
//!     let report = engine.aggregate(&query).await?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod provider;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::{EngineOptions, TrendEngine};
    pub use crate::error::{Error, ProviderError, Result};
    pub use crate::models::{Query, Report, SearchProperty, TrendDirection};
    pub use crate::provider::{Pacer, TrendsClient, TrendsProvider};
}

// Direct re-exports for convenience
pub use models::{Query, Report, SearchProperty, TrendDirection};
