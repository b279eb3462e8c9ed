//! Core functionality for the Errata error-reporting backend.
//!
//! This crate provides the ambient pieces shared by the crypto crate and the
//! service binary: configuration loading, error types, logging initialization
//! and the pluggable health-check registry with its periodic scheduler.

pub mod config;
pub mod error;
pub mod health;
pub mod logging;

pub use config::{Config, CryptoConfig, HealthConfig, LogConfig, ServerConfig};
pub use error::{ConfigError, Result};
pub use health::{
    HealthCheck, HealthRegistry, HealthReport, HealthScheduler, HealthStatus, SharedHealthReport,
};
