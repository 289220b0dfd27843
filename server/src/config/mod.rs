//! Configuration: defaults and environment overrides.

pub mod app_config;

pub use app_config::AppConfig;
