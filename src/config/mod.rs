//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ColdStateSettings, HotStateSettings, LogFormat, LoggingConfig, MetricsConfig,
    OrchestratorSettings, RetrySettings, ServerConfig,
};
