pub mod config;
pub mod health;
pub mod logging;

pub use config::{Config, EmailConfig, FeedConfig, MonitorConfig, WhatsAppConfig};
pub use health::HealthChecker;
