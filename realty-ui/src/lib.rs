pub mod config;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod state;
pub mod utils;
pub mod views;

pub use config::{AppConfig, ConfigError};
pub use state::{ComparisonView, RenderOptions, Session, SessionEvent, SessionOutcome};
