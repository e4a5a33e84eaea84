//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or compact formatting on stderr
//! - Optional rolling JSON log files
//! - Secret scrubbing on every sink

pub mod config;
pub mod logger;
pub mod secret_scrubbing;

pub use config::{LogConfig, LogFormat, RotationPolicy};
pub use logger::{LoggerImpl, LOG_FILE_NAME};
pub use secret_scrubbing::{ScrubbingMakeWriter, SecretScrubber};
