//! Domain layer: configuration and topic models, error taxonomy and the port
//! traits infrastructure and adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{
    BoxError, CloseError, ConfigError, ConfigResult, FactoryError, Interrupted, TopicError,
};
