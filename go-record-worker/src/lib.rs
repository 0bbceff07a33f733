pub mod config;
pub mod error;
pub mod worker;

pub use config::config_from_env;
pub use error::WorkerError;
pub use worker::{WorkerHandle, spawn};
