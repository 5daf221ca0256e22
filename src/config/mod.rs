pub mod config;

pub use self::config::{ChainsConfig, Config, LogConfig, WaitConfig};
