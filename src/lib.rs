pub mod domain;
pub mod frameworks;
pub mod interface_adapters;
pub mod use_cases;

pub use frameworks::config::{ConfigError, GameSettings};
pub use frameworks::server::{ServerError, run, run_with_config};
