// Frameworks layer: runtime bootstrap, settings and logging.

pub mod config;
pub mod server;
