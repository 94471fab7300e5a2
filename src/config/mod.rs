/// Database configuration and connection management
pub mod database;

/// Presentation settings loading from config.toml
pub mod settings;
