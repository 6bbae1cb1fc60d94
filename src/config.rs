//! Runtime configuration read from the environment
//!
//! # Environment Variables
//!
//! - `HOST` - Bind address (default: 127.0.0.1, this is a single-user tool)
//! - `PORT` - Server port number (default: 8080)
//! - `DATABASE_URL` - Path to the storage file, or `:memory:` (default: "utm.db")

use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "utm.db".to_string(),
        }
    }
}

impl Config {
    /// Reads the configuration, falling back to defaults for missing or bad values
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
