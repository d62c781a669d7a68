//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono_tz::Tz;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SCHEDULE_PATH: &str = "data/schedule.json";
const DEFAULT_OSRM_URL: &str = "http://router.project-osrm.org";
const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Errors reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid socket address {value:?}")]
    BindAddr { var: &'static str, value: String },

    #[error("{var}: unknown time zone {value:?}")]
    TimeZone { var: &'static str, value: String },

    #[error("{var}: expected a whole number, got {value:?}")]
    Number { var: &'static str, value: String },
}

/// Everything the binary needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Zone in which "today" and "now" are evaluated
    pub timezone: Tz,
    /// JSON schedule snapshot to load at startup
    pub schedule_path: PathBuf,
    pub osrm_url: String,
    pub overpass_url: String,
    /// Timeout for outbound HTTP calls
    pub http_timeout_secs: u64,
    /// Pending traffic confirmations before new ones are dropped
    pub confirmation_queue: usize,
    /// Confirmations allowed to call the road service at once
    pub confirmation_concurrency: usize,
}

impl ServerConfig {
    pub fn new() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            timezone: chrono_tz::Asia::Kolkata,
            schedule_path: PathBuf::from(DEFAULT_SCHEDULE_PATH),
            osrm_url: DEFAULT_OSRM_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            http_timeout_secs: 10,
            confirmation_queue: 256,
            confirmation_concurrency: 4,
        }
    }

    /// Read `TRANSIT_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new();

        let var = "TRANSIT_BIND_ADDR";
        let addr = lookup(var).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let addr = addr
            .parse()
            .map_err(|_| ConfigError::BindAddr { var, value: addr })?;
        config = config.with_bind_addr(addr);

        if let Some(value) = lookup("TRANSIT_TIMEZONE") {
            let tz = value.parse().map_err(|_| ConfigError::TimeZone {
                var: "TRANSIT_TIMEZONE",
                value,
            })?;
            config = config.with_timezone(tz);
        }
        if let Some(path) = lookup("TRANSIT_SCHEDULE_PATH") {
            config = config.with_schedule_path(path);
        }
        if let Some(url) = lookup("TRANSIT_OSRM_URL") {
            config = config.with_osrm_url(url);
        }
        if let Some(url) = lookup("TRANSIT_OVERPASS_URL") {
            config = config.with_overpass_url(url);
        }
        if let Some(secs) = number(&lookup, "TRANSIT_HTTP_TIMEOUT_SECS")? {
            config = config.with_http_timeout(secs);
        }
        if let Some(n) = number(&lookup, "TRANSIT_CONFIRMATION_QUEUE")? {
            config = config.with_confirmation_queue(n as usize);
        }
        if let Some(n) = number(&lookup, "TRANSIT_CONFIRMATION_CONCURRENCY")? {
            config = config.with_confirmation_concurrency(n as usize);
        }

        Ok(config)
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    pub fn with_schedule_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schedule_path = path.into();
        self
    }

    pub fn with_osrm_url(mut self, url: impl Into<String>) -> Self {
        self.osrm_url = url.into();
        self
    }

    pub fn with_overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
        self
    }

    pub fn with_http_timeout(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }

    pub fn with_confirmation_queue(mut self, capacity: usize) -> Self {
        self.confirmation_queue = capacity.max(1);
        self
    }

    pub fn with_confirmation_concurrency(mut self, n: usize) -> Self {
        self.confirmation_concurrency = n.max(1);
        self
    }
}

/// A whole-number variable, if set.
fn number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    lookup(var)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Number { var, value })
        })
        .transpose()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
