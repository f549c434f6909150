// config.rs
//
// Start-up configuration for the simulator. Values are layered, lowest to
// highest precedence: compiled-in defaults, a JSON config file, a CSV route
// file, then individual environment variables. The result is validated once
// and stays immutable for the run.

use crate::global_variables::{
    DEFAULT_ENDPOINT, DEFAULT_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS, DEFAULT_VEHICLE_ID,
    ENV_CONFIG_FILE, ENV_ENDPOINT, ENV_INTERVAL_SECS, ENV_ROUTE_CSV, ENV_ROUTE_NAME,
    ENV_TIMEOUT_SECS, ENV_VEHICLE_ID,
};
use crate::models::route::{create_default_route, Route, Waypoint};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Longest accepted request timeout (one day); larger deadlines overflow `Instant`.
pub const MAX_TIMEOUT_SECS: f64 = 86_400.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid route file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{key} has an invalid value {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("endpoint {0:?} must be an http:// or https:// URL")]
    InvalidEndpoint(String),
    #[error("vehicle id must not be empty")]
    EmptyVehicleId,
    #[error("route must contain at least one waypoint")]
    EmptyRoute,
    #[error("waypoint #{index} ({lat}, {lng}) is out of range")]
    InvalidWaypoint { index: usize, lat: f64, lng: f64 },
    #[error("interval must be a non-negative number of seconds, got {0}")]
    InvalidInterval(f64),
    #[error("timeout must be between 0 and 86400 seconds, got {0}")]
    InvalidTimeout(f64),
}

/// Everything the simulator needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorConfig {
    pub endpoint: String,
    pub vehicle_id: String,
    pub route: Route,
    pub interval_seconds: f64,
    pub timeout_seconds: f64,
}

/// Shape of the JSON config file; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    vehicle_id: Option<String>,
    route_name: Option<String>,
    route: Option<Vec<Waypoint>>,
    interval_seconds: Option<f64>,
    timeout_seconds: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CsvWaypoint {
    lat: f64,
    lng: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            vehicle_id: DEFAULT_VEHICLE_ID.to_string(),
            route: create_default_route(),
            interval_seconds: DEFAULT_INTERVAL_SECS,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SimulatorConfig {
    /// Builds the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SimulatorConfig::load`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = non_empty(lookup(ENV_CONFIG_FILE)) {
            info!("Loading simulator config from {}", path);
            config.merge_file(Path::new(&path))?;
        }
        if let Some(path) = non_empty(lookup(ENV_ROUTE_CSV)) {
            info!("Loading route waypoints from {}", path);
            config.route.waypoints = load_route_csv(Path::new(&path))?;
        }
        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_json(&contents)
            .map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Layers a JSON config document over the current values.
    fn merge_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let file: FileConfig = serde_json::from_str(json)?;
        self.merge(file);
        Ok(())
    }

    fn merge(&mut self, file: FileConfig) {
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(vehicle_id) = file.vehicle_id {
            self.vehicle_id = vehicle_id;
        }
        if let Some(name) = file.route_name {
            self.route.name = name;
        }
        if let Some(waypoints) = file.route {
            self.route.waypoints = waypoints;
        }
        if let Some(interval) = file.interval_seconds {
            self.interval_seconds = interval;
        }
        if let Some(timeout) = file.timeout_seconds {
            self.timeout_seconds = timeout;
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = non_empty(lookup(ENV_ENDPOINT)) {
            self.endpoint = endpoint;
        }
        if let Some(vehicle_id) = non_empty(lookup(ENV_VEHICLE_ID)) {
            self.vehicle_id = vehicle_id;
        }
        if let Some(name) = non_empty(lookup(ENV_ROUTE_NAME)) {
            self.route.name = name;
        }
        if let Some(raw) = non_empty(lookup(ENV_INTERVAL_SECS)) {
            self.interval_seconds = parse_seconds(ENV_INTERVAL_SECS, &raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_TIMEOUT_SECS)) {
            self.timeout_seconds = parse_seconds(ENV_TIMEOUT_SECS, &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        if self.vehicle_id.trim().is_empty() {
            return Err(ConfigError::EmptyVehicleId);
        }
        if self.route.is_empty() {
            return Err(ConfigError::EmptyRoute);
        }
        if let Some((index, wp)) = self.route.iter().enumerate().find(|(_, wp)| !wp.is_valid()) {
            return Err(ConfigError::InvalidWaypoint {
                index,
                lat: wp.lat,
                lng: wp.lng,
            });
        }
        if self.interval_seconds < 0.0 || Duration::try_from_secs_f64(self.interval_seconds).is_err()
        {
            return Err(ConfigError::InvalidInterval(self.interval_seconds));
        }
        if !(self.timeout_seconds > 0.0 && self.timeout_seconds <= MAX_TIMEOUT_SECS) {
            return Err(ConfigError::InvalidTimeout(self.timeout_seconds));
        }
        Ok(())
    }

    /// Pause between two consecutive updates.
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_seconds).unwrap_or_default()
    }

    /// Upper bound for one request, connect through body read.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS))
    }
}

/// Reads a `lat,lng` CSV file (with header) into waypoints, in file order.
pub fn load_route_csv(path: &Path) -> Result<Vec<Waypoint>, ConfigError> {
    let csv_err = |source: csv::Error| ConfigError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;
    let mut waypoints = Vec::new();
    for result in rdr.deserialize::<CsvWaypoint>() {
        let record = result.map_err(csv_err)?;
        waypoints.push(Waypoint::new(record.lat, record.lng));
    }
    Ok(waypoints)
}

fn parse_seconds(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
