// Backend endpoint receiving live location updates
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/vehicle/update";

// AP registration of the simulated ambulance (Vijayawada)
pub const DEFAULT_VEHICLE_ID: &str = "AP16-AMB-9999";
pub const DEFAULT_ROUTE_NAME: &str = "Benz Circle -> Ramesh Hospital (Vijayawada)";

// Pacing and network limits
pub const DEFAULT_INTERVAL_SECS: f64 = 2.0;
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;

// Environment variables
pub const ENV_CONFIG_FILE: &str = "MARG_SIM_CONFIG";
pub const ENV_ROUTE_CSV: &str = "MARG_SIM_ROUTE_CSV";
pub const ENV_ENDPOINT: &str = "MARG_SIM_ENDPOINT";
pub const ENV_VEHICLE_ID: &str = "MARG_SIM_VEHICLE_ID";
pub const ENV_ROUTE_NAME: &str = "MARG_SIM_ROUTE_NAME";
pub const ENV_INTERVAL_SECS: &str = "MARG_SIM_INTERVAL_SECS";
pub const ENV_TIMEOUT_SECS: &str = "MARG_SIM_TIMEOUT_SECS";
