use crate::global_variables::DEFAULT_ROUTE_NAME;
use serde::{Deserialize, Serialize};

/// A single (latitude, longitude) point on the simulated route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "WaypointRepr")]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

/// Config files may list waypoints either as `[lat, lng]` pairs or as objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum WaypointRepr {
    Pair(f64, f64),
    Object { lat: f64, lng: f64 },
}

impl From<WaypointRepr> for Waypoint {
    fn from(repr: WaypointRepr) -> Self {
        match repr {
            WaypointRepr::Pair(lat, lng) | WaypointRepr::Object { lat, lng } => {
                Waypoint::new(lat, lng)
            }
        }
    }
}

impl Waypoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.lat, self.lng)
    }
}

/// Ordered, read-only sequence of waypoints with a label for the start banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub waypoints: Vec<Waypoint>,
}

impl Route {
    pub fn new(name: impl Into<String>, waypoints: Vec<Waypoint>) -> Self {
        Self {
            name: name.into(),
            waypoints,
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }
}

/// Benz Circle to Ramesh Hospital along MG Road.
pub fn create_default_route() -> Route {
    Route::new(
        DEFAULT_ROUTE_NAME,
        vec![
            Waypoint::new(16.5080, 80.6500), // approaching Benz Circle
            Waypoint::new(16.5070, 80.6490),
            Waypoint::new(16.5062, 80.6480), // Benz Circle signal
            Waypoint::new(16.5050, 80.6460), // MG Road
            Waypoint::new(16.5040, 80.6440),
            Waypoint::new(16.5030, 80.6420),
            Waypoint::new(16.5020, 80.6400), // Ramesh Hospital
            Waypoint::new(16.5020, 80.6400), // stopped
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waypoint_accepts_pair_and_object() {
        let pair: Waypoint = serde_json::from_str("[16.5062, 80.648]").unwrap();
        let object: Waypoint = serde_json::from_str(r#"{"lat": 16.5062, "lng": 80.648}"#).unwrap();
        assert_eq!(pair, object);
        assert_eq!(pair, Waypoint::new(16.5062, 80.648));
    }

    #[test]
    fn display_rounds_to_four_places() {
        assert_eq!(
            Waypoint::new(16.50617, -80.1).to_string(),
            "[16.5062, -80.1000]".to_string()
        );
    }

    #[test]
    fn out_of_range_waypoints_are_invalid() {
        assert!(Waypoint::new(16.5, 80.6).is_valid());
        assert!(!Waypoint::new(91.0, 0.0).is_valid());
        assert!(!Waypoint::new(0.0, -180.5).is_valid());
        assert!(!Waypoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn default_route_ends_at_hospital() {
        let route = create_default_route();
        assert_eq!(route.len(), 8);
        assert_eq!(route.waypoints.last(), Some(&Waypoint::new(16.5020, 80.6400)));
    }
}
