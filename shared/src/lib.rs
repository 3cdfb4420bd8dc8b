pub mod evnav;
pub mod layers;
pub mod localization;
pub mod markers;
pub mod number;
pub mod options;
pub mod plan;
pub mod preferences;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use evnav::{
    ChargingStep, ChargingTotals, EvnavError, EvnavRequest, EvnavResponse, Itinerary,
    RequestSequence, VehicleParams,
};
pub use plan::{Plan, RouteColor, Waypoint};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Builds a coordinate from the `[lon, lat]` pairs the evnav service emits.
    pub fn from_lon_lat([lon, lat]: [f64; 2]) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateParseError {
    #[error("expected `lat,lon`, got {0:?}")]
    Shape(String),
    #[error("invalid number {0:?}")]
    Number(String),
    #[error("coordinate out of range: {0}")]
    OutOfRange(Coordinate),
}

/// Parses the `lat,lon` form used in query strings and on the command line.
impl FromStr for Coordinate {
    type Err = CoordinateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordinateParseError::Shape(s.to_string()))?;
        let parse = |field: &str| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| CoordinateParseError::Number(field.trim().to_string()))
        };
        let coord = Coordinate {
            lat: parse(lat)?,
            lon: parse(lon)?,
        };
        if !coord.is_valid() {
            return Err(CoordinateParseError::OutOfRange(coord));
        }
        Ok(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lat_lon_pair() {
        let coord: Coordinate = "45.53847, -73.57225".parse().unwrap();
        assert_eq!(coord.lat, 45.53847);
        assert_eq!(coord.lon, -73.57225);
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(matches!(
            "45.5".parse::<Coordinate>(),
            Err(CoordinateParseError::Shape(_))
        ));
        assert!(matches!(
            "north,-73.5".parse::<Coordinate>(),
            Err(CoordinateParseError::Number(_))
        ));
        assert!(matches!(
            "95.0,10.0".parse::<Coordinate>(),
            Err(CoordinateParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn lon_lat_pairs_are_swapped_into_place() {
        let coord = Coordinate::from_lon_lat([-71.28751, 46.79206]);
        assert_eq!(coord.lat, 46.79206);
        assert_eq!(coord.lon, -71.28751);
    }
}
