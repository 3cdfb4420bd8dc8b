//! Wire types and request construction for the evnav charging-stop service.
//!
//! The service answers `GET /route/v1/evnav/{lon},{lat};{lon},{lat}?...` with a
//! status code, a reachability message and the ordered list of charging steps
//! the vehicle needs between the two endpoints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Coordinate;

pub const DEFAULT_EVNAV_ROOT: &str = "http://localhost:8080";
pub const EVNAV_PATH: &str = "/route/v1/evnav";

const STATUS_OK: &str = "Ok";
const REACHABLE: &str = "reachable";

#[derive(Debug, Error)]
pub enum EvnavError {
    #[error("evnav answered with status {code:?}: {message}")]
    Status { code: String, message: String },
    #[error("invalid vehicle parameters: {0}")]
    Vehicle(String),
}

/// Battery and consumption figures sent along with every request.
///
/// State-of-charge values are fractions of the battery capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    /// Usable capacity in kWh.
    pub battery: f64,
    #[serde(rename = "SOC_act")]
    pub soc_act: f64,
    #[serde(rename = "SOC_min")]
    pub soc_min: f64,
    #[serde(rename = "SOC_max")]
    pub soc_max: f64,
    /// Consumption in kWh/km.
    pub efficiency: f64,
    /// Average charging power in kW.
    pub power_avg: f64,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            battery: 21.0,
            soc_act: 1.0,
            soc_min: 0.1,
            soc_max: 0.8,
            efficiency: 0.190,
            power_avg: 33.0,
        }
    }
}

impl VehicleParams {
    pub fn validate(&self) -> Result<(), EvnavError> {
        let fraction = |value: f64, label: &str| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(EvnavError::Vehicle(format!("{label} must lie in 0..=1, got {value}")))
            }
        };
        let positive = |value: f64, label: &str| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(EvnavError::Vehicle(format!("{label} must be positive, got {value}")))
            }
        };

        positive(self.battery, "battery")?;
        positive(self.efficiency, "efficiency")?;
        positive(self.power_avg, "power_avg")?;
        fraction(self.soc_act, "SOC_act")?;
        fraction(self.soc_min, "SOC_min")?;
        fraction(self.soc_max, "SOC_max")?;
        if self.soc_min > self.soc_max {
            return Err(EvnavError::Vehicle(format!(
                "SOC_min ({}) exceeds SOC_max ({})",
                self.soc_min, self.soc_max
            )));
        }
        Ok(())
    }

    fn query(&self) -> String {
        format!(
            "battery={}&SOC_act={}&SOC_min={}&SOC_max={}&efficiency={}&power_avg={}",
            self.battery, self.soc_act, self.soc_min, self.soc_max, self.efficiency, self.power_avg
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvnavRequest {
    pub src: Coordinate,
    pub dst: Coordinate,
    pub vehicle: VehicleParams,
}

impl EvnavRequest {
    /// Full request URL below `root` (scheme and authority, trailing slash optional).
    pub fn url(&self, root: &str) -> String {
        format!(
            "{}{}/{};{}?{}",
            root.trim_end_matches('/'),
            EVNAV_PATH,
            lon_lat(self.src),
            lon_lat(self.dst),
            self.vehicle.query()
        )
    }
}

fn lon_lat(coord: Coordinate) -> String {
    format!("{},{}", coord.lon, coord.lat)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargingStep {
    /// `[lon, lat]`
    pub location: [f64; 2],
    #[serde(default)]
    pub name: String,
    /// kWh charged at this stop.
    pub energy: f64,
    /// Seconds.
    pub charging_duration: f64,
    pub charging_cost: f64,
}

impl ChargingStep {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::from_lon_lat(self.location)
    }

    pub fn duration_minutes(&self) -> f64 {
        self.charging_duration / 60.0
    }
}

/// Sums over every charging stop of an itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ChargingTotals {
    pub stops: usize,
    pub energy: f64,
    pub duration_minutes: f64,
    pub cost: f64,
}

impl ChargingTotals {
    pub fn from_steps(steps: &[ChargingStep]) -> Self {
        steps.iter().fold(Self::default(), |acc, step| Self {
            stops: acc.stops + 1,
            energy: acc.energy + step.energy,
            duration_minutes: acc.duration_minutes + step.duration_minutes(),
            cost: acc.cost + step.charging_cost,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvnavResponse {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub charging_steps: Vec<ChargingStep>,
}

/// What a successful answer means for the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Itinerary {
    Reachable { charging_steps: Vec<ChargingStep> },
    Unreachable,
}

impl EvnavResponse {
    /// Any status other than `Ok` is an error; within `Ok`, only the
    /// `reachable` message yields charging stops.
    pub fn into_itinerary(self) -> Result<Itinerary, EvnavError> {
        if self.code != STATUS_OK {
            return Err(EvnavError::Status {
                code: self.code,
                message: self.message,
            });
        }
        if self.message == REACHABLE {
            Ok(Itinerary::Reachable {
                charging_steps: self.charging_steps,
            })
        } else {
            Ok(Itinerary::Unreachable)
        }
    }
}

/// Tags outgoing requests so that only the answer to the latest one is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, id: u64) -> bool {
        id == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn montreal() -> Coordinate {
        Coordinate {
            lat: 45.53847,
            lon: -73.57225,
        }
    }

    fn quebec() -> Coordinate {
        Coordinate {
            lat: 46.79206,
            lon: -71.28751,
        }
    }

    #[test]
    fn url_puts_longitude_first_and_appends_vehicle_params() {
        let request = EvnavRequest {
            src: montreal(),
            dst: quebec(),
            vehicle: VehicleParams::default(),
        };
        assert_eq!(
            request.url("http://localhost:8080/"),
            "http://localhost:8080/route/v1/evnav/-73.57225,45.53847;-71.28751,46.79206\
             ?battery=21&SOC_act=1&SOC_min=0.1&SOC_max=0.8&efficiency=0.19&power_avg=33"
        );
    }

    #[test]
    fn reachable_response_keeps_steps_in_order() {
        let body = r#"{
            "code": "Ok",
            "message": "reachable",
            "charging_steps": [
                {"location": [-72.9, 45.9], "name": "Drummondville", "energy": 10.5,
                 "charging_duration": 1200, "charging_cost": 3.2},
                {"location": [-72.0, 46.3], "name": "Laurier", "energy": 8.0,
                 "charging_duration": 900, "charging_cost": 2.5}
            ]
        }"#;
        let response: EvnavResponse = serde_json::from_str(body).unwrap();
        match response.into_itinerary().unwrap() {
            Itinerary::Reachable { charging_steps } => {
                let names: Vec<_> = charging_steps.iter().map(|s| s.name.as_str()).collect();
                assert_eq!(names, ["Drummondville", "Laurier"]);
                assert_eq!(charging_steps[0].coordinate().lat, 45.9);
                assert_eq!(charging_steps[1].duration_minutes(), 15.0);
            }
            other => panic!("expected reachable, got {other:?}"),
        }
    }

    #[test]
    fn other_messages_are_unreachable() {
        let response: EvnavResponse =
            serde_json::from_str(r#"{"code": "Ok", "message": "unreachable"}"#).unwrap();
        assert_eq!(response.into_itinerary().unwrap(), Itinerary::Unreachable);
    }

    #[test]
    fn non_ok_code_is_an_error() {
        let response: EvnavResponse =
            serde_json::from_str(r#"{"code": "NoRoute", "message": "no route found"}"#).unwrap();
        let err = response.into_itinerary().unwrap_err();
        assert!(matches!(err, EvnavError::Status { ref code, .. } if code == "NoRoute"));
    }

    #[test]
    fn totals_sum_every_stop() {
        let steps = [
            ChargingStep {
                location: [0.0, 0.0],
                name: "a".into(),
                energy: 10.0,
                charging_duration: 600.0,
                charging_cost: 2.0,
            },
            ChargingStep {
                location: [1.0, 1.0],
                name: "b".into(),
                energy: 5.5,
                charging_duration: 1200.0,
                charging_cost: 1.25,
            },
        ];
        let totals = ChargingTotals::from_steps(&steps);
        assert_eq!(totals.stops, 2);
        assert_eq!(totals.energy, 15.5);
        assert_eq!(totals.duration_minutes, 30.0);
        assert_eq!(totals.cost, 3.25);
        assert_eq!(ChargingTotals::from_steps(&[]), ChargingTotals::default());
    }

    #[test]
    fn vehicle_validation() {
        assert!(VehicleParams::default().validate().is_ok());
        let inverted = VehicleParams {
            soc_min: 0.9,
            soc_max: 0.2,
            ..VehicleParams::default()
        };
        assert!(inverted.validate().is_err());
        let empty = VehicleParams {
            battery: 0.0,
            ..VehicleParams::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn only_latest_request_is_current() {
        let mut sequence = RequestSequence::default();
        let first = sequence.next();
        let second = sequence.next();
        assert!(!sequence.is_current(first));
        assert!(sequence.is_current(second));
    }
}
