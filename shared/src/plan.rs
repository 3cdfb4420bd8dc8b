use serde::{Deserialize, Serialize};

use crate::{
    Coordinate,
    evnav::{ChargingStep, EvnavRequest, Itinerary, VehicleParams},
    markers::charging_popup,
};

/// A point the route must pass through.
///
/// A waypoint without a location is an empty slot waiting for a click or a
/// geocoder result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat_lng: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup_content: Option<String>,
    #[serde(default)]
    pub is_charger: bool,
}

impl Waypoint {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn at(coord: Coordinate) -> Self {
        Self {
            lat_lng: Some(coord),
            ..Self::default()
        }
    }

    pub fn named(coord: Coordinate, name: impl Into<String>) -> Self {
        Self {
            lat_lng: Some(coord),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn charger(step: &ChargingStep) -> Self {
        Self {
            lat_lng: Some(step.coordinate()),
            name: Some(step.name.clone()),
            popup_content: Some(charging_popup(step)),
            is_charger: true,
        }
    }

    pub fn is_located(&self) -> bool {
        self.lat_lng.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteColor {
    #[default]
    Reachable,
    Unreachable,
}

impl RouteColor {
    pub fn hex(self) -> &'static str {
        match self {
            RouteColor::Reachable => "#022bb1",
            RouteColor::Unreachable => "#b10214",
        }
    }
}

/// Ordered waypoint list backing the routing-plan widget.
///
/// There are always at least two slots (start and end), either of which may
/// still be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    waypoints: Vec<Waypoint>,
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

impl Plan {
    pub fn new() -> Self {
        Self {
            waypoints: vec![Waypoint::empty(), Waypoint::empty()],
        }
    }

    pub fn from_waypoints(waypoints: Vec<Waypoint>) -> Self {
        let mut plan = Self { waypoints };
        plan.pad();
        plan
    }

    pub fn from_endpoints(start: Coordinate, end: Coordinate) -> Self {
        Self::from_waypoints(vec![Waypoint::at(start), Waypoint::at(end)])
    }

    fn pad(&mut self) {
        while self.waypoints.len() < 2 {
            self.waypoints.push(Waypoint::empty());
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn has_no_located_waypoint(&self) -> bool {
        self.located_count() == 0
    }

    pub fn located_count(&self) -> usize {
        self.waypoints.iter().filter(|wp| wp.is_located()).count()
    }

    pub fn charging_stops(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter().filter(|wp| wp.is_charger)
    }

    /// First and last coordinates, when both are set.
    pub fn endpoints(&self) -> Option<(Coordinate, Coordinate)> {
        let start = self.waypoints.first()?.lat_lng?;
        let end = self.waypoints.last()?.lat_lng?;
        Some((start, end))
    }

    pub fn set_waypoints(&mut self, waypoints: Vec<Waypoint>) {
        self.waypoints = waypoints;
        self.pad();
    }

    /// Replaces the waypoint at `index`, appending if the index is one past the end.
    pub fn set_waypoint(&mut self, index: usize, waypoint: Waypoint) {
        match self.waypoints.get_mut(index) {
            Some(slot) => *slot = waypoint,
            None => self.waypoints.push(waypoint),
        }
    }

    /// Places a map click and returns the slot it landed in.
    ///
    /// The first click fills the start, the second the end; later clicks move
    /// the last located waypoint instead of appending a new one.
    pub fn place_click(&mut self, coord: Coordinate) -> usize {
        let located = self.located_count();
        let index = if located == 0 { 0 } else { located.max(2) - 1 };
        self.set_waypoint(index, Waypoint::at(coord));
        index
    }

    pub fn evnav_request(&self, vehicle: VehicleParams) -> Option<EvnavRequest> {
        let (src, dst) = self.endpoints()?;
        Some(EvnavRequest { src, dst, vehicle })
    }

    /// Rebuilds the waypoint list around the current endpoints.
    ///
    /// Returns the color the route line should take, or `None` if the plan has
    /// no located endpoints to rebuild around.
    pub fn apply_itinerary(&mut self, itinerary: &Itinerary) -> Option<RouteColor> {
        self.endpoints()?;
        let start = self.waypoints.first().cloned().unwrap_or_default();
        let end = self.waypoints.last().cloned().unwrap_or_default();

        let (middle, color) = match itinerary {
            Itinerary::Reachable { charging_steps } => (
                charging_steps.iter().map(Waypoint::charger).collect(),
                RouteColor::Reachable,
            ),
            Itinerary::Unreachable => (Vec::new(), RouteColor::Unreachable),
        };

        let mut waypoints = Vec::with_capacity(middle.len() + 2);
        waypoints.push(start);
        waypoints.extend(middle);
        waypoints.push(end);
        self.waypoints = waypoints;
        Some(color)
    }
}
