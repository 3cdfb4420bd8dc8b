use serde::{Deserialize, Serialize};

use crate::{Coordinate, localization::Language};

pub const MAX_ZOOM: u8 = 18;

/// Keys read from the page's query string.
pub const QUERY_KEYS: [&str; 5] = ["center", "z", "hl", "units", "loc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

/// Initial view and language of the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiOptions {
    pub center: Coordinate,
    pub zoom: u8,
    pub language: Language,
    pub units: Units,
    /// Initial waypoints from repeated `loc` parameters.
    pub waypoints: Vec<Coordinate>,
    /// Whether start and end markers can be dragged.
    pub draggable_waypoints: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            // Montréal
            center: Coordinate {
                lat: 45.53847,
                lon: -73.57225,
            },
            zoom: 8,
            language: Language::En,
            units: Units::Metric,
            waypoints: Vec::new(),
            draggable_waypoints: true,
        }
    }
}

impl UiOptions {
    /// Overlays query parameters on `self`. Values that fail to parse are skipped.
    pub fn merge_query<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut waypoints = Vec::new();
        for (key, value) in params {
            let value = value.as_ref();
            match key.as_ref() {
                "center" => {
                    if let Ok(center) = value.parse() {
                        self.center = center;
                    }
                }
                "z" => {
                    if let Ok(zoom) = value.trim().parse::<u8>() {
                        self.zoom = zoom.min(MAX_ZOOM);
                    }
                }
                "hl" => {
                    if let Some(language) = Language::from_code(value) {
                        self.language = language;
                    }
                }
                "units" => match value.trim() {
                    "metric" => self.units = Units::Metric,
                    "imperial" => self.units = Units::Imperial,
                    _ => {}
                },
                "loc" => {
                    if let Ok(coord) = value.parse() {
                        waypoints.push(coord);
                    }
                }
                _ => {}
            }
        }
        if !waypoints.is_empty() {
            self.waypoints = waypoints;
        }
        self
    }
}
