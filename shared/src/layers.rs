use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub label: &'static str,
    pub tile_url: &'static str,
    pub attribution: &'static str,
}

const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

pub const BASE_LAYERS: [TileLayer; 3] = [
    TileLayer {
        label: "OpenStreetMap",
        tile_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
        attribution: OSM_ATTRIBUTION,
    },
    TileLayer {
        label: "OpenStreetMap France",
        tile_url: "https://{s}.tile.openstreetmap.fr/osmfr/{z}/{x}/{y}.png",
        attribution: OSM_ATTRIBUTION,
    },
    TileLayer {
        label: "OpenTopoMap",
        tile_url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        attribution: "Map data: &copy; OpenStreetMap contributors, SRTM | Style: &copy; OpenTopoMap (CC-BY-SA)",
    },
];

pub const DEFAULT_BASE_LAYER: &str = "OpenStreetMap";

pub const OVERLAY: TileLayer = TileLayer {
    label: "Cycling routes",
    tile_url: "https://tile.waymarkedtrails.org/cycling/{z}/{x}/{y}.png",
    attribution: "&copy; waymarkedtrails.org",
};

pub fn base_layer(label: &str) -> Option<&'static TileLayer> {
    BASE_LAYERS.iter().find(|layer| layer.label == label)
}

pub fn default_base_layer() -> &'static TileLayer {
    base_layer(DEFAULT_BASE_LAYER).unwrap_or(&BASE_LAYERS[0])
}
