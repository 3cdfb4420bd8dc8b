//! Marker icons and popups for the plan's waypoints.

use serde::Serialize;

use crate::{
    Coordinate, evnav::ChargingStep, localization::Strings, number::to_fixed, plan::Plan,
};

const START_ICON: &str = "images/marker-start-icon-2x.png";
const END_ICON: &str = "images/marker-end-icon-2x.png";
const CHARGER_ICON: &str = "images/marker-charger-icon-2x.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Start,
    End,
    Charger,
}

impl MarkerKind {
    /// Index 0 is the start, the last index the end, anything between a charger.
    pub fn for_index(index: usize, count: usize) -> Self {
        if index == 0 {
            MarkerKind::Start
        } else if index + 1 == count {
            MarkerKind::End
        } else {
            MarkerKind::Charger
        }
    }

    pub fn icon(self) -> MarkerIcon {
        match self {
            MarkerKind::Start => MarkerIcon {
                icon_url: START_ICON,
                icon_size: [20, 56],
                icon_anchor: [10, 28],
                popup_anchor: None,
            },
            MarkerKind::End => MarkerIcon {
                icon_url: END_ICON,
                icon_size: [20, 56],
                icon_anchor: [10, 28],
                popup_anchor: None,
            },
            MarkerKind::Charger => MarkerIcon {
                icon_url: CHARGER_ICON,
                icon_size: [25, 70],
                icon_anchor: [10, 36],
                popup_anchor: Some([2, -36]),
            },
        }
    }
}

/// Options handed to `L.icon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerIcon {
    pub icon_url: &'static str,
    pub icon_size: [u32; 2],
    pub icon_anchor: [i32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_anchor: Option<[i32; 2]>,
}

/// Everything the map glue needs to draw one waypoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub lat_lng: Option<Coordinate>,
    pub kind: MarkerKind,
    pub icon: MarkerIcon,
    pub draggable: bool,
    pub popup: Option<String>,
    pub placeholder: &'static str,
}

pub fn marker_specs(plan: &Plan, strings: &Strings, draggable_waypoints: bool) -> Vec<MarkerSpec> {
    let count = plan.len();
    plan.waypoints()
        .iter()
        .enumerate()
        .map(|(index, wp)| {
            let kind = MarkerKind::for_index(index, count);
            MarkerSpec {
                lat_lng: wp.lat_lng,
                kind,
                icon: kind.icon(),
                // Chargers stay where the service put them.
                draggable: draggable_waypoints && kind != MarkerKind::Charger,
                popup: match kind {
                    MarkerKind::Charger => wp.popup_content.clone(),
                    _ => None,
                },
                placeholder: strings.geocoder_placeholder(index, count),
            }
        })
        .collect()
}

pub fn charging_popup(step: &ChargingStep) -> String {
    let mut content = String::from("<ul class='list-group'>");
    content.push_str(&format!(
        "<li class='list-group-item active'>{}</li>",
        escape_html(&step.name)
    ));
    content.push_str(&format!(
        "<li class='list-group-item'>Énergie: <span class='badge'>{} kWh</span></li>",
        to_fixed(step.energy, 1)
    ));
    content.push_str(&format!(
        "<li class='list-group-item'>Durée: <span class='badge'>{} min</span></li>",
        to_fixed(step.duration_minutes(), 0)
    ));
    content.push_str(&format!(
        "<li class='list-group-item'>Coût: <span class='badge'>{} $</span></li>",
        to_fixed(step.charging_cost, 2)
    ));
    content.push_str("</ul>");
    content
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{evnav::Itinerary, localization::Language};

    fn step(name: &str) -> ChargingStep {
        ChargingStep {
            location: [-72.48, 45.88],
            name: name.to_string(),
            energy: 12.345,
            charging_duration: 1560.0,
            charging_cost: 4.5,
        }
    }

    #[test]
    fn icon_kind_depends_only_on_position() {
        assert_eq!(MarkerKind::for_index(0, 2), MarkerKind::Start);
        assert_eq!(MarkerKind::for_index(1, 2), MarkerKind::End);
        assert_eq!(MarkerKind::for_index(1, 4), MarkerKind::Charger);
        assert_eq!(MarkerKind::for_index(2, 4), MarkerKind::Charger);
        assert_eq!(MarkerKind::for_index(3, 4), MarkerKind::End);
        // A lone waypoint is a start, not an end.
        assert_eq!(MarkerKind::for_index(0, 1), MarkerKind::Start);
    }

    #[test]
    fn charger_icon_has_popup_anchor() {
        let icon = MarkerKind::Charger.icon();
        assert_eq!(icon.icon_size, [25, 70]);
        assert_eq!(icon.popup_anchor, Some([2, -36]));
        assert!(MarkerKind::Start.icon().popup_anchor.is_none());
    }

    #[test]
    fn popup_formats_energy_duration_and_cost() {
        let popup = charging_popup(&step("Saint-Hyacinthe"));
        assert!(popup.starts_with("<ul class='list-group'>"));
        assert!(popup.contains("<li class='list-group-item active'>Saint-Hyacinthe</li>"));
        assert!(popup.contains("12.3 kWh"));
        assert!(popup.contains("26 min"));
        assert!(popup.contains("4.50 $"));
        assert!(popup.ends_with("</ul>"));
    }

    #[test]
    fn popup_rounds_halves_up() {
        let popup = charging_popup(&ChargingStep {
            energy: 12.25,
            charging_duration: 150.0,
            charging_cost: 0.125,
            ..step("Granby")
        });
        assert!(popup.contains("<span class='badge'>12.3 kWh</span>"));
        assert!(popup.contains("<span class='badge'>3 min</span>"));
        assert!(popup.contains("<span class='badge'>0.13 $</span>"));
    }

    #[test]
    fn popup_escapes_station_name() {
        let popup = charging_popup(&step("<b>Tim & Co</b>"));
        assert!(popup.contains("&lt;b&gt;Tim &amp; Co&lt;/b&gt;"));
    }

    #[test]
    fn only_endpoints_are_draggable_and_only_chargers_have_popups() {
        let mut plan = Plan::from_endpoints(
            Coordinate { lat: 45.5, lon: -73.5 },
            Coordinate { lat: 46.8, lon: -71.2 },
        );
        plan.apply_itinerary(&Itinerary::Reachable {
            charging_steps: vec![step("A")],
        });

        let specs = marker_specs(&plan, Language::En.strings(), true);
        let kinds: Vec<_> = specs.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, [MarkerKind::Start, MarkerKind::Charger, MarkerKind::End]);
        assert!(specs[0].draggable && specs[2].draggable);
        assert!(!specs[1].draggable);
        assert!(specs[0].popup.is_none());
        assert!(specs[1].popup.is_some());

        let locked = marker_specs(&plan, Language::En.strings(), false);
        assert!(locked.iter().all(|s| !s.draggable));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn index_and_count() -> impl Strategy<Value = (usize, usize)> {
            (2usize..32).prop_flat_map(|count| (0..count, Just(count)))
        }

        proptest! {
            #[test]
            fn prop_kind_follows_position((index, count) in index_and_count()) {
                let kind = MarkerKind::for_index(index, count);
                if index == 0 {
                    prop_assert_eq!(kind, MarkerKind::Start);
                } else if index == count - 1 {
                    prop_assert_eq!(kind, MarkerKind::End);
                } else {
                    prop_assert_eq!(kind, MarkerKind::Charger);
                }
            }

            #[test]
            fn prop_only_endpoints_are_draggable(stops in 0usize..12) {
                let mut plan = Plan::from_endpoints(
                    Coordinate { lat: 45.5, lon: -73.5 },
                    Coordinate { lat: 46.8, lon: -71.2 },
                );
                plan.apply_itinerary(&Itinerary::Reachable {
                    charging_steps: (0..stops).map(|i| step(&format!("stop {i}"))).collect(),
                });

                let specs = marker_specs(&plan, Language::En.strings(), true);
                prop_assert_eq!(specs.len(), stops + 2);
                let last = specs.len() - 1;
                for (index, spec) in specs.iter().enumerate() {
                    prop_assert_eq!(spec.draggable, index == 0 || index == last);
                }
            }
        }
    }
}
