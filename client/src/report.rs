use std::fmt::Write;

use shared::{
    localization::Language,
    markers::{MarkerKind, marker_specs},
    number::to_fixed,
};

use crate::PlannedRoute;

/// Plain-text listing of a planned route, one line per waypoint.
pub fn render(route: &PlannedRoute, language: Language) -> String {
    let strings = language.strings();
    let mut out = String::new();

    let verdict = if route.is_reachable() {
        strings.reachable
    } else {
        strings.unreachable
    };
    let _ = writeln!(out, "{verdict} ({})", route.color.hex());

    let mut steps = route.charging_steps.iter();
    for (index, spec) in marker_specs(&route.plan, strings, false).iter().enumerate() {
        let at = spec
            .lat_lng
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        match spec.kind {
            MarkerKind::Start => {
                let _ = writeln!(out, "{index:>3}  start    {at}");
            }
            MarkerKind::End => {
                let _ = writeln!(out, "{index:>3}  end      {at}");
            }
            MarkerKind::Charger => {
                let _ = write!(out, "{index:>3}  charger  {at}");
                if let Some(step) = steps.next() {
                    let _ = write!(
                        out,
                        "  {}  {} kWh  {} min  {} $",
                        step.name,
                        to_fixed(step.energy, 1),
                        to_fixed(step.duration_minutes(), 0),
                        to_fixed(step.charging_cost, 2)
                    );
                }
                out.push('\n');
            }
        }
    }

    if route.totals.stops > 0 {
        let _ = writeln!(
            out,
            "total: {} stop(s), {} kWh, {} min, {} $",
            route.totals.stops,
            to_fixed(route.totals.energy, 1),
            to_fixed(route.totals.duration_minutes, 0),
            to_fixed(route.totals.cost, 2)
        );
    }
    out
}
