mod storage;

use seed::{prelude::*, *};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_wasm_bindgen::to_value;
use shared::{
    ChargingStep, ChargingTotals, Coordinate, EvnavResponse, Itinerary, Plan, RequestSequence,
    RouteColor, VehicleParams, Waypoint,
    evnav::DEFAULT_EVNAV_ROOT,
    layers::{BASE_LAYERS, OVERLAY, TileLayer},
    localization::Strings,
    markers::marker_specs,
    number::to_fixed,
    options::{QUERY_KEYS, Units, UiOptions},
    preferences::{LayerEvent, LayerPreferences},
};
use wasm_bindgen::{
    JsCast,
    prelude::{JsValue, wasm_bindgen},
};

use crate::storage::BrowserStore;

#[wasm_bindgen(module = "/leaflet_map.js")]
extern "C" {
    #[wasm_bindgen(js_name = initMap)]
    fn init_map(config: JsValue);
    #[wasm_bindgen(js_name = setWaypoints)]
    fn set_waypoints_js(markers: JsValue);
    #[wasm_bindgen(js_name = setRouteColor)]
    fn set_route_color(color: &str);
    #[wasm_bindgen(js_name = panTo)]
    fn pan_to(coord: JsValue);
}

fn evnav_root() -> String {
    if let Some(url) = option_env!("FRONTEND_EVNAV_ROOT") {
        return url.trim_end_matches('/').to_string();
    }
    DEFAULT_EVNAV_ROOT.to_string()
}

pub struct Model {
    plan: Plan,
    route_color: RouteColor,
    charging_steps: Vec<ChargingStep>,
    options: UiOptions,
    layers: LayerPreferences,
    store: BrowserStore,
    requests: RequestSequence,
    form: VehicleForm,
    vehicle: VehicleParams,
    form_error: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum VehicleField {
    Battery,
    SocAct,
    SocMin,
    SocMax,
    Efficiency,
    PowerAvg,
}

#[derive(Clone, Debug)]
struct VehicleForm {
    battery: String,
    soc_act: String,
    soc_min: String,
    soc_max: String,
    efficiency: String,
    power_avg: String,
}

impl From<VehicleParams> for VehicleForm {
    fn from(params: VehicleParams) -> Self {
        Self {
            battery: params.battery.to_string(),
            soc_act: params.soc_act.to_string(),
            soc_min: params.soc_min.to_string(),
            soc_max: params.soc_max.to_string(),
            efficiency: params.efficiency.to_string(),
            power_avg: params.power_avg.to_string(),
        }
    }
}

impl VehicleForm {
    fn set(&mut self, field: VehicleField, value: String) {
        let slot = match field {
            VehicleField::Battery => &mut self.battery,
            VehicleField::SocAct => &mut self.soc_act,
            VehicleField::SocMin => &mut self.soc_min,
            VehicleField::SocMax => &mut self.soc_max,
            VehicleField::Efficiency => &mut self.efficiency,
            VehicleField::PowerAvg => &mut self.power_avg,
        };
        *slot = value;
    }

    fn to_params(&self) -> Result<VehicleParams, String> {
        let parse = |field: &str, label: &str| {
            field
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("Invalid {label}"))
        };
        let params = VehicleParams {
            battery: parse(&self.battery, "battery capacity")?,
            soc_act: parse(&self.soc_act, "departure charge")?,
            soc_min: parse(&self.soc_min, "minimum charge")?,
            soc_max: parse(&self.soc_max, "maximum charge")?,
            efficiency: parse(&self.efficiency, "consumption")?,
            power_avg: parse(&self.power_avg, "charging power")?,
        };
        params.validate().map_err(|err| err.to_string())?;
        Ok(params)
    }
}

pub enum Msg {
    MapClicked {
        lat: f64,
        lon: f64,
    },
    WaypointDragEnd {
        index: usize,
        lat: f64,
        lon: f64,
    },
    WaypointGeocoded {
        index: usize,
        lat: f64,
        lon: f64,
        name: Option<String>,
    },
    EvnavFetched {
        request_id: u64,
        result: Result<EvnavResponse, String>,
    },
    LayerChanged(LayerEvent),
    LocationError(String),
    LocationOutsideBounds,
    VehicleFieldChanged(VehicleField, String),
}

#[derive(Deserialize)]
struct LatLonPayload {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct WaypointPayload {
    index: usize,
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct LayerPayload {
    name: String,
}

#[derive(Deserialize)]
struct MessagePayload {
    message: String,
}

/// Everything `initMap` needs to build the Leaflet widgets.
#[derive(Serialize)]
struct MapConfig<'a> {
    center: Coordinate,
    zoom: u8,
    language: &'static str,
    units: Units,
    base_layers: &'a [TileLayer],
    selected_layer: &'static str,
    overlay: &'a TileLayer,
    overlay_shown: bool,
    service_url: String,
    route_color: &'static str,
    draggable_waypoints: bool,
}

fn event_detail<T: DeserializeOwned>(event: web_sys::Event) -> Option<T> {
    let event = event.dyn_into::<web_sys::CustomEvent>().ok()?;
    serde_wasm_bindgen::from_value(event.detail()).ok()
}

fn subscribe_map_events(orders: &mut impl Orders<Msg>) {
    orders.stream(streams::window_event(Ev::from("map-click"), |event| {
        let payload: LatLonPayload = event_detail(event)?;
        web_sys::console::debug_1(
            &format!(
                "[frontend] map click lat={:.5} lon={:.5}",
                payload.lat, payload.lon
            )
            .into(),
        );
        Some(Msg::MapClicked {
            lat: payload.lat,
            lon: payload.lon,
        })
    }));
    orders.stream(streams::window_event(
        Ev::from("waypoint-drag-end"),
        |event| {
            let payload: WaypointPayload = event_detail(event)?;
            Some(Msg::WaypointDragEnd {
                index: payload.index,
                lat: payload.lat,
                lon: payload.lon,
            })
        },
    ));
    orders.stream(streams::window_event(
        Ev::from("waypoint-geocoded"),
        |event| {
            let payload: WaypointPayload = event_detail(event)?;
            Some(Msg::WaypointGeocoded {
                index: payload.index,
                lat: payload.lat,
                lon: payload.lon,
                name: payload.name,
            })
        },
    ));
    orders.stream(streams::window_event(
        Ev::from("base-layer-change"),
        |event| {
            let payload: LayerPayload = event_detail(event)?;
            Some(Msg::LayerChanged(LayerEvent::BaseLayerChange(payload.name)))
        },
    ));
    orders.stream(streams::window_event(Ev::from("overlay-add"), |_| {
        Msg::LayerChanged(LayerEvent::OverlayAdd)
    }));
    orders.stream(streams::window_event(Ev::from("overlay-remove"), |_| {
        Msg::LayerChanged(LayerEvent::OverlayRemove)
    }));
    orders.stream(streams::window_event(Ev::from("location-error"), |event| {
        let payload: MessagePayload = event_detail(event)?;
        Some(Msg::LocationError(payload.message))
    }));
    orders.stream(streams::window_event(
        Ev::from("location-outside-bounds"),
        |_| Msg::LocationOutsideBounds,
    ));
}

fn query_params(url: &Url) -> Vec<(&'static str, String)> {
    QUERY_KEYS
        .iter()
        .filter_map(|key| url.search().get(*key).map(|values| (*key, values)))
        .flat_map(|(key, values)| values.iter().map(move |value| (key, value.clone())))
        .collect()
}

pub fn init(url: Url, orders: &mut impl Orders<Msg>) -> Model {
    subscribe_map_events(orders);

    let options = UiOptions::default().merge_query(query_params(&url));
    let store = BrowserStore;
    let layers = LayerPreferences::load(&store);
    let plan = Plan::from_waypoints(options.waypoints.iter().copied().map(Waypoint::at).collect());
    let vehicle = VehicleParams::default();

    let config = MapConfig {
        center: options.center,
        zoom: options.zoom,
        language: options.language.code(),
        units: options.units,
        base_layers: &BASE_LAYERS,
        selected_layer: layers.base_layer.label,
        overlay: &OVERLAY,
        overlay_shown: layers.overlay,
        service_url: format!("{}/route/v1", evnav_root()),
        route_color: RouteColor::Reachable.hex(),
        draggable_waypoints: options.draggable_waypoints,
    };
    match to_value(&config) {
        Ok(config) => init_map(config),
        Err(err) => web_sys::console::error_1(&format!("[frontend] map config: {err}").into()),
    }

    let model = Model {
        plan,
        route_color: RouteColor::Reachable,
        charging_steps: Vec::new(),
        options,
        layers,
        store,
        requests: RequestSequence::default(),
        form: VehicleForm::from(vehicle),
        vehicle,
        form_error: None,
    };
    sync_waypoints(&model);
    model
}

pub fn update(msg: Msg, model: &mut Model, orders: &mut impl Orders<Msg>) {
    match msg {
        Msg::MapClicked { lat, lon } => {
            let index = model.plan.place_click(Coordinate { lat, lon });
            web_sys::console::debug_1(
                &format!("[frontend] waypoint {index} set to lat={lat:.5} lon={lon:.5}").into(),
            );
            sync_waypoints(model);
        }
        Msg::WaypointDragEnd { index, lat, lon } => {
            model
                .plan
                .set_waypoint(index, Waypoint::at(Coordinate { lat, lon }));
            request_reachability(model, orders);
        }
        Msg::WaypointGeocoded {
            index,
            lat,
            lon,
            name,
        } => {
            let coord = Coordinate { lat, lon };
            let waypoint = match name {
                Some(name) => Waypoint::named(coord, name),
                None => Waypoint::at(coord),
            };
            model.plan.set_waypoint(index, waypoint);
            if model.plan.located_count() < 2 {
                if let Ok(value) = to_value(&coord) {
                    pan_to(value);
                }
                sync_waypoints(model);
            } else {
                request_reachability(model, orders);
            }
        }
        Msg::EvnavFetched { request_id, result } => {
            if !model.requests.is_current(request_id) {
                web_sys::console::debug_1(
                    &format!("[frontend] dropping stale evnav answer #{request_id}").into(),
                );
                return;
            }
            let itinerary = match result
                .and_then(|resp| resp.into_itinerary().map_err(|err| err.to_string()))
            {
                Ok(itinerary) => itinerary,
                Err(err) => {
                    web_sys::console::error_1(&format!("[frontend] evnav: {err}").into());
                    return;
                }
            };
            if let Some(color) = model.plan.apply_itinerary(&itinerary) {
                model.route_color = color;
                set_route_color(color.hex());
                model.charging_steps = match itinerary {
                    Itinerary::Reachable { charging_steps } => charging_steps,
                    Itinerary::Unreachable => Vec::new(),
                };
                sync_waypoints(model);
            }
        }
        Msg::LayerChanged(event) => {
            if let Err(err) = model.layers.record(&mut model.store, &event) {
                web_sys::console::error_1(&format!("[frontend] {err}").into());
            }
        }
        Msg::LocationError(message) => alert(&message),
        Msg::LocationOutsideBounds => alert(strings(model).outside_map_bounds),
        Msg::VehicleFieldChanged(field, value) => {
            model.form.set(field, value);
            match model.form.to_params() {
                Ok(params) => {
                    model.vehicle = params;
                    model.form_error = None;
                }
                Err(err) => model.form_error = Some(err),
            }
        }
    }
}

fn request_reachability(model: &mut Model, orders: &mut impl Orders<Msg>) {
    let Some(request) = model.plan.evnav_request(model.vehicle) else {
        return;
    };
    let request_id = model.requests.next();
    let url = request.url(&evnav_root());
    web_sys::console::debug_1(&format!("[frontend] evnav request #{request_id}: {url}").into());
    orders.perform_cmd(async move {
        Msg::EvnavFetched {
            request_id,
            result: fetch_evnav(url).await,
        }
    });
}

async fn fetch_evnav(url: String) -> Result<EvnavResponse, String> {
    match Request::new(url).method(Method::Get).fetch().await {
        Err(err) => Err(format!("{err:?}")),
        Ok(raw) => match raw.check_status() {
            Err(status_err) => Err(format!("{status_err:?}")),
            Ok(resp) => resp
                .json::<EvnavResponse>()
                .await
                .map_err(|err| format!("{err:?}")),
        },
    }
}

fn strings(model: &Model) -> &'static Strings {
    model.options.language.strings()
}

fn alert(message: &str) {
    if let Err(err) = window().alert_with_message(message) {
        web_sys::console::error_1(&err);
    }
}

fn sync_waypoints(model: &Model) {
    let specs = marker_specs(
        &model.plan,
        strings(model),
        model.options.draggable_waypoints,
    );
    match to_value(&specs) {
        Ok(value) => set_waypoints_js(value),
        Err(err) => web_sys::console::error_1(&format!("[frontend] waypoints: {err}").into()),
    }
}

pub fn view(model: &Model) -> Node<Msg> {
    div![
        C!["evnav-panel"],
        h1!["EV route planner"],
        view_vehicle_form(model),
        view_itinerary(model),
    ]
}

fn view_vehicle_form(model: &Model) -> Node<Msg> {
    let input_field = |label: &str, value: &str, field: VehicleField| {
        div![
            C!["input-field"],
            label![label],
            input![
                attrs! {
                    At::Value => value,
                    At::AutoComplete => "off",
                    At::SpellCheck => "false",
                },
                input_ev(Ev::Input, move |val| Msg::VehicleFieldChanged(field, val)),
            ]
        ]
    };

    form![
        C!["controls"],
        fieldset![
            legend!["Vehicle"],
            input_field("Battery (kWh)", &model.form.battery, VehicleField::Battery),
            input_field("Consumption (kWh/km)", &model.form.efficiency, VehicleField::Efficiency),
            input_field("Charging power (kW)", &model.form.power_avg, VehicleField::PowerAvg),
        ],
        fieldset![
            legend!["State of charge"],
            input_field("At departure", &model.form.soc_act, VehicleField::SocAct),
            input_field("Minimum", &model.form.soc_min, VehicleField::SocMin),
            input_field("Charge up to", &model.form.soc_max, VehicleField::SocMax),
        ],
        if let Some(error) = &model.form_error {
            p![C!["error"], error]
        } else {
            empty![]
        }
    ]
}

fn view_itinerary(model: &Model) -> Node<Msg> {
    let strings = strings(model);
    if model.plan.endpoints().is_none() {
        return div![C!["itinerary"], p![strings.waiting]];
    }

    let verdict = match model.route_color {
        RouteColor::Reachable => strings.reachable,
        RouteColor::Unreachable => strings.unreachable,
    };

    let mut steps = model.charging_steps.iter();
    let rows = model.plan.waypoints().iter().map(|wp| {
        let step = if wp.is_charger { steps.next() } else { None };
        match step {
            Some(step) => li![
                C!["charger"],
                strong![step.name.as_str()],
                span![format!(
                    " {} kWh · {} min · {} $",
                    to_fixed(step.energy, 1),
                    to_fixed(step.duration_minutes(), 0),
                    to_fixed(step.charging_cost, 2)
                )],
            ],
            None => li![wp.name.clone().unwrap_or_else(|| {
                wp.lat_lng
                    .map(|c| format!("{:.4} / {:.4}", c.lat, c.lon))
                    .unwrap_or_default()
            })],
        }
    });

    let totals = ChargingTotals::from_steps(&model.charging_steps);
    let summary = if totals.stops > 0 {
        p![
            C!["totals"],
            format!(
                "{} × {} kWh · {} min · {} $",
                totals.stops,
                to_fixed(totals.energy, 1),
                to_fixed(totals.duration_minutes, 0),
                to_fixed(totals.cost, 2)
            )
        ]
    } else {
        empty![]
    };

    div![
        C!["itinerary"],
        h2![style! { St::Color => model.route_color.hex() }, verdict],
        ol![rows],
        summary,
    ]
}

#[wasm_bindgen(start)]
pub fn start() {
    App::start("app", init, update, view);
}
