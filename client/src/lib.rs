pub mod error;
pub mod report;

use serde::Serialize;
use shared::{
    ChargingStep, ChargingTotals, Coordinate, EvnavRequest, EvnavResponse, Itinerary, Plan,
    RouteColor, VehicleParams,
};

use crate::error::ClientError;

/// Native counterpart of the browser's reachability request.
#[derive(Debug, Clone)]
pub struct EvnavClient {
    http: reqwest::Client,
    root: String,
}

/// A two-endpoint plan after the evnav answer has been applied.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedRoute {
    pub plan: Plan,
    pub color: RouteColor,
    pub charging_steps: Vec<ChargingStep>,
    pub totals: ChargingTotals,
}

impl PlannedRoute {
    pub fn is_reachable(&self) -> bool {
        self.color == RouteColor::Reachable
    }
}

impl EvnavClient {
    pub fn new(root: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), root)
    }

    pub fn with_http(http: reqwest::Client, root: impl Into<String>) -> Self {
        Self {
            http,
            root: root.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub async fn fetch(&self, request: &EvnavRequest) -> Result<EvnavResponse, ClientError> {
        let url = request.url(&self.root);
        tracing::debug!("querying evnav: {url}");
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body = response.json::<EvnavResponse>().await?;
        tracing::debug!(
            "evnav answered code={} message={} steps={}",
            body.code,
            body.message,
            body.charging_steps.len()
        );
        Ok(body)
    }

    /// Asks evnav for the charging stops between `start` and `end` and applies
    /// them to a fresh plan.
    pub async fn plan(
        &self,
        start: Coordinate,
        end: Coordinate,
        vehicle: VehicleParams,
    ) -> Result<PlannedRoute, ClientError> {
        vehicle.validate()?;
        let mut plan = Plan::from_endpoints(start, end);
        let request = EvnavRequest {
            src: start,
            dst: end,
            vehicle,
        };

        let itinerary = self.fetch(&request).await?.into_itinerary()?;
        let charging_steps = match &itinerary {
            Itinerary::Reachable { charging_steps } => charging_steps.clone(),
            Itinerary::Unreachable => Vec::new(),
        };
        let color = plan
            .apply_itinerary(&itinerary)
            .unwrap_or(RouteColor::Unreachable);

        tracing::info!(
            "{} with {} charging stop(s)",
            if color == RouteColor::Reachable {
                "destination reachable"
            } else {
                "destination unreachable"
            },
            charging_steps.len()
        );

        Ok(PlannedRoute {
            totals: ChargingTotals::from_steps(&charging_steps),
            plan,
            color,
            charging_steps,
        })
    }
}
