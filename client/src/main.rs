use clap::Parser;
use client::{EvnavClient, report};
use shared::{Coordinate, VehicleParams, evnav::DEFAULT_EVNAV_ROOT, localization::Language};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Ask an evnav server where an electric vehicle has to recharge between two points"
)]
struct Args {
    /// Start as `lat,lon`
    #[arg(long, allow_hyphen_values = true)]
    from: Coordinate,

    /// Destination as `lat,lon`
    #[arg(long, allow_hyphen_values = true)]
    to: Coordinate,

    /// Root URL of the evnav server
    #[arg(long, env = "EVNAV_URL", default_value = DEFAULT_EVNAV_ROOT)]
    url: String,

    /// Usable battery capacity in kWh
    #[arg(long)]
    battery: Option<f64>,
    /// State of charge at departure (0..=1)
    #[arg(long)]
    soc_act: Option<f64>,
    /// Lowest state of charge allowed on the way (0..=1)
    #[arg(long)]
    soc_min: Option<f64>,
    /// State of charge to stop charging at (0..=1)
    #[arg(long)]
    soc_max: Option<f64>,
    /// Consumption in kWh/km
    #[arg(long)]
    efficiency: Option<f64>,
    /// Average charging power in kW
    #[arg(long)]
    power_avg: Option<f64>,

    /// Report language (en, fr)
    #[arg(long, default_value = "en")]
    lang: String,

    /// Print the resulting plan as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn vehicle(&self) -> VehicleParams {
        let defaults = VehicleParams::default();
        VehicleParams {
            battery: self.battery.unwrap_or(defaults.battery),
            soc_act: self.soc_act.unwrap_or(defaults.soc_act),
            soc_min: self.soc_min.unwrap_or(defaults.soc_min),
            soc_max: self.soc_max.unwrap_or(defaults.soc_max),
            efficiency: self.efficiency.unwrap_or(defaults.efficiency),
            power_avg: self.power_avg.unwrap_or(defaults.power_avg),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evnav_plan=info,client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let language = Language::from_code(&args.lang).unwrap_or_default();
    let client = EvnavClient::new(args.url.clone());
    tracing::info!(
        "planning {} -> {} via {}",
        args.from,
        args.to,
        client.root()
    );

    let route = client.plan(args.from, args.to, args.vehicle()).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&route)?);
    } else {
        print!("{}", report::render(&route, language));
    }

    Ok(())
}
