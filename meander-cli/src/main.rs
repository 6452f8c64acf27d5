//! Command-line interface for the Meander route-synthesis engine.
//!
//! Wires the GraphHopper oracle to the synthesizer and prints the composed
//! route as JSON. Logging goes through `env_logger`; set `RUST_LOG=debug`
//! to watch the stage-by-stage composition.

#![forbid(unsafe_code)]
#![allow(clippy::print_stdout, reason = "the route summary is the CLI's output")]

use clap::Parser;
use meander_core::{CancelToken, ComposedRoute, Point, Profile};
use meander_data::GraphHopperOracle;
use meander_synth::{SynthesisRequest, Synthesizer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Parser)]
#[command(
    name = "meander",
    about = "Synthesise closed routes of approximately a target distance over a routable network"
)]
struct Args {
    /// Waypoint as a `lat,lon` pair; repeat for ordered multi-waypoint
    /// routes. A single waypoint synthesises an anchor loop.
    #[arg(short = 'w', long = "waypoint", value_parser = parse_point, required = true)]
    waypoints: Vec<Point>,

    /// Routing profile forwarded to GraphHopper (e.g. foot, bike, car).
    #[arg(short, long, default_value = "foot")]
    profile: String,

    /// Target route distance in metres.
    #[arg(short = 'd', long = "distance", default_value_t = 5_000.0)]
    distance_m: f64,

    /// Leave a multi-waypoint route open instead of returning to the start.
    #[arg(long)]
    open: bool,

    /// Base URL of the GraphHopper instance.
    #[arg(long, default_value = "http://localhost:8989")]
    host: String,

    /// Seed for reproducible sampling; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Include the full coordinate trace in the output.
    #[arg(long)]
    trace: bool,
}

/// Parse a `lat,lon` command-line argument.
fn parse_point(value: &str) -> Result<Point, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lon`, got {value:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude {lat:?}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude {lon:?}"))?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(format!("latitude {lat} out of range"));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(format!("longitude {lon} out of range"));
    }
    Ok(Point::new(lat, lon))
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("meander: {err}");
        std::process::exit(1);
    }
}

fn run() -> eyre::Result<()> {
    let args = Args::parse();
    let profile = Profile::new(&args.profile)?;
    let oracle = GraphHopperOracle::new(&args.host)?;
    let synthesizer = Synthesizer::new(oracle);

    let request = SynthesisRequest {
        profile,
        waypoints: args.waypoints.clone(),
        target_distance_m: args.distance_m,
        close_loop: !args.open,
        cancel: CancelToken::new(),
    };
    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let route = synthesizer.synthesize(&request, &mut rng)?;
    println!("{}", serde_json::to_string_pretty(&summarise(&route, args.trace)?)?);
    Ok(())
}

/// Render a composed route as a JSON summary.
fn summarise(route: &ComposedRoute, include_trace: bool) -> eyre::Result<serde_json::Value> {
    let mut summary = serde_json::json!({
        "distance_m": route.distance_m,
        "duration_s": route.duration.as_secs_f64(),
        "elevation_gain_m": route.elevation_gain_m,
        "elevation_loss_m": route.elevation_loss_m,
        "closes_loop": route.closes_loop(),
        "control_points": route.control_points,
        "trace_samples": route.trace.len(),
    });
    if include_trace {
        summary["trace"] = serde_json::to_value(&route.trace)?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("51.9086,-2.0864", 51.9086, -2.0864)]
    #[case(" 51.9 , -2.0 ", 51.9, -2.0)]
    fn parses_well_formed_points(#[case] input: &str, #[case] lat: f64, #[case] lon: f64) {
        let point = parse_point(input).expect("point should parse");
        assert_eq!(point.lat, lat);
        assert_eq!(point.lon, lon);
    }

    #[rstest]
    #[case("51.9086")]
    #[case("north,west")]
    #[case("91.0,-2.0")]
    #[case("51.9,-181.0")]
    fn rejects_malformed_points(#[case] input: &str) {
        assert!(parse_point(input).is_err());
    }

    #[test]
    fn arguments_parse_with_defaults() {
        let args = Args::parse_from(["meander", "--waypoint", "51.9086,-2.0864"]);
        assert_eq!(args.waypoints.len(), 1);
        assert_eq!(args.profile, "foot");
        assert_eq!(args.distance_m, 5_000.0);
        assert!(!args.open);
        assert_eq!(args.host, "http://localhost:8989");
    }

    #[test]
    fn summary_reports_loop_closure() {
        let anchor = Point::new(51.9086, -2.0864);
        let route = ComposedRoute {
            control_points: vec![
                meander_core::ControlPoint::waypoint(anchor),
                meander_core::ControlPoint::waypoint(anchor),
            ],
            trace: Vec::new(),
            distance_m: 0.0,
            duration: std::time::Duration::ZERO,
            elevation_gain_m: 0.0,
            elevation_loss_m: 0.0,
        };
        let summary = summarise(&route, false).expect("summary should render");
        assert_eq!(summary["closes_loop"], serde_json::Value::Bool(true));
        assert!(summary.get("trace").is_none());
    }
}
