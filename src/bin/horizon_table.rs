use clap::Parser;

use rindler_sphere::config::RunConfig;
use rindler_sphere::math::{Real, DEFAULT_PRECISION};
use rindler_sphere::model::estimate::{hiding_estimates, rim_horizon};
use rindler_sphere::model::Scene;

/// Prints where the rim's horizon sits, and roughly what spin hides each body.
#[derive(Debug, Parser)]
struct Args {
    /// Spin in rotations per minute
    #[arg(long)]
    rpm: Option<String>,
    /// Object radius in km
    #[arg(long)]
    radius: Option<String>,
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    precision: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = RunConfig::defaults(args.precision);
    let k = config.kernel.clone();
    if let Some(rpm) = &args.rpm {
        config.rpm = k.parse(rpm)?;
    }
    if let Some(radius) = &args.radius {
        config.object_radius = k.parse(radius)?;
    }
    if config.object_radius <= k.zero() || config.rpm.is_negative() {
        anyhow::bail!("radius must be positive and rpm non-negative");
    }

    let scene = Scene::new(&config);
    let light_speed = config.light_speed.to_f64();
    let rim: Real = scene.tightest_horizon();

    println!(
        "Object of radius {} km at {} rpm",
        config.object_radius, config.rpm
    );
    println!("- Rim acceleration: {} km/s^2", scene.object.rim_acceleration());
    println!("- Rim horizon: {} km", rim);
    println!(
        "- Rim horizon (f64): {} km",
        rim_horizon(light_speed, config.object_radius.to_f64(), config.rpm.to_f64())
    );
    println!();

    for estimate in hiding_estimates(&scene) {
        println!("{} at {:.1} km", estimate.name, estimate.distance);
        println!("- Near edge hidden above: {:.6e} rpm", estimate.near_edge_rpm);
        println!("- Centre hidden above: {:.6e} rpm", estimate.centre_rpm);
        println!("- Far edge hidden above: {:.6e} rpm", estimate.far_edge_rpm);
        println!();
    }

    Ok(())
}
