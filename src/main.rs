use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use std::fs::File;
use std::io::LineWriter;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use rindler_sphere::config::RunConfig;
use rindler_sphere::model::Scene;
use rindler_sphere::report::render::{render, ProjectionLayout};
use rindler_sphere::report::{Accumulator, NullSink, Sample, SampleSink};
use rindler_sphere::scan::{default_workers, run_scan, Grid};

/// Sums the gravity felt inside a spinning sphere when part of each body
/// lies beyond the Rindler horizon.
#[derive(Debug, Parser)]
struct Args {
    /// Settings file; created with defaults if missing
    #[arg(default_value = "rindler.toml")]
    config: PathBuf,
    /// Worker threads [default: twice the available cores]
    #[arg(long)]
    threads: Option<usize>,
    /// Working precision in significant digits, overriding the settings file
    #[arg(long)]
    precision: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = RunConfig::load(&args.config, args.precision);
    config.log_settings();

    let scene = Scene::new(&config);
    let k = &scene.kernel;
    let grid = Grid::new(
        k,
        scene.object.center.clone(),
        &scene.object.radius,
        config.resolution,
    );

    info!("Rim acceleration: {} km/s^2", scene.object.rim_acceleration());
    info!("Tightest horizon: {} km", scene.tightest_horizon());
    for body in &scene.bodies {
        info!(
            "{} at x = {} km, radius {} km, mass {} kg",
            body.name,
            body.center().x,
            body.radius(),
            body.mass()
        );
    }

    let mut sink: Box<dyn SampleSink> = Box::new(NullSink);
    let mut renderer = None;
    if config.vis.enabled {
        let (sender, receiver) = mpsc::channel::<Sample>();
        let layout = ProjectionLayout::new(
            grid.steps_on_edge(),
            config.vis.dot_size,
            config.vis.border,
        );
        let file = config.vis.file.clone();
        let handle = thread::Builder::new()
            .name("renderer".to_string())
            .spawn(move || render(&file, &layout, receiver).map_err(|err| err.to_string()))
            .context("unable to start the renderer")?;
        sink = Box::new(sender);
        renderer = Some(handle);
    }

    let workers = args.threads.unwrap_or_else(default_workers);
    let mut accumulator = Accumulator::new(&scene, &grid, workers, sink);
    if config.debug.enabled {
        let file = File::create(&config.debug.file).with_context(|| {
            format!("unable to create debug log {}", config.debug.file.display())
        })?;
        accumulator = accumulator.with_debug_log(Box::new(LineWriter::new(file)));
    }

    run_scan(&scene, &grid, &accumulator, workers)?;
    println!("{}", accumulator.summary(&scene));

    // Closes the sample feed so the renderer can finish
    drop(accumulator);
    if let Some(handle) = renderer {
        match handle.join() {
            Ok(Ok(drawn)) => info!("Drew {} cells to {}", drawn, config.vis.file.display()),
            Ok(Err(err)) => warn!("rendering failed: {}", err),
            Err(_) => warn!("renderer panicked"),
        }
    }

    Ok(())
}
