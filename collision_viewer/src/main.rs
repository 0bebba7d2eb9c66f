use collision_lab::*;
use ggez::{GameError, GameResult};
use std::env;

mod visual;

const USAGE: &str = "usage: collision_viewer [headless] [m1 v1i m2 v2i e] [--config <file>]";

/// Parsed command line: run mode, starting parameters and stepper config.
struct Options {
    headless: bool,
    params: CollisionParameters,
    config: SimulationConfig,
}

fn main() {
    // info+ by default unless RUST_LOG overrides; wgpu is chatty
    let default = "info,wgpu_hal=off,wgpu_core=off,naga=off";
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .try_init();

    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {}\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if options.headless {
        run_headless(options.params, options.config);
        return;
    }

    if let Err(e) = visual::run_visual(options.params, options.config) {
        eprintln!("Error running collision viewer: {}", e);
    }
}

fn parse_options(args: &[String]) -> GameResult<Options> {
    let mut headless = false;
    let mut config = SimulationConfig::default();
    let mut numbers = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "headless" => headless = true,
            "--config" => {
                let path = iter.next().ok_or_else(|| {
                    GameError::CustomError("--config needs a file path".to_string())
                })?;
                config = SimulationConfig::load(path)
                    .map_err(|e| GameError::CustomError(e.to_string()))?;
            }
            other => {
                let value: f64 = other
                    .parse()
                    .map_err(|_| GameError::CustomError(format!("not a number: {other}")))?;
                numbers.push(value);
            }
        }
    }

    let params = match numbers.as_slice() {
        [] => CollisionParameters::default(),
        [m1, v1i, m2, v2i, e] => CollisionParameters::new(*m1, *v1i, *m2, *v2i, *e),
        _ => {
            return Err(GameError::CustomError(format!(
                "expected 5 numbers (m1 v1i m2 v2i e), got {}",
                numbers.len()
            )))
        }
    };

    Ok(Options { headless, params, config })
}

/// Runs one collision at 60 FPS without a window, printing the readouts.
fn run_headless(params: CollisionParameters, config: SimulationConfig) {
    let stats = compute_live_stats(&params);
    println!(
        "Initial momentum: {:.2} kg.m/s | v1f: {:.2} | v2f: {:.2} | KE loss: {:.2} Joule",
        stats.initial_momentum, stats.v1f, stats.v2f, stats.energy_loss
    );

    let mut sim = Simulation::with_config(config);
    if let Err(e) = sim.start(params) {
        println!("Cannot start: {}", e);
        return;
    }

    let dt = 1.0 / 60.0;
    // Bodies that come to rest never leave the arena, so cap the run length
    for frame in 0..3600 {
        let report = sim.step(dt);
        match report.event {
            Some(StepEvent::Collision { final_momentum }) => {
                println!(
                    "Frame {}: COLLISION! Final momentum: {:.2} kg.m/s",
                    frame, final_momentum
                );
            }
            Some(StepEvent::Finished) => {
                println!("Frame {}: {}", frame, sim.status_text());
                return;
            }
            None => {}
        }
        if frame % 30 == 0 {
            println!(
                "Frame {}: x1 = {:.2}, x2 = {:.2} ({:?})",
                frame, report.position1, report.position2, report.phase
            );
        }
    }
    println!("Stopped after 3600 frames: {}", sim.status_text());
}
