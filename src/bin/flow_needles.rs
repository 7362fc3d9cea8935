use hs_flow::config::flow::load_config;
use hs_flow::image::io::{load_frame_pair, save_raster_f32, write_json_file};
use hs_flow::{FlowEstimator, Result};
use log::info;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> std::result::Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    execute(Path::new(&config_path)).map_err(|e| e.to_string())
}

fn execute(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let (first, second) = load_frame_pair(&config.frames.first, &config.frames.second)?;

    let estimator = FlowEstimator::new(config.solver.to_solver_params())
        .with_needle_options(config.needles);
    let estimate = estimator.estimate(first.as_view(), second.as_view())?;

    save_raster_f32(&estimate.needle_map.image, &config.output.needle_map)?;
    if let Some(report_path) = &config.output.report_json {
        write_json_file(report_path, &estimate.report)?;
        println!("Saved report to {}", report_path.display());
    }

    let report = &estimate.report;
    info!(
        "relaxation {}x{} workers={} iterations={} took {:.3} ms",
        report.input.width,
        report.input.height,
        report.workers,
        report.iterations,
        report.timings.stage_ms("relaxation").unwrap_or_default()
    );
    println!(
        "Saved needle map with {} needles to {} (total {:.3} ms)",
        report.needles,
        config.output.needle_map.display(),
        report.timings.total_ms
    );
    Ok(())
}

fn usage() -> String {
    "Usage: flow_needles <config.json>".to_string()
}
