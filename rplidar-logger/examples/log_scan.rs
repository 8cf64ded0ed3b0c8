use clap::Parser;
use log::{error, info};
use rplidar_logger::{
    cancel_on_ctrl_c, render_channel, run_logger, RecordSink, SamplerConfig, SimulatedConfig,
    SimulatedSource,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Logs a simulated RPLiDAR session to CSV.
#[derive(Parser)]
#[command(about = "Samples a rotating rangefinder stream into a bounded-density CSV log.")]
struct Args {
    /// Output CSV file. Defaults to lidar_data_<date>_<time>.csv
    output: Option<PathBuf>,
    /// Load session settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop after this many simulated revolutions instead of waiting for Ctrl-C
    #[arg(long)]
    revolutions: Option<u32>,
    #[arg(long, default_value_t = 3200)]
    samples_per_revolution: u32,
    #[arg(long, default_value_t = 400)]
    batch_len: usize,
    #[arg(long, default_value_t = 0.0)]
    start_angle: f32,
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,
    /// Print each render frame as a JSON line
    #[arg(long, default_value_t = false)]
    frames: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match SamplerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => SamplerConfig::default(),
    };
    if args.output.is_some() {
        config.output_path = args.output.clone();
    }

    let token = match cancel_on_ctrl_c() {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to install Ctrl-C handler: {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = SimulatedSource::new(SimulatedConfig {
        samples_per_revolution: args.samples_per_revolution,
        batch_len: args.batch_len,
        start_angle_deg: args.start_angle,
        revolutions: args.revolutions,
        seed: args.seed,
        ..SimulatedConfig::default()
    });

    let mut extra_sinks: Vec<Box<dyn RecordSink>> = Vec::new();
    let renderer = if args.frames {
        let (render_sink, frame_rx) = render_channel();
        extra_sinks.push(Box::new(render_sink));
        Some(std::thread::spawn(move || {
            for frame in frame_rx {
                match serde_json::to_string(&frame) {
                    Ok(line) => println!("{line}"),
                    Err(e) => error!("{e}"),
                }
            }
        }))
    } else {
        None
    };

    let result = run_logger(source, &config, extra_sinks, &token);
    // The render sink is dropped with the pipeline, which ends the frame loop.
    if let Some(renderer) = renderer {
        if renderer.join().is_err() {
            error!("Render thread panicked");
        }
    }

    match result {
        Ok(summary) => {
            info!(
                "{} batches, {} records, last scan #{}, {} nodes seen",
                summary.batches_processed,
                summary.records_emitted,
                summary.final_scan_number,
                summary.stats.seen
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Cannot start scan session: {e}");
            ExitCode::FAILURE
        }
    }
}
