mod cancel;
mod config;
mod constants;
mod csv_sink;
mod decimation;
mod error;
mod numeric;
mod pipeline;
mod render;
mod scan_counter;
mod simulated;
mod sink;
mod source;
mod time;

use log::info;

pub use crate::cancel::{cancel_on_ctrl_c, cancellation, CancelHandle, CancelToken};
pub use crate::config::{default_output_path, SamplerConfig};
pub use crate::csv_sink::{read_records, CsvSink};
pub use crate::decimation::{DecimationEngine, DecimationStats, NodeOutcome};
pub use crate::error::{ConfigError, LoggerError, SinkError, SourceError};
pub use crate::numeric::{ascend_scan_data, normalize, to_cartesian};
pub use crate::pipeline::{IterationOutcome, IterationReport, Pipeline, SessionSummary};
pub use crate::render::{render_channel, RenderSink};
pub use crate::scan_counter::ScanCounter;
pub use crate::simulated::{SimulatedConfig, SimulatedSource};
pub use crate::sink::RecordSink;
pub use crate::source::BatchSource;
pub use crate::time::{Clock, SystemClock};
pub use rplidar_data;

/// Function to log a scan session to CSV.
/// # Arguments
///
/// * `source` - Batch source of a started sensor.
/// * `config` - Session settings. The log goes to `config.output_path` or a timestamped file.
/// * `token` - Cancellation token, checked once per polling iteration.
///
/// Additional sinks such as a [`RenderSink`] are passed in `extra_sinks` and
/// receive the same records as the log.
pub fn run_logger<S: BatchSource>(
    source: S,
    config: &SamplerConfig,
    extra_sinks: Vec<Box<dyn RecordSink>>,
    token: &CancelToken,
) -> Result<SessionSummary, LoggerError> {
    config.validate()?;
    let output_path = config.output_path_or_default();
    let csv_sink = CsvSink::create(&output_path)?;

    let mut pipeline = Pipeline::new(source, config)?.with_sink(csv_sink);
    for sink in extra_sinks {
        pipeline.add_sink(sink);
    }

    info!(
        "Successfully started scan. Saving data to {}",
        output_path.display()
    );
    let summary = pipeline.run(token);
    info!("Scan stopped. Data saved to {}", output_path.display());
    Ok(summary)
}
