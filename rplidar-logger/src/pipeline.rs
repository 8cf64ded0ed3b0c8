use crate::cancel::CancelToken;
use crate::config::SamplerConfig;
use crate::decimation::{DecimationEngine, DecimationStats};
use crate::error::{ConfigError, SourceError};
use crate::numeric::normalize;
use crate::scan_counter::ScanCounter;
use crate::sink::{RecordSink, SinkSet};
use crate::source::BatchSource;
use crate::time::{Clock, SystemClock};
use log::{debug, info, warn};
use rplidar_data::{AcceptedRecord, RawNode};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterationOutcome {
    /// A batch was retrieved and every node in it was processed.
    Processed,
    /// The poll failed transiently. Nothing was processed.
    SourceSkipped,
    /// The source will not produce any more batches.
    SourceClosed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IterationReport {
    pub outcome: IterationOutcome,
    /// Nodes in the retrieved batch.
    pub batch_len: usize,
    /// Records emitted to the sinks.
    pub accepted: usize,
    /// Scan number after the iteration.
    pub scan_number: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub iterations: u64,
    pub batches_processed: u64,
    pub sources_skipped: u64,
    pub records_emitted: u64,
    pub final_scan_number: u64,
    pub stats: DecimationStats,
    pub disabled_sinks: Vec<String>,
}

/// Single-threaded polling loop: poll a batch, normalize and decimate every
/// node, stamp the accepted ones and fan them out to the sinks.
pub struct Pipeline<S: BatchSource, C: Clock = SystemClock> {
    source: S,
    clock: C,
    engine: DecimationEngine,
    counter: ScanCounter,
    sinks: SinkSet,
    batch_capacity: usize,
    poll_timeout: Duration,
    poll_delay: Duration,
    summary: SessionSummary,
}

impl<S: BatchSource> Pipeline<S, SystemClock> {
    pub fn new(source: S, config: &SamplerConfig) -> Result<Self, ConfigError> {
        Pipeline::with_clock(source, SystemClock, config)
    }
}

impl<S: BatchSource, C: Clock> Pipeline<S, C> {
    /// Fails if `config` does not pass [`SamplerConfig::validate`].
    pub fn with_clock(
        source: S,
        clock: C,
        config: &SamplerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            clock,
            engine: DecimationEngine::new(config.max_points_per_degree),
            counter: ScanCounter::new(),
            sinks: SinkSet::default(),
            batch_capacity: config.batch_capacity,
            poll_timeout: config.poll_timeout(),
            poll_delay: config.poll_delay(),
            summary: SessionSummary::default(),
        })
    }

    pub fn add_sink<K: RecordSink + 'static>(&mut self, sink: K) {
        self.sinks.push(Box::new(sink));
    }

    pub fn with_sink<K: RecordSink + 'static>(mut self, sink: K) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn engine(&self) -> &DecimationEngine {
        &self.engine
    }

    pub fn scan_number(&self) -> u64 {
        self.counter.current()
    }

    pub fn run_iteration(&mut self) -> IterationReport {
        self.summary.iterations += 1;

        let batch = match self.grab_batch() {
            Ok(batch) => batch,
            Err(e) if !e.is_transient() => {
                info!("{} after scan #{}", e, self.counter.current());
                return self.report(IterationOutcome::SourceClosed, 0, 0);
            }
            Err(e) => {
                warn!("Failed to grab scan data: {}", e);
                self.summary.sources_skipped += 1;
                return self.report(IterationOutcome::SourceSkipped, 0, 0);
            }
        };

        self.counter.on_batch_start();
        let records = self.decimate(&batch);
        self.sinks.dispatch(&records, self.counter.current());

        self.summary.batches_processed += 1;
        self.summary.records_emitted += records.len() as u64;
        info!(
            "Scan #{} - Collected {} data points",
            self.counter.current(),
            batch.len()
        );
        self.report(IterationOutcome::Processed, batch.len(), records.len())
    }

    fn grab_batch(&mut self) -> Result<Vec<RawNode>, SourceError> {
        let batch = self.source.poll(self.poll_timeout)?;
        if batch.len() > self.batch_capacity {
            return Err(SourceError::CapacityExceeded(batch.len()));
        }
        Ok(batch)
    }

    fn decimate(&mut self, batch: &[RawNode]) -> Vec<AcceptedRecord> {
        let mut records = Vec::new();
        for raw in batch {
            let node = normalize(raw);
            let outcome = self.engine.process(&node);
            if let Some(point) = outcome.point {
                records.push(AcceptedRecord {
                    timestamp: self.clock.now_epoch_seconds(),
                    angle_deg: point.angle_deg,
                    distance_mm: point.distance_mm,
                    quality: point.quality,
                    scan_number: self.counter.current(),
                });
            }
            if outcome.wrapped {
                self.counter.on_wraparound();
            }
        }
        records
    }

    fn report(
        &self,
        outcome: IterationOutcome,
        batch_len: usize,
        accepted: usize,
    ) -> IterationReport {
        IterationReport {
            outcome,
            batch_len,
            accepted,
            scan_number: self.counter.current(),
        }
    }

    /// Runs until `token` is cancelled or the source closes, then closes the sinks.
    ///
    /// Cancellation is checked before each iteration, so an iteration that has
    /// started always completes.
    pub fn run(&mut self, token: &CancelToken) -> SessionSummary {
        loop {
            if token.is_cancelled() {
                info!("Cancellation requested, stopping scan");
                break;
            }
            if self.run_iteration().outcome == IterationOutcome::SourceClosed {
                break;
            }
            if token.wait_timeout(self.poll_delay) {
                debug!("Inter-iteration delay interrupted by cancellation");
            }
        }
        self.close()
    }

    /// Flushes and closes every enabled sink and returns the session summary.
    pub fn close(&mut self) -> SessionSummary {
        debug!("Closing {} enabled sink(s)", self.sinks.n_enabled());
        self.sinks.close();
        SessionSummary {
            final_scan_number: self.counter.current(),
            stats: self.engine.stats(),
            disabled_sinks: self.sinks.disabled(),
            ..self.summary.clone()
        }
    }
}
