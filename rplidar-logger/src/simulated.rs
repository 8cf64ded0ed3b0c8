use crate::error::SourceError;
use crate::numeric::ascend_scan_data;
use crate::source::BatchSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rplidar_data::RawNode;
use std::collections::VecDeque;
use std::time::Duration;

const Q14_FULL_TURN: u32 = 1 << 16;

/// Settings of a [`SimulatedSource`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedConfig {
    /// Samples emitted per revolution.
    pub samples_per_revolution: u32,
    /// Nodes per batch.
    pub batch_len: usize,
    /// Angle of the first sample, in degrees.
    pub start_angle_deg: f32,
    /// Probability that a sample reports no return.
    pub dropout_rate: f64,
    /// Range of simulated distances in millimeters.
    pub min_distance_mm: f32,
    pub max_distance_mm: f32,
    /// Number of revolutions before the source reports [`SourceError::Closed`].
    pub revolutions: Option<u32>,
    pub seed: u64,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            samples_per_revolution: 3200,
            batch_len: 400,
            start_angle_deg: 0.,
            dropout_rate: 0.05,
            min_distance_mm: 200.,
            max_distance_mm: 4000.,
            revolutions: None,
            seed: 0x5EED,
        }
    }
}

/// Synthetic rotating rangefinder.
///
/// Sweeps the full circle at a constant angular step, splitting the stream
/// into fixed-length batches whose boundaries drift relative to the start of
/// each revolution. Each batch is sorted ascending before it is returned, so a
/// batch that straddles the revolution boundary begins with the wrapped nodes.
pub struct SimulatedSource {
    config: SimulatedConfig,
    rng: StdRng,
    sample_index: u64,
    failures: VecDeque<(u64, SourceError)>,
    polls: u64,
}

impl SimulatedSource {
    pub fn new(config: SimulatedConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            sample_index: 0,
            failures: VecDeque::new(),
            polls: 0,
        }
    }

    /// Makes the poll with the given zero-based index fail with `error` instead of producing a batch.
    pub fn fail_on_poll(mut self, poll_index: u64, error: SourceError) -> Self {
        self.failures.push_back((poll_index, error));
        self
    }

    pub fn samples_emitted(&self) -> u64 {
        self.sample_index
    }

    fn total_samples(&self) -> Option<u64> {
        self.config
            .revolutions
            .map(|r| r as u64 * self.config.samples_per_revolution as u64)
    }

    fn next_node(&mut self) -> RawNode {
        let samples = self.config.samples_per_revolution.max(1) as u64;
        let start = (self.config.start_angle_deg.rem_euclid(360.) / 360. * Q14_FULL_TURN as f32) as u64;
        let step = (self.sample_index % samples) * Q14_FULL_TURN as u64 / samples;
        let angle_z_q14 = ((start + step) % Q14_FULL_TURN as u64) as u16;
        self.sample_index += 1;

        let dist_mm_q2 = if self.rng.gen_bool(self.config.dropout_rate.clamp(0., 1.)) {
            0
        } else {
            let lo = self.config.min_distance_mm.min(self.config.max_distance_mm);
            let hi = self.config.min_distance_mm.max(self.config.max_distance_mm);
            let d = if hi > lo { self.rng.gen_range(lo..hi) } else { lo };
            (d * 4.) as u32
        };
        RawNode {
            angle_z_q14,
            dist_mm_q2,
            quality: self.rng.gen_range(10u8..=60) << 2,
            flag: 0,
        }
    }
}

impl BatchSource for SimulatedSource {
    fn poll(&mut self, _timeout: Duration) -> Result<Vec<RawNode>, SourceError> {
        let poll_index = self.polls;
        self.polls += 1;

        if let Some(pos) = self.failures.iter().position(|(i, _)| *i == poll_index) {
            if let Some((_, error)) = self.failures.remove(pos) {
                return Err(error);
            }
        }

        let remaining = match self.total_samples() {
            Some(total) if self.sample_index >= total => return Err(SourceError::Closed),
            Some(total) => (total - self.sample_index) as usize,
            None => usize::MAX,
        };
        let n = self.config.batch_len.min(remaining);
        let mut nodes: Vec<RawNode> = (0..n).map(|_| self.next_node()).collect();
        ascend_scan_data(&mut nodes);
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::normalize;

    #[test]
    fn test_batches_are_sorted() {
        let mut source = SimulatedSource::new(SimulatedConfig {
            samples_per_revolution: 360,
            batch_len: 100,
            start_angle_deg: 300.,
            ..SimulatedConfig::default()
        });
        for _ in 0..10 {
            let batch = source.poll(Duration::ZERO).unwrap();
            assert_eq!(batch.len(), 100);
            assert!(batch.windows(2).all(|w| w[0].angle_z_q14 <= w[1].angle_z_q14));
        }
    }

    #[test]
    fn test_sweeps_full_circle() {
        let mut source = SimulatedSource::new(SimulatedConfig {
            samples_per_revolution: 360,
            batch_len: 360,
            dropout_rate: 0.,
            ..SimulatedConfig::default()
        });
        let batch = source.poll(Duration::ZERO).unwrap();
        let first = normalize(&batch[0]);
        let last = normalize(&batch[359]);
        assert!(first.angle_deg.abs() < 1e-3);
        assert!((last.angle_deg - 359.).abs() < 1e-2);
        assert!(batch.iter().all(|n| n.dist_mm_q2 > 0));
    }

    #[test]
    fn test_closes_after_revolutions() {
        let mut source = SimulatedSource::new(SimulatedConfig {
            samples_per_revolution: 100,
            batch_len: 60,
            revolutions: Some(1),
            ..SimulatedConfig::default()
        });
        assert_eq!(source.poll(Duration::ZERO).unwrap().len(), 60);
        assert_eq!(source.poll(Duration::ZERO).unwrap().len(), 40);
        assert!(matches!(
            source.poll(Duration::ZERO),
            Err(SourceError::Closed)
        ));
        assert_eq!(source.samples_emitted(), 100);
    }

    #[test]
    fn test_scripted_failure() {
        let mut source = SimulatedSource::new(SimulatedConfig::default())
            .fail_on_poll(1, SourceError::TimeoutError);
        assert!(source.poll(Duration::ZERO).is_ok());
        assert!(matches!(
            source.poll(Duration::ZERO),
            Err(SourceError::TimeoutError)
        ));
        assert!(source.poll(Duration::ZERO).is_ok());
    }

    #[test]
    fn test_same_seed_same_stream() {
        let config = SimulatedConfig::default();
        let mut a = SimulatedSource::new(config.clone());
        let mut b = SimulatedSource::new(config);
        assert_eq!(
            a.poll(Duration::ZERO).unwrap(),
            b.poll(Duration::ZERO).unwrap()
        );
    }
}
