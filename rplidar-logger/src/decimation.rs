use crate::constants::{DEGREE_BUCKETS, MAX_POINTS_PER_DEGREE};
use log::debug;
use rplidar_data::{AcceptedPoint, MeasurementNode};

/// Result of feeding one node to the [`DecimationEngine`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeOutcome {
    /// The node, if it passed every filter.
    pub point: Option<AcceptedPoint>,
    /// The node's angle was below the previous node's angle and all buckets were cleared.
    pub wrapped: bool,
}

/// Counters describing why nodes were dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecimationStats {
    pub seen: u64,
    pub accepted: u64,
    pub rejected_invalid_distance: u64,
    pub rejected_alternation: u64,
    pub rejected_bucket_full: u64,
    pub malformed: u64,
    pub wraparounds: u64,
}

/// Stateful per-session decimation of the normalized measurement stream.
///
/// Every other node is dropped, then each one-degree bucket accepts at most
/// `max_points_per_degree` nodes until the angle sequence decreases, which is
/// taken as the start of a new revolution and clears every bucket.
#[derive(Clone, Debug)]
pub struct DecimationEngine {
    skip_next: bool,
    points_per_degree: [u8; DEGREE_BUCKETS],
    last_angle: f32,
    max_points_per_degree: u8,
    stats: DecimationStats,
}

impl Default for DecimationEngine {
    fn default() -> Self {
        Self::new(MAX_POINTS_PER_DEGREE)
    }
}

impl DecimationEngine {
    pub fn new(max_points_per_degree: u8) -> Self {
        Self {
            skip_next: false,
            points_per_degree: [0; DEGREE_BUCKETS],
            last_angle: 0.,
            max_points_per_degree,
            stats: DecimationStats::default(),
        }
    }

    pub fn process(&mut self, node: &MeasurementNode) -> NodeOutcome {
        self.stats.seen += 1;

        let skip = self.skip_next;
        self.skip_next = !self.skip_next;

        let point = self.admit(node, skip);

        let wrapped = node.angle_deg < self.last_angle;
        if wrapped {
            self.points_per_degree = [0; DEGREE_BUCKETS];
            self.stats.wraparounds += 1;
            debug!(
                "Wraparound at {:.3} deg (previous {:.3} deg)",
                node.angle_deg, self.last_angle
            );
        }
        self.last_angle = node.angle_deg;

        NodeOutcome { point, wrapped }
    }

    fn admit(&mut self, node: &MeasurementNode, skip: bool) -> Option<AcceptedPoint> {
        if node.distance_mm.is_nan() || node.distance_mm <= 0. {
            self.stats.rejected_invalid_distance += 1;
            return None;
        }
        if skip {
            self.stats.rejected_alternation += 1;
            return None;
        }
        let degree = match degree_index(node.angle_deg) {
            Some(degree) => degree,
            None => {
                self.stats.malformed += 1;
                return None;
            }
        };
        if self.points_per_degree[degree] >= self.max_points_per_degree {
            self.stats.rejected_bucket_full += 1;
            return None;
        }
        self.points_per_degree[degree] += 1;
        self.stats.accepted += 1;
        Some(AcceptedPoint {
            angle_deg: node.angle_deg,
            distance_mm: node.distance_mm,
            quality: node.quality,
        })
    }

    /// Number of nodes accepted into the bucket of `degree` since the last wraparound.
    pub fn bucket_count(&self, degree: usize) -> Option<u8> {
        self.points_per_degree.get(degree).copied()
    }

    pub fn max_points_per_degree(&self) -> u8 {
        self.max_points_per_degree
    }

    pub fn stats(&self) -> DecimationStats {
        self.stats
    }

    /// Restores the state of a fresh session.
    pub fn reset(&mut self) {
        *self = Self::new(self.max_points_per_degree);
    }
}

fn degree_index(angle_deg: f32) -> Option<usize> {
    if !angle_deg.is_finite() || angle_deg < 0. {
        return None;
    }
    let degree = angle_deg.floor() as usize;
    (degree < DEGREE_BUCKETS).then_some(degree)
}
