#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A node that passed decimation, before it is stamped.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcceptedPoint {
    pub angle_deg: f32,
    pub distance_mm: f32,
    pub quality: u8,
}

/// Unit handed to record sinks.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AcceptedRecord {
    /// Wall-clock time of acceptance, in seconds since the Unix epoch.
    pub timestamp: i64,
    /// Scan angle in degrees.
    pub angle_deg: f32,
    /// Distance to an object in millimeters.
    pub distance_mm: f32,
    /// Return strength of the laser pulse.
    pub quality: u8,
    /// Scan identifier at the moment of acceptance.
    pub scan_number: u64,
}

/// Accepted point projected onto the sensor plane, in millimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CartesianPoint {
    pub x: f32,
    pub y: f32,
}

/// Snapshot of one polling iteration for a live renderer.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RenderFrame {
    /// Scan number after the iteration that produced the frame.
    pub scan_number: u64,
    /// Points accepted during this iteration only.
    pub points: Vec<CartesianPoint>,
}
