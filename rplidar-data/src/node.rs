#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One HQ measurement node as delivered by the sensor, still in its fixed-point encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawNode {
    /// Angle in degrees, Q14 fixed point scaled so that `0x4000` is 90 degrees.
    pub angle_z_q14: u16,
    /// Distance in millimeters, Q2 fixed point.
    pub dist_mm_q2: u32,
    /// Return strength of the laser pulse.
    pub quality: u8,
    /// Sync flag reported by the sensor. Not used for revolution detection.
    pub flag: u8,
}

/// One sensor reading in physical units.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeasurementNode {
    /// Scan angle in degrees, in `[0, 360)` for well-formed input.
    pub angle_deg: f32,
    /// Distance to an object in millimeters. Zero means no return.
    pub distance_mm: f32,
    /// Return strength of the laser pulse.
    pub quality: u8,
}
