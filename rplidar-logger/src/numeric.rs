use rplidar_data::{CartesianPoint, MeasurementNode, RawNode};

pub(crate) fn q14_to_degree(angle_z_q14: u16) -> f32 {
    (angle_z_q14 as f32 * 90.) / 16384.
}

pub(crate) fn q2_to_millimeter(dist_mm_q2: u32) -> f32 {
    dist_mm_q2 as f32 / 4.
}

pub(crate) fn degree_to_radian(degree: f32) -> f32 {
    degree * std::f32::consts::PI / 180.
}

/// Converts a raw sensor node into physical units.
pub fn normalize(raw: &RawNode) -> MeasurementNode {
    MeasurementNode {
        angle_deg: q14_to_degree(raw.angle_z_q14),
        distance_mm: q2_to_millimeter(raw.dist_mm_q2),
        quality: raw.quality,
    }
}

pub fn to_cartesian(angle_deg: f32, distance_mm: f32) -> CartesianPoint {
    let radian = degree_to_radian(angle_deg);
    CartesianPoint {
        x: distance_mm * radian.cos(),
        y: distance_mm * radian.sin(),
    }
}

/// Sorts a batch ascending by angle. Nodes with equal angles keep their order.
pub fn ascend_scan_data(nodes: &mut [RawNode]) {
    nodes.sort_by_key(|node| node.angle_z_q14);
}
