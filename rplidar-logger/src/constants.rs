pub(crate) const DEGREE_BUCKETS: usize = 360;
pub(crate) const MAX_POINTS_PER_DEGREE: u8 = 5;
pub(crate) const BATCH_CAPACITY: usize = 8192;
pub(crate) const POLL_DELAY_MS: u64 = 50;
// Zero lets the source fall back to its own default timeout.
pub(crate) const POLL_TIMEOUT_MS: u64 = 0;
pub(crate) const RENDER_CHANNEL_CAPACITY: usize = 4;
pub(crate) const RENDER_SEND_TIMEOUT_MS: u64 = 500;
pub(crate) const CSV_HEADER: [&str; 5] = ["timestamp", "angle", "distance", "quality", "scan_number"];
pub(crate) const OUTPUT_FILE_PATTERN: &str = "lidar_data_%Y%m%d_%H%M%S.csv";
