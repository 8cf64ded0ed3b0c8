use crate::constants::{
    BATCH_CAPACITY, MAX_POINTS_PER_DEGREE, OUTPUT_FILE_PATTERN, POLL_DELAY_MS, POLL_TIMEOUT_MS,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Session settings. Every field is optional in the YAML form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Accepted nodes per one-degree bucket and revolution.
    pub max_points_per_degree: u8,
    /// Largest batch the pipeline will process.
    pub batch_capacity: usize,
    /// Timeout handed to the batch source on each poll.
    pub poll_timeout_ms: u64,
    /// Delay between polling iterations.
    pub poll_delay_ms: u64,
    /// CSV log path. A timestamped name is generated when absent.
    pub output_path: Option<PathBuf>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_points_per_degree: MAX_POINTS_PER_DEGREE,
            batch_capacity: BATCH_CAPACITY,
            poll_timeout_ms: POLL_TIMEOUT_MS,
            poll_delay_ms: POLL_DELAY_MS,
            output_path: None,
        }
    }
}

impl SamplerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|source| ConfigError::IoError {
            path: path_ref.display().to_string(),
            source,
        })?;
        let config: SamplerConfig =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::ParseError {
                path: path_ref.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_points_per_degree == 0 {
            return Err(ConfigError::InvalidValue(
                "max_points_per_degree must be at least 1".to_string(),
            ));
        }
        if self.batch_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "batch_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_delay_ms)
    }

    pub fn output_path_or_default(&self) -> PathBuf {
        self.output_path.clone().unwrap_or_else(default_output_path)
    }
}

/// `lidar_data_<YYYYmmdd>_<HHMMSS>.csv` in local time.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(chrono::Local::now().format(OUTPUT_FILE_PATTERN).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = SamplerConfig::default();
        assert_eq!(config.max_points_per_degree, 5);
        assert_eq!(config.batch_capacity, 8192);
        assert_eq!(config.poll_delay(), Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"max_points_per_degree: 3\noutput_path: scans/run.csv\n")
            .unwrap();
        let path = temp.into_temp_path();
        let config = SamplerConfig::load(&path).unwrap();
        assert_eq!(config.max_points_per_degree, 3);
        assert_eq!(config.batch_capacity, 8192);
        assert_eq!(config.output_path_or_default(), PathBuf::from("scans/run.csv"));
    }

    #[test]
    fn test_load_rejects_zero_cap() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"max_points_per_degree: 0\n").unwrap();
        let path = temp.into_temp_path();
        assert!(matches!(
            SamplerConfig::load(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            SamplerConfig::load("/nonexistent/rplidar.yaml"),
            Err(ConfigError::IoError { .. })
        ));

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"poll_delay_ms: soon\n").unwrap();
        let path = temp.into_temp_path();
        assert!(matches!(
            SamplerConfig::load(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_default_output_path() {
        let name = default_output_path().display().to_string();
        assert!(name.starts_with("lidar_data_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "lidar_data_20240101_000000.csv".len());
    }
}
