/// Scan identifier stamped onto accepted records.
///
/// Incremented once per retrieved batch and once per detected wraparound.
/// Both triggers can fire for the same revolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanCounter {
    value: u64,
}

impl ScanCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_batch_start(&mut self) {
        self.value = self.value.saturating_add(1);
    }

    pub fn on_wraparound(&mut self) {
        self.value = self.value.saturating_add(1);
    }

    pub fn current(&self) -> u64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_counter() {
        let mut counter = ScanCounter::new();
        assert_eq!(counter.current(), 0);
        counter.on_batch_start();
        assert_eq!(counter.current(), 1);
        counter.on_wraparound();
        counter.on_batch_start();
        assert_eq!(counter.current(), 3);
    }

    #[test]
    fn test_scan_counter_saturates() {
        let mut counter = ScanCounter { value: u64::MAX };
        counter.on_batch_start();
        counter.on_wraparound();
        assert_eq!(counter.current(), u64::MAX);
    }
}
