pub(crate) fn sleep_ms(duration: u64) {
    std::thread::sleep(std::time::Duration::from_millis(duration));
}

/// Wall-clock source used to stamp accepted records.
pub trait Clock {
    fn now_epoch_seconds(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_epoch_seconds(&self) -> i64 {
        (**self).now_epoch_seconds()
    }
}
