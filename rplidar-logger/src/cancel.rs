use crate::time::sleep_ms;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::cell::Cell;
use std::time::Duration;

/// Requests cancellation of a running pipeline. Cheap to clone and `Send`.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    terminator_tx: Sender<bool>,
}

impl CancelHandle {
    /// Requests cancellation. Repeated calls have no further effect.
    pub fn cancel(&self) {
        // A full channel already holds a pending request.
        let _ = self.terminator_tx.try_send(true);
    }
}

/// Polled by the pipeline at the top of every iteration.
///
/// Once observed, cancellation is latched. Dropping every [`CancelHandle`]
/// does not cancel.
#[derive(Debug)]
pub struct CancelToken {
    terminator_rx: Receiver<bool>,
    cancelled: Cell<bool>,
}

pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (terminator_tx, terminator_rx) = bounded(1);
    (
        CancelHandle { terminator_tx },
        CancelToken {
            terminator_rx,
            cancelled: Cell::new(false),
        },
    )
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        if self.cancelled.get() {
            return true;
        }
        let cancelled = match self.terminator_rx.try_recv() {
            Ok(terminate) => terminate,
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
        };
        self.cancelled.set(cancelled);
        cancelled
    }

    /// Waits up to `timeout`, returning early with `true` if cancellation is requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.cancelled.get() {
            return true;
        }
        match self.terminator_rx.recv_timeout(timeout) {
            Ok(terminate) => {
                self.cancelled.set(terminate);
                terminate
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                sleep_ms(timeout.as_millis() as u64);
                false
            }
        }
    }
}

/// Installs a Ctrl-C handler that cancels the returned token.
pub fn cancel_on_ctrl_c() -> Result<CancelToken, ctrlc::Error> {
    let (handle, token) = cancellation();
    ctrlc::set_handler(move || handle.cancel())?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_cancel_is_latched() {
        let (handle, token) = cancellation();
        assert!(!token.is_cancelled());
        handle.cancel();
        handle.cancel();
        assert!(token.is_cancelled());
        assert!(token.is_cancelled());
        assert!(token.wait_timeout(Duration::from_secs(10)));
    }

    #[test]
    fn test_wait_wakes_on_cancel() {
        let (handle, token) = cancellation();
        let canceller = std::thread::spawn(move || {
            sleep_ms(20);
            handle.cancel();
        });
        let start = Instant::now();
        assert!(token.wait_timeout(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(5));
        canceller.join().unwrap();
    }

    #[test]
    fn test_wait_times_out() {
        let (_handle, token) = cancellation();
        assert!(!token.wait_timeout(Duration::from_millis(5)));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_dropped_handle_does_not_cancel() {
        let (handle, token) = cancellation();
        drop(handle);
        assert!(!token.is_cancelled());
        assert!(!token.wait_timeout(Duration::from_millis(5)));
    }
}
