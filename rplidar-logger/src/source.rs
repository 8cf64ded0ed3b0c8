use crate::error::SourceError;
use rplidar_data::RawNode;
use std::time::Duration;

/// Producer of measurement batches, typically a connected sensor driver.
///
/// Each successful poll returns the nodes grabbed since the previous poll,
/// sorted ascending by angle (see [`crate::ascend_scan_data`]). A batch may be
/// empty and is not aligned to any particular start angle.
pub trait BatchSource {
    fn poll(&mut self, timeout: Duration) -> Result<Vec<RawNode>, SourceError>;
}

impl<S: BatchSource + ?Sized> BatchSource for Box<S> {
    fn poll(&mut self, timeout: Duration) -> Result<Vec<RawNode>, SourceError> {
        (**self).poll(timeout)
    }
}

impl<S: BatchSource + ?Sized> BatchSource for &mut S {
    fn poll(&mut self, timeout: Duration) -> Result<Vec<RawNode>, SourceError> {
        (**self).poll(timeout)
    }
}
