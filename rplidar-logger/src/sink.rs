use crate::error::SinkError;
use log::error;
use rplidar_data::AcceptedRecord;

/// Consumer of the accepted-record stream.
///
/// Sinks receive their own copies of every record and never feed back into
/// the decimation state.
pub trait RecordSink {
    /// Name used in log messages and the session summary.
    fn name(&self) -> &str;

    fn emit(&mut self, record: &AcceptedRecord) -> Result<(), SinkError>;

    /// Called once per polling iteration after its records were emitted,
    /// including iterations that accepted nothing.
    fn end_batch(&mut self, _scan_number: u64) -> Result<(), SinkError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<K: RecordSink + ?Sized> RecordSink for Box<K> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn emit(&mut self, record: &AcceptedRecord) -> Result<(), SinkError> {
        (**self).emit(record)
    }

    fn end_batch(&mut self, scan_number: u64) -> Result<(), SinkError> {
        (**self).end_batch(scan_number)
    }

    fn close(&mut self) -> Result<(), SinkError> {
        (**self).close()
    }
}

struct SinkSlot {
    sink: Box<dyn RecordSink>,
    enabled: bool,
}

impl SinkSlot {
    fn disable(&mut self, err: SinkError) {
        error!(
            "Sink \"{}\" failed and is disabled for the rest of the session: {}",
            self.sink.name(),
            err
        );
        self.enabled = false;
    }
}

/// Independent sinks fed the same records. A failing sink is disabled
/// without affecting the others.
#[derive(Default)]
pub(crate) struct SinkSet {
    slots: Vec<SinkSlot>,
    closed: bool,
}

impl SinkSet {
    pub(crate) fn push(&mut self, sink: Box<dyn RecordSink>) {
        self.slots.push(SinkSlot {
            sink,
            enabled: true,
        });
    }

    pub(crate) fn dispatch(&mut self, records: &[AcceptedRecord], scan_number: u64) {
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            let result = records
                .iter()
                .try_for_each(|record| slot.sink.emit(record))
                .and_then(|_| slot.sink.end_batch(scan_number));
            if let Err(e) = result {
                slot.disable(e);
            }
        }
    }

    pub(crate) fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            if let Err(e) = slot.sink.close() {
                slot.disable(e);
            }
        }
    }

    pub(crate) fn disabled(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|s| !s.enabled)
            .map(|s| s.sink.name().to_string())
            .collect()
    }

    pub(crate) fn n_enabled(&self) -> usize {
        self.slots.iter().filter(|s| s.enabled).count()
    }
}
