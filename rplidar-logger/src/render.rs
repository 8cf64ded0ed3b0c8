use crate::constants::{RENDER_CHANNEL_CAPACITY, RENDER_SEND_TIMEOUT_MS};
use crate::error::SinkError;
use crate::numeric::to_cartesian;
use crate::sink::RecordSink;
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use rplidar_data::{AcceptedRecord, CartesianPoint, RenderFrame};
use std::time::Duration;

/// Sink that hands a per-iteration Cartesian snapshot to a renderer thread.
///
/// Frames only hold the points of the current iteration. Sending blocks while
/// the channel is full, so a slow renderer throttles polling. A renderer that
/// leaves a frame unread for longer than the send timeout is reported as
/// [`SinkError::Stalled`], which disables this sink only.
pub struct RenderSink {
    frame_tx: Sender<RenderFrame>,
    points: Vec<CartesianPoint>,
    send_timeout: Duration,
}

impl RenderSink {
    pub fn new(frame_tx: Sender<RenderFrame>) -> Self {
        Self {
            frame_tx,
            points: Vec::new(),
            send_timeout: Duration::from_millis(RENDER_SEND_TIMEOUT_MS),
        }
    }

    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }
}

/// Creates a render sink and the receiving end for the renderer.
pub fn render_channel() -> (RenderSink, Receiver<RenderFrame>) {
    let (frame_tx, frame_rx) = bounded(RENDER_CHANNEL_CAPACITY);
    (RenderSink::new(frame_tx), frame_rx)
}

impl RecordSink for RenderSink {
    fn name(&self) -> &str {
        "render"
    }

    fn emit(&mut self, record: &AcceptedRecord) -> Result<(), SinkError> {
        self.points
            .push(to_cartesian(record.angle_deg, record.distance_mm));
        Ok(())
    }

    fn end_batch(&mut self, scan_number: u64) -> Result<(), SinkError> {
        let frame = RenderFrame {
            scan_number,
            points: std::mem::take(&mut self.points),
        };
        self.frame_tx
            .send_timeout(frame, self.send_timeout)
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => {
                    SinkError::Stalled("render frame receiver".to_string())
                }
                SendTimeoutError::Disconnected(_) => {
                    SinkError::Disconnected("render frame receiver".to_string())
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(angle_deg: f32, distance_mm: f32) -> AcceptedRecord {
        AcceptedRecord {
            timestamp: 0,
            angle_deg,
            distance_mm,
            quality: 0,
            scan_number: 3,
        }
    }

    #[test]
    fn test_frame_per_batch() {
        let (mut sink, frame_rx) = render_channel();
        sink.emit(&record(0., 1000.)).unwrap();
        sink.emit(&record(90., 2000.)).unwrap();
        sink.end_batch(3).unwrap();

        let frame = frame_rx.try_recv().unwrap();
        assert_eq!(frame.scan_number, 3);
        assert_eq!(frame.points.len(), 2);
        assert!((frame.points[0].x - 1000.).abs() < 1e-3);
        assert!((frame.points[1].y - 2000.).abs() < 1e-3);

        // The next frame does not carry the previous iteration's points.
        sink.end_batch(4).unwrap();
        let frame = frame_rx.try_recv().unwrap();
        assert_eq!(frame.scan_number, 4);
        assert!(frame.points.is_empty());
    }

    #[test]
    fn test_undrained_renderer_times_out() {
        let (sink, frame_rx) = render_channel();
        let mut sink = sink.with_send_timeout(Duration::from_millis(20));
        for scan_number in 0..RENDER_CHANNEL_CAPACITY as u64 {
            sink.end_batch(scan_number).unwrap();
        }
        assert!(matches!(sink.end_batch(99), Err(SinkError::Stalled(_))));
        assert_eq!(frame_rx.len(), RENDER_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_disconnected_renderer() {
        let (mut sink, frame_rx) = render_channel();
        drop(frame_rx);
        sink.emit(&record(10., 10.)).unwrap();
        assert!(matches!(
            sink.end_batch(1),
            Err(SinkError::Disconnected(_))
        ));
    }
}
