use crate::constants::CSV_HEADER;
use crate::error::SinkError;
use crate::sink::RecordSink;
use rplidar_data::AcceptedRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Durable line-oriented log of accepted records.
///
/// Columns are `timestamp,angle,distance,quality,scan_number`: epoch seconds,
/// degrees, millimeters, quality and scan number, in emission order.
pub struct CsvSink<W: Write> {
    name: String,
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut sink = CsvSink::new(file)?;
        sink.name = format!("csv:{}", path.display());
        Ok(sink)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps `writer` and writes the header line.
    pub fn new(writer: W) -> Result<Self, SinkError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(CSV_HEADER)?;
        Ok(Self {
            name: "csv".to_string(),
            writer,
        })
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::IoError(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn emit(&mut self, record: &AcceptedRecord) -> Result<(), SinkError> {
        self.writer.write_record(&[
            record.timestamp.to_string(),
            record.angle_deg.to_string(),
            record.distance_mm.to_string(),
            record.quality.to_string(),
            record.scan_number.to_string(),
        ])?;
        Ok(())
    }

    fn end_batch(&mut self, _scan_number: u64) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Parses a log written by [`CsvSink`] back into records, by field position.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<AcceptedRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    reader
        .deserialize::<(i64, f32, f32, u8, u64)>()
        .map(|row| {
            row.map(
                |(timestamp, angle_deg, distance_mm, quality, scan_number)| AcceptedRecord {
                    timestamp,
                    angle_deg,
                    distance_mm,
                    quality,
                    scan_number,
                },
            )
        })
        .collect()
}
