//! [`StatsSink`] implementations.
//!
//! # Wire format
//!
//! [`JsonLinesSink`] writes one JSON object per row, externally tagged by
//! row kind, with columns in schema order:
//!
//! ```json
//! {"Event":{"atom":19,"action":0,"src_state":2,"dst_state":4,"event_id":338,...}}
//! {"Snapshot":{"atom":262,"event_id":579,"target_id":401,...}}
//! ```

use crate::row::StatsRow;
use crate::traits::StatsSink;
use std::convert::Infallible;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Errors produced by [`JsonLinesSink`].
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json encode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Newline-delimited JSON over any writer.
pub struct JsonLinesSink<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> StatsSink for JsonLinesSink<W> {
    type Error = SinkError;

    fn write(&mut self, row: &StatsRow) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.out, row)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}

/// Keeps every row in memory.  Clones share the same storage, so one clone
/// can be handed to the writer while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    rows: Arc<Mutex<Vec<StatsRow>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every row written so far.
    pub fn rows(&self) -> Vec<StatsRow> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl StatsSink for MemorySink {
    type Error = Infallible;

    fn write(&mut self, row: &StatsRow) -> Result<(), Infallible> {
        self.rows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(row.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Record;
    use crate::event::InstanceId;
    use crate::row::SnapshotRow;

    #[test]
    fn json_lines_one_row_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        let row = StatsRow::Snapshot(SnapshotRow::new(&Record::default(), InstanceId(4)));
        sink.write(&row).unwrap();
        sink.write(&row).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"Snapshot":{"atom":262,"#));
        let parsed: StatsRow = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed, row);
    }

    #[test]
    fn memory_sink_clones_share_rows() {
        let sink = MemorySink::new();
        let mut writer_side = sink.clone();
        let row = StatsRow::Snapshot(SnapshotRow::new(&Record::default(), InstanceId::DEFAULT));
        writer_side.write(&row).unwrap();
        assert_eq!(sink.rows(), vec![row]);
    }
}
