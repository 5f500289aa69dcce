//! Core traits that decouple the stats pipeline from any specific transport.
//!
//! * [`StatsSink`] is the platform side: whatever finally stores or forwards
//!   the fixed-schema rows.
//! * [`StatsLogConsumer`] observes every event in-process before its row
//!   reaches the sink (tests, local debugging overlays, …).
//! * [`RequestSource`] delivers log requests into the daemon, the way a
//!   Unix socket or a test harness would.

use crate::atom::Record;
use crate::event::EventEnum;
use crate::ipc::Request;
use crate::row::StatsRow;
use std::sync::mpsc;

/// Destination for fixed-schema rows.
///
/// Rows arrive in submission order from a single writer thread, so
/// implementations need no internal ordering of their own.
pub trait StatsSink: Send {
    /// The error type produced by this sink.
    type Error: std::error::Error + Send + 'static;

    /// Write one row.
    fn write(&mut self, row: &StatsRow) -> Result<(), Self::Error>;

    /// Flush any buffered rows.  The default does nothing.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Observer invoked for every row, on the writer thread, before the sink.
///
/// Besides the flat `row` it receives the event and the fully overwritten
/// `record` the row was built from.
pub trait StatsLogConsumer: Send + Sync {
    fn consume(&self, event: &dyn EventEnum, record: &Record, row: &StatsRow);
}

/// A source of log [`Request`]s.
///
/// # Contract
///
/// * [`run`](RequestSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received request is sent through `sink` exactly once.
pub trait RequestSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Request`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Request>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, InstanceId};

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    /// A test double that emits a fixed sequence of requests.
    struct MockSource {
        requests: Vec<Request>,
    }

    impl RequestSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Request>) -> Result<(), MockError> {
            for req in self.requests.drain(..) {
                let _ = sink.send(req);
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_requests() {
        let snapshot = Request::Snapshot {
            record: Record::default(),
            instance_id: InstanceId(3),
        };
        let mut src = MockSource {
            requests: vec![
                Request::Event(Box::default()),
                snapshot.clone(),
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let reqs: Vec<Request> = rx.try_iter().collect();
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[1], snapshot);
        match &reqs[0] {
            Request::Event(ev) => assert_eq!(ev.event, Event::new(0)),
            other => panic!("unexpected request {:?}", other),
        }
    }
}
