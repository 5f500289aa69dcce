//! IPC listener that accepts log requests over a Unix socket.
//!
//! Producers connect to the socket and send newline-delimited JSON
//! [`Request`]s; the daemon turns each one into a stats row.

pub mod listener;

use crate::atom::{FromState, Record, ToState};
use crate::event::{Event, InstanceId, LauncherState};
use crate::logger::{LoggerError, StatsLogManager, Subject};
use serde::{Deserialize, Serialize};

/// One launcher event as sent over the wire.  Every field except `event`
/// is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventRequest {
    pub event: Event,
    #[serde(default)]
    pub subject: Subject,
    #[serde(default)]
    pub instance_id: InstanceId,
    #[serde(default)]
    pub rank: Option<i32>,
    #[serde(default)]
    pub src_state: LauncherState,
    #[serde(default)]
    pub dst_state: LauncherState,
    #[serde(default)]
    pub from_state: Option<FromState>,
    #[serde(default)]
    pub to_state: Option<ToState>,
    #[serde(default)]
    pub edit_text: Option<String>,
}

/// Every request the daemon understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Log a launcher event.
    Event(Box<EventRequest>),
    /// Log a workspace snapshot of one item.
    Snapshot {
        record: Record,
        #[serde(default)]
        instance_id: InstanceId,
    },
}

impl Request {
    /// Build the row for this request and queue it on `manager`.
    pub fn apply(self, manager: &StatsLogManager) -> Result<(), LoggerError> {
        match self {
            Request::Event(req) => {
                let EventRequest {
                    event,
                    subject,
                    instance_id,
                    rank,
                    src_state,
                    dst_state,
                    from_state,
                    to_state,
                    edit_text,
                } = *req;
                let mut logger = manager
                    .logger()
                    .with_subject(subject)?
                    .with_instance_id(instance_id)
                    .with_src_state(src_state)
                    .with_dst_state(dst_state);
                if let Some(rank) = rank {
                    logger = logger.with_rank(rank);
                }
                if let Some(from) = from_state {
                    logger = logger.with_from_state(from);
                }
                if let Some(to) = to_state {
                    logger = logger.with_to_state(to);
                }
                if let Some(text) = edit_text {
                    logger = logger.with_edit_text(text);
                }
                logger.log(&event)
            }
            Request::Snapshot {
                record,
                instance_id,
            } => manager.write_snapshot(&record, instance_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{ContainerPlacement, HotseatContainer};
    use crate::row::StatsRow;
    use crate::sink::MemorySink;
    use crate::writer::StatsWriter;

    #[test]
    fn parse_event_request() {
        let json = r#"{"Event":{
            "event": {"id": 338, "name": "LAUNCHER_APP_LAUNCH_TAP"},
            "subject": {"Placed": {"container": {"Hotseat": {"index": 1}}}},
            "instance_id": 4,
            "src_state": 2,
            "rank": 3
        }}"#;
        let req: Request = serde_json::from_str(json).unwrap();
        let Request::Event(ev) = req else {
            panic!("expected event request");
        };
        assert_eq!(ev.event.id, 338);
        assert_eq!(ev.instance_id, InstanceId(4));
        assert_eq!(ev.src_state, LauncherState::HOME);
        assert_eq!(ev.rank, Some(3));
        assert_eq!(
            ev.subject,
            Subject::Placed {
                container: Some(ContainerPlacement::Hotseat(HotseatContainer { index: 1 })),
                slice: None,
            }
        );
    }

    #[test]
    fn event_request_requires_event() {
        assert!(serde_json::from_str::<Request>(r#"{"Event":{}}"#).is_err());
        let minimal: Request = serde_json::from_str(r#"{"Event":{"event":{"id":7}}}"#).unwrap();
        match minimal {
            Request::Event(req) => {
                assert_eq!(req.event, Event::new(7));
                assert_eq!(req.subject, Subject::None);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn parse_snapshot_request_defaults_instance() {
        let json = r#"{"Snapshot":{"record":{}}}"#;
        let req: Request = serde_json::from_str(json).unwrap();
        assert_eq!(
            req,
            Request::Snapshot {
                record: Record::default(),
                instance_id: InstanceId::DEFAULT,
            }
        );
    }

    #[test]
    fn apply_routes_to_writer() {
        let sink = MemorySink::new();
        let writer = StatsWriter::spawn(sink.clone()).unwrap();
        let manager = StatsLogManager::new(writer.handle(), false);

        let event = Request::Event(Box::new(EventRequest {
            event: Event::new(12),
            edit_text: Some("Travel".into()),
            ..EventRequest::default()
        }));
        event.apply(&manager).unwrap();
        Request::Snapshot {
            record: Record::default(),
            instance_id: InstanceId(1),
        }
        .apply(&manager)
        .unwrap();
        writer.flush().unwrap();

        let rows = sink.rows();
        assert_eq!(rows.len(), 2);
        match &rows[0] {
            StatsRow::Event(row) => {
                assert_eq!(row.event_id, 12);
                assert_eq!(row.edit_text, "Travel");
            }
            other => panic!("unexpected row {:?}", other),
        }
        assert!(matches!(&rows[1], StatsRow::Snapshot(s) if s.instance_id == 1));
    }
}
