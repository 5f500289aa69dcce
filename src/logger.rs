//! Per-event stats logger.
//!
//! A [`StatsLogger`] is a one-shot builder obtained from a
//! [`StatsLogManager`].  It collects the subject of the event plus a set of
//! overwrites, then [`log`](StatsLogger::log) turns the result into an
//! [`EventRow`](crate::row::EventRow) and queues it on the background writer.
//!
//! The subject is exclusive: an event is either about an item (a full
//! [`Record`]) **or** about a placement, optionally with a slice.  The
//! builder's type parameter tracks which one has been chosen, so a call
//! sequence that would mix them does not compile:
//!
//! ```compile_fail
//! # use statslog::atom::*;
//! # fn demo(manager: &statslog::logger::StatsLogManager) {
//! manager
//!     .logger()
//!     .with_item_info(Record::default())
//!     .with_container_info(ContainerPlacement::AllApps); // no such method
//! # }
//! ```

use crate::atom::{
    ContainerPlacement, FolderIcon, FromState, ItemPayload, Record, Slice, ToState,
};
use crate::event::{EventEnum, InstanceId, LauncherState};
use crate::row::LoggedRow;
use crate::writer::{WriterError, WriterHandle};
use log::info;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Errors from building or queueing a log event.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("expected a valid slice uri but received an empty one")]
    EmptySliceUri,
    #[error(transparent)]
    Writer(#[from] WriterError),
}

/// What an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Subject {
    /// Nothing beyond the overwrites.
    #[default]
    None,
    /// A launcher item with its own placement.
    Item(Record),
    /// A bare placement, optionally showing a slice.
    Placed {
        #[serde(default)]
        container: Option<ContainerPlacement>,
        #[serde(default)]
        slice: Option<Slice>,
    },
}

impl Subject {
    fn validate(&self) -> Result<(), LoggerError> {
        match self {
            Subject::Placed {
                slice: Some(slice), ..
            } => check_slice(slice),
            _ => Ok(()),
        }
    }
}

fn check_slice(slice: &Slice) -> Result<(), LoggerError> {
    if slice.uri.trim().is_empty() {
        Err(LoggerError::EmptySliceUri)
    } else {
        Ok(())
    }
}

//  Builder states

/// No subject chosen yet.
#[derive(Debug)]
pub struct Unset;
/// The subject is an item.
#[derive(Debug)]
pub struct ItemSet;
/// The subject is a placement and/or slice.
#[derive(Debug)]
pub struct PlacementSet;
/// The subject was supplied whole via [`StatsLogger::with_subject`].
#[derive(Debug)]
pub struct SubjectSet;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Unset {}
    impl Sealed for super::PlacementSet {}
}

/// States that still accept a container or slice.
pub trait AcceptsPlacement: sealed::Sealed {}
impl AcceptsPlacement for Unset {}
impl AcceptsPlacement for PlacementSet {}

/// Hands out [`StatsLogger`]s that all write through the same queue.
#[derive(Clone)]
pub struct StatsLogManager {
    writer: WriterHandle,
    verbose: bool,
}

impl StatsLogManager {
    /// `verbose` renders every event as an `info` log line.
    pub fn new(writer: WriterHandle, verbose: bool) -> Self {
        Self { writer, verbose }
    }

    /// Start a new event.
    pub fn logger(&self) -> StatsLogger<Unset> {
        StatsLogger {
            writer: self.writer.clone(),
            verbose: self.verbose,
            subject: Subject::None,
            instance_id: InstanceId::DEFAULT,
            rank: None,
            src_state: LauncherState::UNSPECIFIED,
            dst_state: LauncherState::UNSPECIFIED,
            from_state: None,
            to_state: None,
            edit_text: None,
            _state: PhantomData,
        }
    }

    /// Queue a workspace snapshot of `record`.
    pub fn write_snapshot(
        &self,
        record: &Record,
        instance_id: InstanceId,
    ) -> Result<(), LoggerError> {
        if self.verbose {
            info!("writeSnapshot({}):\n{}", instance_id, record);
        }
        self.writer
            .submit(LoggedRow::snapshot(record.clone(), instance_id))?;
        Ok(())
    }
}

/// One-shot event builder.  See the [module docs](self).
#[derive(Debug)]
#[must_use = "a stats logger does nothing until `log` is called"]
pub struct StatsLogger<S> {
    writer: WriterHandle,
    verbose: bool,
    subject: Subject,
    instance_id: InstanceId,
    rank: Option<i32>,
    src_state: LauncherState,
    dst_state: LauncherState,
    from_state: Option<FromState>,
    to_state: Option<ToState>,
    edit_text: Option<String>,
    _state: PhantomData<S>,
}

impl<S> StatsLogger<S> {
    fn into_state<T>(self) -> StatsLogger<T> {
        StatsLogger {
            writer: self.writer,
            verbose: self.verbose,
            subject: self.subject,
            instance_id: self.instance_id,
            rank: self.rank,
            src_state: self.src_state,
            dst_state: self.dst_state,
            from_state: self.from_state,
            to_state: self.to_state,
            edit_text: self.edit_text,
            _state: PhantomData,
        }
    }

    pub fn with_instance_id(mut self, instance_id: InstanceId) -> Self {
        self.instance_id = instance_id;
        self
    }

    pub fn with_rank(mut self, rank: i32) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_src_state(mut self, state: LauncherState) -> Self {
        self.src_state = state;
        self
    }

    pub fn with_dst_state(mut self, state: LauncherState) -> Self {
        self.dst_state = state;
        self
    }

    pub fn with_from_state(mut self, state: FromState) -> Self {
        self.from_state = Some(state);
        self
    }

    pub fn with_to_state(mut self, state: ToState) -> Self {
        self.to_state = Some(state);
        self
    }

    pub fn with_edit_text(mut self, text: impl Into<String>) -> Self {
        self.edit_text = Some(text.into());
        self
    }

    /// The record this logger would write: the subject with every
    /// overwrite applied.
    pub fn build_record(&self) -> Record {
        let mut record = match &self.subject {
            Subject::None => Record::default(),
            Subject::Item(record) => record.clone(),
            Subject::Placed { container, slice } => Record {
                payload: slice
                    .clone()
                    .map_or(ItemPayload::None, ItemPayload::Slice),
                container: container.unwrap_or_default(),
                ..Record::default()
            },
        };

        if let Some(rank) = self.rank {
            record.rank = Some(rank);
        }
        if self.from_state.is_some() || self.to_state.is_some() || self.edit_text.is_some() {
            let icon = record.folder_icon.get_or_insert_with(FolderIcon::default);
            if let Some(from) = self.from_state {
                icon.from_label_state = from;
            }
            if let Some(to) = self.to_state {
                icon.to_label_state = to;
            }
            if let Some(text) = &self.edit_text {
                icon.label_info = text.clone();
            }
        }
        record
    }

    /// Build the row for `event` and queue it behind every earlier event.
    pub fn log(self, event: &dyn EventEnum) -> Result<(), LoggerError> {
        let record = self.build_record();
        if self.verbose {
            info!(
                "{}",
                render(event, self.instance_id, self.src_state, self.dst_state, &record)
            );
        }
        self.writer.submit(LoggedRow::event(
            event,
            record,
            self.instance_id,
            self.src_state,
            self.dst_state,
        ))?;
        Ok(())
    }
}

impl StatsLogger<Unset> {
    /// Log an item.  Excludes any container or slice.
    pub fn with_item_info(mut self, record: Record) -> StatsLogger<ItemSet> {
        self.subject = Subject::Item(record);
        self.into_state()
    }

    /// Use a subject decided at runtime, e.g. one received over the wire.
    pub fn with_subject(mut self, subject: Subject) -> Result<StatsLogger<SubjectSet>, LoggerError> {
        subject.validate()?;
        self.subject = subject;
        Ok(self.into_state())
    }
}

impl<S: AcceptsPlacement> StatsLogger<S> {
    /// Log a placement.  Excludes an item.
    pub fn with_container_info(mut self, placement: ContainerPlacement) -> StatsLogger<PlacementSet> {
        let slice = match std::mem::take(&mut self.subject) {
            Subject::Placed { slice, .. } => slice,
            _ => None,
        };
        self.subject = Subject::Placed {
            container: Some(placement),
            slice,
        };
        self.into_state()
    }

    /// Log a slice.  Excludes an item; the uri must not be empty.
    pub fn with_slice(mut self, slice: Slice) -> Result<StatsLogger<PlacementSet>, LoggerError> {
        check_slice(&slice)?;
        let container = match std::mem::take(&mut self.subject) {
            Subject::Placed { container, .. } => container,
            _ => None,
        };
        self.subject = Subject::Placed {
            container,
            slice: Some(slice),
        };
        Ok(self.into_state())
    }
}

/// Human-readable rendering of one event for verbose output.
pub fn render(
    event: &dyn EventEnum,
    instance_id: InstanceId,
    src: LauncherState,
    dst: LauncherState,
    record: &Record,
) -> String {
    if instance_id.is_default() {
        format!("{} (State:{}->{})\n{}", event.name(), src, dst, record)
    } else {
        format!(
            "{} (State:{}->{}) (InstanceId:{})\n{}",
            event.name(),
            src,
            dst,
            instance_id,
            record
        )
    }
}
