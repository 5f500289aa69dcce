//! Fixed-schema stats rows.
//!
//! The field order of [`EventRow`] and [`SnapshotRow`] is the positional
//! order of the platform write and is serialized in that order.  Do not
//! reorder fields.

use crate::atom::{ItemPayload, Record};
use crate::event::{Event, EventEnum, InstanceId, LauncherState, LAUNCHER_WORKSPACE_SNAPSHOT};
use crate::normalize::{target_id, NormalizedFields};
use serde::{Deserialize, Serialize};

/// Atom id of the launcher UI event.
pub const LAUNCHER_EVENT_ATOM: u32 = 19;
/// Atom id of the workspace snapshot.
pub const LAUNCHER_SNAPSHOT_ATOM: u32 = 262;
/// The only action still written; the column is deprecated.
pub const DEFAULT_ACTION: i32 = 0;

/// One `LAUNCHER_EVENT` write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRow {
    pub atom: u32,
    pub action: i32,
    pub src_state: i32,
    pub dst_state: i32,
    pub event_id: u32,
    pub target_id: i32,
    pub instance_id: i32,
    pub uid: i32,
    pub package_name: Option<String>,
    pub component_name: Option<String>,
    pub grid_x: i32,
    pub grid_y: i32,
    pub page_id: i32,
    pub grid_x_parent: i32,
    pub grid_y_parent: i32,
    pub page_id_parent: i32,
    pub hierarchy: i32,
    pub is_work_profile: bool,
    pub rank: i32,
    pub from_state: i32,
    pub to_state: i32,
    pub edit_text: String,
    pub cardinality: i32,
    pub features: i32,
}

impl EventRow {
    pub fn new(
        event: &dyn EventEnum,
        record: &Record,
        instance_id: InstanceId,
        src_state: LauncherState,
        dst_state: LauncherState,
    ) -> Self {
        let fields = NormalizedFields::from_record(record);
        let icon = record.folder_icon_or_default();
        Self {
            atom: LAUNCHER_EVENT_ATOM,
            action: DEFAULT_ACTION,
            src_state: src_state.0,
            dst_state: dst_state.0,
            event_id: event.id(),
            target_id: target_id(record),
            instance_id: instance_id.0,
            uid: 0,
            package_name: fields.package_name,
            component_name: fields.component_name,
            grid_x: fields.grid_x,
            grid_y: fields.grid_y,
            page_id: fields.page_id,
            grid_x_parent: fields.grid_x_parent,
            grid_y_parent: fields.grid_y_parent,
            page_id_parent: fields.page_id_parent,
            hierarchy: fields.hierarchy,
            is_work_profile: record.is_work,
            rank: record.rank.unwrap_or(0),
            from_state: icon.from_label_state.number(),
            to_state: icon.to_label_state.number(),
            edit_text: icon.label_info,
            cardinality: fields.cardinality,
            features: fields.features,
        }
    }
}

/// One `LAUNCHER_SNAPSHOT` write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub atom: u32,
    pub event_id: u32,
    pub target_id: i32,
    pub instance_id: i32,
    pub uid: i32,
    pub package_name: Option<String>,
    pub component_name: Option<String>,
    pub grid_x: i32,
    pub grid_y: i32,
    pub page_id: i32,
    pub grid_x_parent: i32,
    pub grid_y_parent: i32,
    pub page_id_parent: i32,
    pub hierarchy: i32,
    pub is_work_profile: bool,
    /// The record's attribute, reported as the item's origin.
    pub origin: i32,
    pub cardinality: i32,
    pub span_x: i32,
    pub span_y: i32,
    pub features: i32,
}

impl SnapshotRow {
    pub fn new(record: &Record, instance_id: InstanceId) -> Self {
        let fields = NormalizedFields::from_record(record);
        let (span_x, span_y) = match &record.payload {
            ItemPayload::Widget(widget) => (widget.span_x, widget.span_y),
            _ => (0, 0),
        };
        Self {
            atom: LAUNCHER_SNAPSHOT_ATOM,
            event_id: LAUNCHER_WORKSPACE_SNAPSHOT,
            target_id: target_id(record),
            instance_id: instance_id.0,
            uid: 0,
            package_name: fields.package_name,
            component_name: fields.component_name,
            grid_x: fields.grid_x,
            grid_y: fields.grid_y,
            page_id: fields.page_id,
            grid_x_parent: fields.grid_x_parent,
            grid_y_parent: fields.grid_y_parent,
            page_id_parent: fields.page_id_parent,
            hierarchy: fields.hierarchy,
            is_work_profile: record.is_work,
            origin: record.attribute.number(),
            cardinality: fields.cardinality,
            span_x,
            span_y,
            features: fields.features,
        }
    }
}

/// A row waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatsRow {
    Event(EventRow),
    Snapshot(SnapshotRow),
}

/// A row together with the event and record it was built from.
///
/// Sinks only see [`row`](Self::row); consumers also get the structured
/// record, which keeps what the flat columns lose (payload variant, widget
/// span, slice uri).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedRow {
    pub event: Event,
    pub record: Record,
    pub row: StatsRow,
}

impl LoggedRow {
    pub fn event(
        event: &dyn EventEnum,
        record: Record,
        instance_id: InstanceId,
        src: LauncherState,
        dst: LauncherState,
    ) -> Self {
        let row = StatsRow::Event(EventRow::new(event, &record, instance_id, src, dst));
        Self {
            event: Event::named(event.id(), event.name()),
            record,
            row,
        }
    }

    pub fn snapshot(record: Record, instance_id: InstanceId) -> Self {
        let row = StatsRow::Snapshot(SnapshotRow::new(&record, instance_id));
        Self {
            event: Event::named(LAUNCHER_WORKSPACE_SNAPSHOT, "LAUNCHER_WORKSPACE_SNAPSHOT"),
            record,
            row,
        }
    }
}
