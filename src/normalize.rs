//! Record normalization.
//!
//! Turns a [`Record`] into the flat scalar fields of a stats row.  Every
//! function here is pure and total: each dispatch has a default arm, so any
//! payload/placement combination produces a value.
//!
//! Two encodings are part of the downstream contract and must not change:
//!
//! * `target_id = attribute * 100 + item code`
//! * `hierarchy` bands: folders add 100, search results add 200, extended
//!   containers add 300 to the code of their inner kind.

use crate::atom::{
    ContainerPlacement, ExtendedContainer, FolderParent, ItemPayload, Record, SearchResultParent,
    WorkspaceContainer,
};

pub const FOLDER_HIERARCHY_OFFSET: i32 = 100;
pub const SEARCH_RESULT_HIERARCHY_OFFSET: i32 = 200;
pub const EXTENDED_CONTAINERS_HIERARCHY_OFFSET: i32 = 300;
pub const ATTRIBUTE_MULTIPLIER: i32 = 100;

/// Cardinality reported for a device search result without a query length.
pub const ABSENT_QUERY_LENGTH: i32 = -1;

/// Grid axis selector for [`grid_coordinate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl WorkspaceContainer {
    fn coordinate(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.grid_x,
            Axis::Y => self.grid_y,
        }
    }
}

/// Package name of the payload.  Slices and empty payloads have none.
pub fn package_name(record: &Record) -> Option<&str> {
    match &record.payload {
        ItemPayload::Application(app) => Some(&app.package_name),
        ItemPayload::Shortcut(shortcut) => Some(&shortcut.shortcut_name),
        ItemPayload::Widget(widget) => Some(&widget.package_name),
        ItemPayload::Task(task) => Some(&task.package_name),
        ItemPayload::SearchActionItem(action) => Some(&action.package_name),
        ItemPayload::Slice(_) | ItemPayload::None => None,
    }
}

/// Component name of the payload.  Search actions report their title and
/// slices their uri.
pub fn component_name(record: &Record) -> Option<&str> {
    match &record.payload {
        ItemPayload::Application(app) => Some(&app.component_name),
        ItemPayload::Shortcut(shortcut) => Some(&shortcut.shortcut_name),
        ItemPayload::Widget(widget) => Some(&widget.component_name),
        ItemPayload::Task(task) => Some(&task.component_name),
        ItemPayload::SearchActionItem(action) => Some(&action.title),
        ItemPayload::Slice(slice) => Some(&slice.uri),
        ItemPayload::None => None,
    }
}

/// Grid coordinate on `axis`.
///
/// Inside a folder, `want_parent` selects the folder's own workspace cell
/// instead of the item's cell within the folder.  Every other placement
/// reports its workspace cell (0 when it has none) regardless of
/// `want_parent`.
pub fn grid_coordinate(record: &Record, axis: Axis, want_parent: bool) -> i32 {
    match &record.container {
        ContainerPlacement::Folder(folder) if want_parent => {
            folder_parent_workspace(&folder.parent).coordinate(axis)
        }
        ContainerPlacement::Folder(folder) => match axis {
            Axis::X => folder.grid_x,
            Axis::Y => folder.grid_y,
        },
        other => other.workspace().coordinate(axis),
    }
}

/// Page the item is on.  A task's index wins over any placement.
pub fn page_id(record: &Record) -> i32 {
    if let ItemPayload::Task(task) = &record.payload {
        return task.index;
    }
    match &record.container {
        ContainerPlacement::Folder(folder) => folder.page_index,
        ContainerPlacement::Hotseat(hotseat) => hotseat.index,
        ContainerPlacement::PredictedHotseat(predicted) => predicted.index,
        other => other.workspace().page_index,
    }
}

/// Page of the container that holds the item's container.
pub fn parent_page_id(record: &Record) -> i32 {
    match &record.container {
        ContainerPlacement::Folder(folder) => match &folder.parent {
            FolderParent::Hotseat(hotseat) => hotseat.index,
            parent => folder_parent_workspace(parent).page_index,
        },
        ContainerPlacement::SearchResult(search) => match &search.parent {
            SearchResultParent::Workspace(ws) => ws.page_index,
            _ => WorkspaceContainer::default().page_index,
        },
        other => other.workspace().page_index,
    }
}

/// Banded placement code.
///
/// Nested kinds report the code of their inner kind plus a band offset so
/// that the ranges `[0, 99]`, `[100, 199]`, `[200, 299]` and `[300, 399]`
/// never overlap.
pub fn hierarchy(record: &Record) -> i32 {
    match &record.container {
        ContainerPlacement::Folder(folder) => folder.parent.code() + FOLDER_HIERARCHY_OFFSET,
        ContainerPlacement::SearchResult(search) => {
            search.parent.code() + SEARCH_RESULT_HIERARCHY_OFFSET
        }
        ContainerPlacement::Extended(extended) => {
            extended.code() + EXTENDED_CONTAINERS_HIERARCHY_OFFSET
        }
        other => other.code(),
    }
}

/// Count associated with the placement.
///
/// Folders do not report their own item count here; like every placement
/// without a dedicated rule they fall back to the folder-icon cardinality.
pub fn cardinality(record: &Record) -> i32 {
    match &record.container {
        ContainerPlacement::PredictedHotseat(predicted) => predicted.cardinality,
        ContainerPlacement::SearchResult(search) => search.query_length,
        ContainerPlacement::Extended(ExtendedContainer::DeviceSearchResult(device)) => {
            device.query_length.unwrap_or(ABSENT_QUERY_LENGTH)
        }
        _ => record.folder_icon.as_ref().map_or(0, |icon| icon.cardinality),
    }
}

/// Widget feature bitmask, 0 for anything that is not a widget.
pub fn features(record: &Record) -> i32 {
    match &record.payload {
        ItemPayload::Widget(widget) => widget.widget_features,
        _ => 0,
    }
}

/// Composite key of attribute and item kind.
pub fn target_id(record: &Record) -> i32 {
    record.attribute.number() * ATTRIBUTE_MULTIPLIER + record.item_code()
}

fn folder_parent_workspace(parent: &FolderParent) -> WorkspaceContainer {
    match parent {
        FolderParent::Workspace(ws) => *ws,
        _ => WorkspaceContainer::default(),
    }
}

/// All normalized fields of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFields {
    pub package_name: Option<String>,
    pub component_name: Option<String>,
    pub grid_x: i32,
    pub grid_y: i32,
    pub page_id: i32,
    pub grid_x_parent: i32,
    pub grid_y_parent: i32,
    pub page_id_parent: i32,
    pub hierarchy: i32,
    pub cardinality: i32,
    pub features: i32,
}

impl NormalizedFields {
    pub fn from_record(record: &Record) -> Self {
        Self {
            package_name: package_name(record).map(str::to_owned),
            component_name: component_name(record).map(str::to_owned),
            grid_x: grid_coordinate(record, Axis::X, false),
            grid_y: grid_coordinate(record, Axis::Y, false),
            page_id: page_id(record),
            grid_x_parent: grid_coordinate(record, Axis::X, true),
            grid_y_parent: grid_coordinate(record, Axis::Y, true),
            page_id_parent: parent_page_id(record),
            hierarchy: hierarchy(record),
            cardinality: cardinality(record),
            features: features(record),
        }
    }
}
