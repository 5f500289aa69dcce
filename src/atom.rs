//! Launcher atom vocabulary.
//!
//! This module defines the structured records that every other component
//! shares: an [`ItemPayload`] (what was interacted with), a
//! [`ContainerPlacement`] (where it sits in the launcher UI) and the
//! [`Record`] that bundles them with the per-event extras.
//!
//! The numeric codes returned by the various `code()` / `number()` methods
//! are the field numbers of the launcher atom schema.  Downstream decoders
//! depend on them, so they must never be renumbered.
//!
//! All types derive `serde` so records can travel as JSON, e.g.
//!
//! ```json
//! {
//!   "payload": {"Application": {"package_name": "com.foo", "component_name": "com.foo/.Main"}},
//!   "container": {"Workspace": {"page_index": 1, "grid_x": 2, "grid_y": 3}},
//!   "attribute": "AllAppsAtoZ"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page index a workspace container reports when none was set.
pub const DEFAULT_PAGE_INDEX: i32 = -2;

/// Item code of the folder-icon case in the atom schema.
pub const FOLDER_ICON_ITEM_CODE: i32 = 9;

//  Item payloads

/// An installed application.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub package_name: String,
    pub component_name: String,
}

/// A recent task as shown in overview.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    /// Position of the task in the recents list.
    pub index: i32,
    pub package_name: String,
    pub component_name: String,
}

/// A deep shortcut.  The shortcut name doubles as both package and
/// component name in the flat row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcut {
    pub shortcut_name: String,
}

/// An app widget.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Widget {
    pub span_x: i32,
    pub span_y: i32,
    pub app_widget_id: i32,
    pub package_name: String,
    pub component_name: String,
    /// Bitmask of widget features (reconfigurable, preview layout, …).
    pub widget_features: i32,
}

/// A slice, identified only by its uri.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Slice {
    pub uri: String,
}

/// An action surfaced by on-device search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchActionItem {
    pub package_name: String,
    pub title: String,
}

/// The loggable subject of an event.  Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemPayload {
    #[default]
    None,
    Application(Application),
    Task(Task),
    Shortcut(Shortcut),
    Widget(Widget),
    Slice(Slice),
    SearchActionItem(SearchActionItem),
}

impl ItemPayload {
    /// Schema code of the active variant.
    pub fn code(&self) -> i32 {
        match self {
            ItemPayload::None => 0,
            ItemPayload::Application(_) => 1,
            ItemPayload::Task(_) => 2,
            ItemPayload::Shortcut(_) => 3,
            ItemPayload::Widget(_) => 4,
            ItemPayload::Slice(_) => 10,
            ItemPayload::SearchActionItem(_) => 11,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ItemPayload::None)
    }
}

//  Folder icon

/// Label state of a folder before a rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FromState {
    #[default]
    Unspecified,
    Empty,
    Custom,
    Suggested,
}

impl FromState {
    pub fn number(self) -> i32 {
        match self {
            FromState::Unspecified => 0,
            FromState::Empty => 1,
            FromState::Custom => 2,
            FromState::Suggested => 3,
        }
    }
}

/// Label state of a folder after a rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToState {
    #[default]
    Unspecified,
    Unchanged,
    Empty,
    Custom,
    Suggested,
}

impl ToState {
    pub fn number(self) -> i32 {
        match self {
            ToState::Unspecified => 0,
            ToState::Unchanged => 1,
            ToState::Empty => 2,
            ToState::Custom => 3,
            ToState::Suggested => 4,
        }
    }
}

/// Folder-icon transition details attached to label edits.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderIcon {
    /// Number of items in the folder.
    pub cardinality: i32,
    pub from_label_state: FromState,
    pub to_label_state: ToState,
    /// The label text as edited by the user.
    pub label_info: String,
}

//  Containers

/// A cell on a workspace page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceContainer {
    pub page_index: i32,
    pub grid_x: i32,
    pub grid_y: i32,
}

impl Default for WorkspaceContainer {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_INDEX,
            grid_x: 0,
            grid_y: 0,
        }
    }
}

/// A slot in the hotseat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HotseatContainer {
    pub index: i32,
}

/// A slot in the predicted part of the hotseat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictedHotseatContainer {
    pub index: i32,
    /// Number of predicted items currently shown.
    pub cardinality: i32,
}

/// Where a folder itself lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FolderParent {
    #[default]
    None,
    Workspace(WorkspaceContainer),
    Hotseat(HotseatContainer),
}

impl FolderParent {
    pub fn code(&self) -> i32 {
        match self {
            FolderParent::None => 0,
            FolderParent::Workspace(_) => 4,
            FolderParent::Hotseat(_) => 5,
        }
    }
}

/// A cell inside a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderContainer {
    pub page_index: i32,
    pub grid_x: i32,
    pub grid_y: i32,
    pub parent: FolderParent,
    /// Live item count of the folder.
    pub cardinality: i32,
}

impl Default for FolderContainer {
    fn default() -> Self {
        Self {
            page_index: DEFAULT_PAGE_INDEX,
            grid_x: 0,
            grid_y: 0,
            parent: FolderParent::None,
            cardinality: 0,
        }
    }
}

/// Where a search result list was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchResultParent {
    #[default]
    None,
    Workspace(WorkspaceContainer),
    AllApps,
}

impl SearchResultParent {
    pub fn code(&self) -> i32 {
        match self {
            SearchResultParent::None => 0,
            SearchResultParent::Workspace(_) => 2,
            SearchResultParent::AllApps => 3,
        }
    }
}

/// A row in the search result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResultContainer {
    pub query_length: i32,
    pub parent: SearchResultParent,
}

/// A result from on-device search.  The query length is optional: an
/// absent length is reported as `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSearchResultContainer {
    pub query_length: Option<i32>,
}

/// Containers defined by the launcher extension schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtendedContainer {
    #[default]
    None,
    DeviceSearchResult(DeviceSearchResultContainer),
}

impl ExtendedContainer {
    pub fn code(&self) -> i32 {
        match self {
            ExtendedContainer::None => 0,
            ExtendedContainer::DeviceSearchResult(_) => 1,
        }
    }
}

/// Where the payload sits in the launcher UI.  Exactly one variant is
/// active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ContainerPlacement {
    #[default]
    None,
    Workspace(WorkspaceContainer),
    Hotseat(HotseatContainer),
    Folder(FolderContainer),
    AllApps,
    Widgets,
    PredictedHotseat(PredictedHotseatContainer),
    SearchResult(SearchResultContainer),
    Shortcuts,
    Settings,
    Prediction,
    TaskSwitcher,
    Extended(ExtendedContainer),
}

impl ContainerPlacement {
    /// Schema code of the active variant.
    pub fn code(&self) -> i32 {
        match self {
            ContainerPlacement::None => 0,
            ContainerPlacement::Workspace(_) => 1,
            ContainerPlacement::Hotseat(_) => 2,
            ContainerPlacement::Folder(_) => 3,
            ContainerPlacement::AllApps => 4,
            ContainerPlacement::Widgets => 5,
            ContainerPlacement::PredictedHotseat(_) => 6,
            ContainerPlacement::SearchResult(_) => 7,
            ContainerPlacement::Shortcuts => 8,
            ContainerPlacement::Settings => 9,
            ContainerPlacement::Prediction => 10,
            ContainerPlacement::TaskSwitcher => 11,
            ContainerPlacement::Extended(_) => 20,
        }
    }

    /// The workspace cell of this placement, or the schema default when the
    /// placement is not a workspace.
    pub fn workspace(&self) -> WorkspaceContainer {
        match self {
            ContainerPlacement::Workspace(ws) => *ws,
            _ => WorkspaceContainer::default(),
        }
    }
}

//  Attribute

/// Why an item is where it is (how it was added, how its label was set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Attribute {
    #[default]
    Unknown,
    DefaultLayout,
    BackupRestore,
    PinItem,
    AllAppsAtoZ,
    Widgets,
    AddToHomescreen,
    AllAppsPrediction,
    HotseatPrediction,
    SuggestedLabel,
    ManualLabel,
    Unlabeled,
    EmptyLabel,
}

impl Attribute {
    pub fn number(self) -> i32 {
        match self {
            Attribute::Unknown => 0,
            Attribute::DefaultLayout => 1,
            Attribute::BackupRestore => 2,
            Attribute::PinItem => 3,
            Attribute::AllAppsAtoZ => 4,
            Attribute::Widgets => 5,
            Attribute::AddToHomescreen => 6,
            Attribute::AllAppsPrediction => 7,
            Attribute::HotseatPrediction => 8,
            Attribute::SuggestedLabel => 9,
            Attribute::ManualLabel => 10,
            Attribute::Unlabeled => 11,
            Attribute::EmptyLabel => 12,
        }
    }
}

//  Record

/// The unit of normalization: one payload in one placement plus the
/// per-event extras.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub payload: ItemPayload,
    pub container: ContainerPlacement,
    /// Whether the item belongs to the work profile.
    pub is_work: bool,
    pub rank: Option<i32>,
    pub attribute: Attribute,
    pub folder_icon: Option<FolderIcon>,
}

impl Record {
    /// A record with only a payload set.
    pub fn with_payload(payload: ItemPayload) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }

    /// Item code used for the target id.
    ///
    /// A record without a payload that carries folder-icon details is a
    /// folder-icon item.
    pub fn item_code(&self) -> i32 {
        if self.payload.is_none() && self.folder_icon.is_some() {
            FOLDER_ICON_ITEM_CODE
        } else {
            self.payload.code()
        }
    }

    /// The folder-icon sub-record, or its defaults when absent.
    pub fn folder_icon_or_default(&self) -> FolderIcon {
        self.folder_icon.clone().unwrap_or_default()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_codes_match_schema() {
        assert_eq!(ItemPayload::None.code(), 0);
        assert_eq!(ItemPayload::Application(Application::default()).code(), 1);
        assert_eq!(ItemPayload::Task(Task::default()).code(), 2);
        assert_eq!(ItemPayload::Shortcut(Shortcut::default()).code(), 3);
        assert_eq!(ItemPayload::Widget(Widget::default()).code(), 4);
        assert_eq!(ItemPayload::Slice(Slice::default()).code(), 10);
        assert_eq!(
            ItemPayload::SearchActionItem(SearchActionItem::default()).code(),
            11
        );
    }

    #[test]
    fn workspace_default_page_index() {
        assert_eq!(WorkspaceContainer::default().page_index, DEFAULT_PAGE_INDEX);
        assert_eq!(ContainerPlacement::Hotseat(HotseatContainer { index: 3 }).workspace().page_index, -2);
    }

    #[test]
    fn folder_icon_only_record_is_folder_icon_item() {
        let rec = Record {
            folder_icon: Some(FolderIcon::default()),
            ..Record::default()
        };
        assert_eq!(rec.item_code(), FOLDER_ICON_ITEM_CODE);

        let with_app = Record {
            payload: ItemPayload::Application(Application::default()),
            folder_icon: Some(FolderIcon::default()),
            ..Record::default()
        };
        assert_eq!(with_app.item_code(), 1);
    }

    #[test]
    fn deserialize_record_from_json() {
        let json = r#"{
            "payload": {"Task": {"index": 5, "package_name": "com.foo", "component_name": "com.foo/.Bar"}},
            "container": {"Workspace": {"page_index": 1, "grid_x": 2, "grid_y": 3}},
            "is_work": true,
            "attribute": "AllAppsAtoZ"
        }"#;
        let rec: Record = serde_json::from_str(json).unwrap();
        assert_eq!(
            rec.payload,
            ItemPayload::Task(Task {
                index: 5,
                package_name: "com.foo".into(),
                component_name: "com.foo/.Bar".into(),
            })
        );
        assert_eq!(rec.container.workspace().grid_y, 3);
        assert!(rec.is_work);
        assert_eq!(rec.attribute.number(), 4);
        assert_eq!(rec.rank, None);
    }

    #[test]
    fn empty_json_is_default_record() {
        let rec: Record = serde_json::from_str("{}").unwrap();
        assert_eq!(rec, Record::default());
    }

    #[test]
    fn partial_workspace_keeps_default_page() {
        let json = r#"{"container": {"Workspace": {"grid_x": 4}}}"#;
        let rec: Record = serde_json::from_str(json).unwrap();
        let ws = rec.container.workspace();
        assert_eq!(ws.grid_x, 4);
        assert_eq!(ws.page_index, DEFAULT_PAGE_INDEX);
    }
}
