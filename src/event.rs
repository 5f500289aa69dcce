//! Event identities and launcher UI states.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Event id of the periodic workspace snapshot.
pub const LAUNCHER_WORKSPACE_SNAPSHOT: u32 = 579;

/// Anything that can be logged as a launcher event.
pub trait EventEnum {
    /// Numeric id written to the `event_id` column.
    fn id(&self) -> u32;

    /// Human-readable name for verbose output.  Defaults to the id.
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(self.id().to_string())
    }
}

/// A plain event id with an optional name, as received over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

impl Event {
    pub fn new(id: u32) -> Self {
        Self { id, name: None }
    }

    pub fn named(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

impl EventEnum for Event {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.id.to_string()),
        }
    }
}

/// Identifies one logical interaction across several events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InstanceId(pub i32);

impl InstanceId {
    /// The id used when no instance was supplied.
    pub const DEFAULT: InstanceId = InstanceId(0);

    pub fn is_default(self) -> bool {
        self == Self::DEFAULT
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Launcher UI state code as written to the `src_state` / `dst_state`
/// columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LauncherState(pub i32);

impl LauncherState {
    pub const UNSPECIFIED: LauncherState = LauncherState(0);
    pub const BACKGROUND: LauncherState = LauncherState(1);
    pub const HOME: LauncherState = LauncherState(2);
    pub const OVERVIEW: LauncherState = LauncherState(3);
    pub const ALLAPPS: LauncherState = LauncherState(4);
}

impl fmt::Display for LauncherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            LauncherState::BACKGROUND => "BACKGROUND",
            LauncherState::HOME => "HOME",
            LauncherState::OVERVIEW => "OVERVIEW",
            LauncherState::ALLAPPS => "ALLAPPS",
            _ => "INVALID",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_display() {
        assert_eq!(LauncherState::BACKGROUND.to_string(), "BACKGROUND");
        assert_eq!(LauncherState::HOME.to_string(), "HOME");
        assert_eq!(LauncherState::OVERVIEW.to_string(), "OVERVIEW");
        assert_eq!(LauncherState::ALLAPPS.to_string(), "ALLAPPS");
        assert_eq!(LauncherState::UNSPECIFIED.to_string(), "INVALID");
        assert_eq!(LauncherState(42).to_string(), "INVALID");
    }

    #[test]
    fn event_name_falls_back_to_id() {
        assert_eq!(Event::new(338).name(), "338");
        assert_eq!(Event::named(338, "APP_LAUNCH_TAP").name(), "APP_LAUNCH_TAP");
    }

    #[test]
    fn event_without_name_deserializes() {
        let ev: Event = serde_json::from_str(r#"{"id": 12}"#).unwrap();
        assert_eq!(ev, Event::new(12));
    }
}
