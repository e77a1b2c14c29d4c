//! Identifiers and persisted records

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Host-assigned window identifier
    WindowId(i64)
);

id_type!(
    /// Host-assigned tab identifier
    TabId(i64)
);

id_type!(
    /// Time-derived workspace identifier (milliseconds since the epoch)
    WorkspaceId(u64)
);

/// Full persisted state of one workspace.
///
/// Always written as a whole; there are no partial-field updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceRecord {
    pub id: WorkspaceId,
    pub name: String,
    pub active: bool,
    #[serde(default)]
    pub tabs: Vec<TabId>,
    pub window_id: WindowId,
}
