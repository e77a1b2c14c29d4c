//! Host browser boundary
//!
//! The engine never talks to a browser directly. It issues tab commands and
//! queries through [`HostApi`], which the embedding supplies.

mod mirror;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{TabId, WindowId};

pub use mirror::HostMirror;

/// Errors reported by the host when a tab command cannot be carried out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Tab {0} does not exist")]
    TabNotFound(TabId),
    #[error("Window {0} does not exist")]
    WindowNotFound(WindowId),
    #[error("No window is currently focused")]
    NoCurrentWindow,
    #[error("Host unavailable: {0}")]
    Unavailable(String),
}

/// A tab command issued to the host, in the shape it is forwarded over the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCommand {
    CloseTabs { tab_ids: Vec<TabId> },
    HideTabs { tab_ids: Vec<TabId> },
    ShowTabs { tab_ids: Vec<TabId> },
    FocusTab { tab_id: TabId },
}

/// Trait for host browsers that own the actual windows and tabs
#[async_trait]
pub trait HostApi: Send + Sync {
    /// Window the user is currently in
    async fn current_window(&self) -> Result<WindowId, HostError>;

    /// All tabs of a window, in tab-strip order
    async fn query_tabs(&self, window_id: WindowId) -> Result<Vec<TabId>, HostError>;

    /// Close tabs in bulk
    async fn close_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError>;

    /// Hide tabs in bulk
    async fn hide_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError>;

    /// Show previously hidden tabs in bulk
    async fn show_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError>;

    /// Make one tab the selected tab of its window
    async fn focus_tab(&self, tab_id: TabId) -> Result<(), HostError>;
}
