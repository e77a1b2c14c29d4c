//! Command surface used by the UI
//!
//! Requests arrive as JSON objects tagged by `action`; [`dispatch`] routes them
//! to the [`SyncController`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::{TabId, WindowId, WorkspaceId, WorkspaceRecord};
use crate::sync::{CreateWorkspaceParams, SyncController, TabMenu};
use crate::workspace::{Workspace, WorkspaceError};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    GetWorkspaces {
        window_id: WindowId,
    },
    CreateWorkspace(CreateWorkspaceParams),
    RenameWorkspace {
        wsp_id: WorkspaceId,
        wsp_name: String,
    },
    GetNumWorkspaces {
        window_id: WindowId,
    },
    IsFirstTimeCreateWsp {
        window_id: WindowId,
    },
    SetFirstTimeCreateWspToFalse {
        window_id: WindowId,
    },
    HideInactiveWspTabs {
        window_id: WindowId,
    },
    DestroyWsp {
        wsp_id: WorkspaceId,
    },
    ActivateWorkspace {
        wsp_id: WorkspaceId,
        window_id: WindowId,
        #[serde(default)]
        focus_tab_id: Option<TabId>,
    },
    GetWorkspaceName,
    MoveTabToWsp {
        tab_id: TabId,
        from_wsp_id: WorkspaceId,
        to_wsp_id: WorkspaceId,
    },
    GetTabMenu {
        window_id: WindowId,
    },
    ReadOption {
        name: String,
    },
    SaveOption {
        name: String,
        value: Value,
    },
}

/// Successful command result, serialized as the bare payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Workspaces(Vec<WorkspaceRecord>),
    Workspace(WorkspaceRecord),
    Count(usize),
    Flag(bool),
    Name(String),
    Menu(TabMenu),
    Option(Option<Value>),
    Done,
}

/// Error payload sent back instead of a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable kind, e.g. `not_found`
    pub error: String,
    pub details: String,
}

impl From<&WorkspaceError> for ErrorBody {
    fn from(err: &WorkspaceError) -> Self {
        Self {
            error: err.kind().to_string(),
            details: err.to_string(),
        }
    }
}

/// Route one request to the controller
pub async fn dispatch(
    controller: &SyncController,
    request: Request,
) -> Result<Response, WorkspaceError> {
    let response = match request {
        Request::GetWorkspaces { window_id } => Response::Workspaces(
            controller
                .get_workspaces(window_id)
                .await?
                .into_iter()
                .map(Workspace::into_record)
                .collect(),
        ),
        Request::CreateWorkspace(params) => {
            Response::Workspace(controller.create_workspace(params).await?.into_record())
        }
        Request::RenameWorkspace { wsp_id, wsp_name } => Response::Workspace(
            controller
                .rename_workspace(wsp_id, wsp_name)
                .await?
                .into_record(),
        ),
        Request::GetNumWorkspaces { window_id } => {
            Response::Count(controller.num_workspaces(window_id).await?)
        }
        Request::IsFirstTimeCreateWsp { window_id } => {
            Response::Flag(controller.is_first_time_create_wsp(window_id).await?)
        }
        Request::SetFirstTimeCreateWspToFalse { window_id } => {
            controller.set_first_time_create_wsp_to_false(window_id).await?;
            Response::Done
        }
        Request::HideInactiveWspTabs { window_id } => {
            controller.hide_inactive_wsp_tabs(window_id).await?;
            Response::Done
        }
        Request::DestroyWsp { wsp_id } => {
            controller.destroy_workspace(wsp_id).await?;
            Response::Done
        }
        Request::ActivateWorkspace {
            wsp_id,
            window_id,
            focus_tab_id,
        } => Response::Workspace(
            controller
                .activate_workspace(wsp_id, window_id, focus_tab_id)
                .await?
                .into_record(),
        ),
        Request::GetWorkspaceName => Response::Name(controller.generate_workspace_name()),
        Request::MoveTabToWsp {
            tab_id,
            from_wsp_id,
            to_wsp_id,
        } => {
            controller.move_tab(tab_id, from_wsp_id, to_wsp_id).await?;
            Response::Done
        }
        Request::GetTabMenu { window_id } => Response::Menu(controller.tab_menu(window_id).await?),
        Request::ReadOption { name } => Response::Option(controller.read_option(&name).await?),
        Request::SaveOption { name, value } => {
            controller.save_option(&name, value).await?;
            Response::Done
        }
    };
    Ok(response)
}
