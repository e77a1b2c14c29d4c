//! End-to-end workspace scenarios driven through the controller

use super::common::fixtures::{tabs, Harness};
use super::common::invariants::check_window;
use tabspaces::{HostCommand, TabId, WindowId, WindowState, WorkspaceError, WorkspaceId};

#[tokio::test]
async fn test_removing_one_tab_keeps_workspace() {
    let h = Harness::new();
    let ws = h.workspace(1, "Main", &[1, 2, 3]).await;

    h.tab_removed(1, 2).await;

    let reloaded = h.reload(&ws).await.unwrap();
    assert_eq!(reloaded.tabs(), tabs(&[1, 3]).as_slice());
    assert!(reloaded.is_active());
    check_window(&h.controller, 1).await.unwrap();
}

#[tokio::test]
async fn test_removing_last_tab_activates_next_workspace() {
    let h = Harness::new();
    let b = h.workspace(1, "B", &[6]).await;
    let a = h.workspace(1, "A", &[5]).await;
    assert!(a.is_active());
    h.host.take_commands();

    h.tab_removed(1, 5).await;

    assert!(h.reload(&a).await.is_none());
    let ids = h
        .controller
        .directory()
        .ids_for_window(WindowId(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(ids, vec![b.id()]);

    let b = h.reload(&b).await.unwrap();
    assert!(b.is_active());
    assert_eq!(h.host.focused_tab(WindowId(1)), Some(TabId(6)));
    assert!(!h.host.is_hidden(TabId(6)));
    check_window(&h.controller, 1).await.unwrap();
}

#[tokio::test]
async fn test_tab_created_before_first_workspace_is_adopted_once() {
    let h = Harness::new();

    h.tab_created(1, 4).await;
    assert_eq!(h.controller.pending_tabs(WindowId(1)), tabs(&[4]));
    assert_eq!(h.controller.num_workspaces(WindowId(1)).await.unwrap(), 0);

    h.window_created(1).await;

    let workspaces = h.workspaces(1).await;
    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0].tabs(), tabs(&[4]).as_slice());
    assert!(h.controller.pending_tabs(WindowId(1)).is_empty());

    // Redelivery finds the tab already tracked.
    h.tab_created(1, 4).await;
    assert_eq!(h.workspaces(1).await[0].tabs(), tabs(&[4]).as_slice());
}

#[tokio::test]
async fn test_move_tab_destroys_emptied_source() {
    let h = Harness::new();
    let b = h.workspace(1, "B", &[9]).await;
    let a = h.workspace(1, "A", &[7]).await;

    h.controller.move_tab(TabId(7), a.id(), b.id()).await.unwrap();

    assert!(h.reload(&a).await.is_none());
    let b = h.reload(&b).await.unwrap();
    assert_eq!(b.tabs(), tabs(&[7, 9]).as_slice());
    assert!(b.is_active());
    assert_eq!(h.host.focused_tab(WindowId(1)), Some(TabId(7)));
    // The moved tab stays open; only emptied workspaces close tabs.
    assert!(h.host.is_open(TabId(7)));
    check_window(&h.controller, 1).await.unwrap();
}

#[tokio::test]
async fn test_move_tab_keeps_non_empty_source() {
    let h = Harness::new();
    let b = h.workspace(1, "B", &[9]).await;
    let a = h.workspace(1, "A", &[7, 8]).await;

    h.controller.move_tab(TabId(7), a.id(), b.id()).await.unwrap();

    let a = h.reload(&a).await.unwrap();
    assert_eq!(a.tabs(), tabs(&[8]).as_slice());
    assert!(!a.is_active());
    assert!(h.host.is_hidden(TabId(8)));
    assert!(h.reload(&b).await.unwrap().is_active());
    check_window(&h.controller, 1).await.unwrap();
}

#[tokio::test]
async fn test_move_tab_rejects_same_workspace() {
    let h = Harness::new();
    let a = h.workspace(1, "A", &[1]).await;

    let err = h
        .controller
        .move_tab(TabId(1), a.id(), a.id())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::InvalidInput(_)));
}

#[tokio::test]
async fn test_move_tab_requires_source_to_own_it() {
    let h = Harness::new();
    let a = h.workspace(1, "A", &[7]).await;
    let b = h.workspace(1, "B", &[9]).await;
    let c = h.workspace(1, "C", &[5]).await;

    let err = h
        .controller
        .move_tab(TabId(5), a.id(), b.id())
        .await
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::InvalidInput(_)));

    assert_eq!(h.reload(&a).await.unwrap().tabs(), tabs(&[7]).as_slice());
    assert_eq!(h.reload(&b).await.unwrap().tabs(), tabs(&[9]).as_slice());
    let c = h.reload(&c).await.unwrap();
    assert_eq!(c.tabs(), tabs(&[5]).as_slice());
    assert!(c.is_active());
    check_window(&h.controller, 1).await.unwrap();
}

#[tokio::test]
async fn test_rename_changes_only_name() {
    let h = Harness::new();
    let ws = h.workspace(1, "Before", &[1, 2]).await;

    h.controller.rename_workspace(ws.id(), "X").await.unwrap();

    let reloaded = h.reload(&ws).await.unwrap();
    assert_eq!(reloaded.name(), "X");
    assert_eq!(reloaded.tabs(), ws.tabs());
    assert_eq!(reloaded.window_id(), ws.window_id());
    assert_eq!(reloaded.is_active(), ws.is_active());
}

#[tokio::test]
async fn test_rename_missing_workspace_is_not_found() {
    let h = Harness::new();

    let err = h
        .controller
        .rename_workspace(WorkspaceId(123), "X")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkspaceError::NotFound(WorkspaceId(123))));
    assert!(h.kv.is_empty());
}

#[tokio::test]
async fn test_add_to_window_twice_keeps_one_entry() {
    let h = Harness::new();
    let ws = h.workspace(1, "A", &[]).await;
    let directory = h.controller.directory();

    assert!(!directory.add_to_window(ws.id(), WindowId(1)).await.unwrap());

    let ids = directory.ids_for_window(WindowId(1)).await.unwrap().unwrap();
    assert_eq!(ids, vec![ws.id()]);
}

#[tokio::test]
async fn test_activate_switches_visible_tabs() {
    let h = Harness::new();
    let a = h.workspace(1, "A", &[1, 2]).await;
    let b = h.workspace(1, "B", &[3]).await;
    h.controller
        .hide_inactive_wsp_tabs(WindowId(1))
        .await
        .unwrap();
    assert!(h.host.is_hidden(TabId(1)));
    assert!(h.host.is_hidden(TabId(2)));

    h.controller
        .activate_workspace(a.id(), WindowId(1), Some(TabId(2)))
        .await
        .unwrap();

    assert_eq!(h.host.visible_tabs(WindowId(1)), tabs(&[1, 2]));
    assert_eq!(h.host.focused_tab(WindowId(1)), Some(TabId(2)));
    assert!(!h.reload(&b).await.unwrap().is_active());
    check_window(&h.controller, 1).await.unwrap();
}

#[tokio::test]
async fn test_activate_rejects_foreign_window() {
    let h = Harness::new();
    let a = h.workspace(1, "A", &[1]).await;

    let err = h
        .controller
        .activate_workspace(a.id(), WindowId(2), None)
        .await
        .unwrap_err();

    assert!(matches!(err, WorkspaceError::InvalidInput(_)));
    assert!(h.reload(&a).await.unwrap().is_active());
}

#[tokio::test]
async fn test_explicit_destroy_leaves_window_unsettled() {
    let h = Harness::new();
    let a = h.workspace(1, "A", &[1]).await;
    let b = h.workspace(1, "B", &[2]).await;

    h.controller.destroy_workspace(b.id()).await.unwrap();

    assert!(!h.host.is_open(TabId(2)));
    assert!(h
        .host
        .commands()
        .contains(&HostCommand::CloseTabs { tab_ids: tabs(&[2]) }));
    assert!(matches!(
        h.controller.window_state(WindowId(1)).await.unwrap(),
        WindowState::Unsettled { workspaces: 1 }
    ));

    // The UI settles the window by activating a survivor.
    h.controller
        .activate_workspace(a.id(), WindowId(1), None)
        .await
        .unwrap();
    check_window(&h.controller, 1).await.unwrap();
}

#[tokio::test]
async fn test_create_with_existing_id_is_rejected() {
    let h = Harness::new();
    let a = h.workspace(1, "A", &[1]).await;

    let err = h
        .controller
        .create_workspace(tabspaces::CreateWorkspaceParams {
            id: Some(a.id()),
            window_id: WindowId(1),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WorkspaceError::InvalidInput(_)));
    assert_eq!(h.reload(&a).await.unwrap().name(), "A");
}

#[tokio::test]
async fn test_tab_menu_lists_workspaces_by_name() {
    let h = Harness::new();
    h.workspace(1, "zeta", &[1]).await;
    let alpha = h.workspace(1, "Alpha", &[2, 3]).await;

    let menu = h.menu(1).await;

    assert!(menu.enabled);
    assert_eq!(menu.current_workspace_id, Some(alpha.id()));
    let titles: Vec<&str> = menu.entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha (2 tabs)", "zeta (1 tabs)"]);
    assert!(!menu.entries[0].enabled);
    assert!(menu.entries[1].enabled);
}
