//! Interleavings of tab creation with workspace creation

use std::time::Duration;

use futures::future::join_all;

use super::common::fixtures::{tabs, Harness};
use super::common::invariants::check_window;
use tabspaces::{CreateWorkspaceParams, HostEvent, TabId, WindowId, WorkspaceEvent};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tab_and_window_created_concurrently() {
    for round in 0..50i64 {
        let h = Harness::new();
        let window_id = WindowId(round);
        let tab_id = TabId(1000 + round);
        h.host.open_window(window_id);
        h.host.open_tab(window_id, tab_id);

        let tab_task = {
            let controller = h.controller.clone();
            tokio::spawn(async move {
                controller
                    .handle_event(HostEvent::TabCreated { tab_id, window_id })
                    .await
            })
        };
        let window_task = {
            let controller = h.controller.clone();
            tokio::spawn(async move {
                controller
                    .handle_event(HostEvent::WindowCreated { window_id })
                    .await
            })
        };
        tab_task.await.unwrap().unwrap();
        window_task.await.unwrap().unwrap();

        let workspaces = h.workspaces(round).await;
        assert_eq!(workspaces.len(), 1, "round {round}");
        assert_eq!(workspaces[0].tabs(), &[tab_id], "round {round}");
        assert!(h.controller.pending_tabs(window_id).is_empty(), "round {round}");
        check_window(&h.controller, round).await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_windows_race_independently() {
    let h = Harness::new();

    let tasks = (1..=20i64).flat_map(|w| {
        let tab_id = TabId(w * 100);
        h.host.open_window(WindowId(w));
        h.host.open_tab(WindowId(w), tab_id);
        let for_tab = h.controller.clone();
        let for_window = h.controller.clone();
        [
            tokio::spawn(async move {
                for_tab
                    .handle_event(HostEvent::TabCreated {
                        tab_id,
                        window_id: WindowId(w),
                    })
                    .await
            }),
            tokio::spawn(async move {
                for_window
                    .handle_event(HostEvent::WindowCreated {
                        window_id: WindowId(w),
                    })
                    .await
            }),
        ]
    });
    for result in join_all(tasks.collect::<Vec<_>>()).await {
        result.unwrap().unwrap();
    }

    for w in 1..=20i64 {
        let workspaces = h.workspaces(w).await;
        assert_eq!(workspaces.len(), 1);
        assert_eq!(workspaces[0].tabs(), tabs(&[w * 100]).as_slice());
        check_window(&h.controller, w).await.unwrap();
    }
}

#[tokio::test]
async fn test_queued_tabs_adopted_on_create_with_notification() {
    let h = Harness::new();
    let mut events = h.controller.subscribe();

    h.tab_created(1, 1).await;
    h.tab_created(1, 2).await;
    h.tab_created(1, 1).await;
    assert_eq!(h.controller.pending_tabs(WindowId(1)), tabs(&[1, 2]));

    let created = h
        .controller
        .create_workspace(CreateWorkspaceParams {
            name: Some("Late".into()),
            window_id: WindowId(1),
            tabs: tabs(&[3]),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(created.tabs(), tabs(&[3, 1, 2]).as_slice());
    assert!(h.controller.pending_tabs(WindowId(1)).is_empty());

    let first = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(first, WorkspaceEvent::Created { .. }));
    let second = tokio::time::timeout(Duration::from_secs(1), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        second,
        WorkspaceEvent::TabsAdopted {
            workspace_id: created.id(),
            window_id: WindowId(1),
            tab_ids: tabs(&[1, 2]),
        }
    );
}

#[tokio::test]
async fn test_queued_tab_closed_before_adoption_is_dropped() {
    let h = Harness::new();

    h.tab_created(1, 1).await;
    h.tab_created(1, 2).await;
    h.tab_removed(1, 1).await;
    h.window_created(1).await;

    assert_eq!(h.workspaces(1).await[0].tabs(), tabs(&[2]).as_slice());
}
