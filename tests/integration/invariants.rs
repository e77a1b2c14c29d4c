//! Randomized operation sequences against the per-window invariants

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use super::common::fixtures::Harness;
use super::common::invariants::check_window;
use tabspaces::{CreateWorkspaceParams, TabId, WindowId};

const WINDOW: i64 = 1;

#[derive(Debug, Clone)]
enum Op {
    Create,
    OpenTab,
    CloseTab(usize),
    Activate(usize),
    MoveTab(usize, usize),
    DestroyInactive(usize),
    HideInactive,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Create),
        4 => Just(Op::OpenTab),
        3 => any::<usize>().prop_map(Op::CloseTab),
        2 => any::<usize>().prop_map(Op::Activate),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(tab, to)| Op::MoveTab(tab, to)),
        1 => any::<usize>().prop_map(Op::DestroyInactive),
        1 => Just(Op::HideInactive),
    ]
}

async fn apply(h: &Harness, op: &Op, next_tab: &mut i64) {
    let workspaces = h.workspaces(WINDOW).await;
    let open_tabs: Vec<TabId> = workspaces
        .iter()
        .flat_map(|ws| ws.tabs().iter().copied())
        .chain(h.controller.pending_tabs(WindowId(WINDOW)))
        .collect();

    match op {
        Op::Create => {
            h.controller
                .create_workspace(CreateWorkspaceParams {
                    window_id: WindowId(WINDOW),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        Op::OpenTab => {
            *next_tab += 1;
            h.tab_created(WINDOW, *next_tab).await;
        }
        Op::CloseTab(pick) => {
            if !open_tabs.is_empty() {
                let tab = open_tabs[pick % open_tabs.len()];
                h.tab_removed(WINDOW, tab.0).await;
            }
        }
        Op::Activate(pick) => {
            if !workspaces.is_empty() {
                let target = &workspaces[pick % workspaces.len()];
                h.controller
                    .activate_workspace(target.id(), WindowId(WINDOW), None)
                    .await
                    .unwrap();
            }
        }
        Op::MoveTab(tab_pick, to_pick) => {
            // Moves start from the tab's owner, the way the tab menu offers them.
            let owned: Vec<(TabId, usize)> = workspaces
                .iter()
                .enumerate()
                .flat_map(|(i, ws)| ws.tabs().iter().map(move |tab| (*tab, i)))
                .collect();
            if owned.is_empty() || workspaces.len() < 2 {
                return;
            }
            let (tab, from) = owned[tab_pick % owned.len()];
            let mut to = to_pick % workspaces.len();
            if to == from {
                to = (to + 1) % workspaces.len();
            }
            h.controller
                .move_tab(tab, workspaces[from].id(), workspaces[to].id())
                .await
                .unwrap();
        }
        Op::DestroyInactive(pick) => {
            let inactive: Vec<_> = workspaces.iter().filter(|ws| !ws.is_active()).collect();
            if !inactive.is_empty() {
                let target = inactive[pick % inactive.len()];
                h.controller.destroy_workspace(target.id()).await.unwrap();
            }
        }
        Op::HideInactive => {
            h.controller
                .hide_inactive_wsp_tabs(WindowId(WINDOW))
                .await
                .unwrap();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_single_active_and_unique_tabs(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let h = Harness::new();
            let mut next_tab = 0;
            for op in &ops {
                apply(&h, op, &mut next_tab).await;
                check_window(&h.controller, WINDOW)
                    .await
                    .map_err(|v| TestCaseError::fail(format!("{v:?} after {op:?}")))?;
            }

            // Every tracked tab still exists in the host.
            if let Some(active) = h.active(WINDOW).await {
                for tab in active.tabs() {
                    prop_assert!(h.host.is_open(*tab));
                }
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
