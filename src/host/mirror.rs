//! In-memory model of the host's windows and tabs
//!
//! `HostMirror` tracks what the host has told us (windows, tab order, focus)
//! and applies every command the engine issues to that model. The stdio
//! bridge uses it to answer host queries locally and to forward commands;
//! tests use it as the host fake.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{HostApi, HostCommand, HostError};
use crate::data::{TabId, WindowId};

#[derive(Debug, Default)]
struct MirrorState {
    windows: BTreeMap<WindowId, Vec<TabId>>,
    hidden: HashSet<TabId>,
    focused: HashMap<WindowId, TabId>,
    current: Option<WindowId>,
    log: Vec<HostCommand>,
    fail_next: Option<HostError>,
}

impl MirrorState {
    fn window_of(&self, tab_id: TabId) -> Option<WindowId> {
        self.windows
            .iter()
            .find(|(_, tabs)| tabs.contains(&tab_id))
            .map(|(window_id, _)| *window_id)
    }

    fn check_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError> {
        match tab_ids.iter().find(|tab| self.window_of(**tab).is_none()) {
            Some(missing) => Err(HostError::TabNotFound(*missing)),
            None => Ok(()),
        }
    }

    fn remove_tab(&mut self, tab_id: TabId) {
        for tabs in self.windows.values_mut() {
            tabs.retain(|t| *t != tab_id);
        }
        self.hidden.remove(&tab_id);
        self.focused.retain(|_, focused| *focused != tab_id);
    }
}

/// Host model that records issued commands, or forwards them when given a channel
#[derive(Clone, Default)]
pub struct HostMirror {
    state: Arc<Mutex<MirrorState>>,
    forward: Option<mpsc::UnboundedSender<HostCommand>>,
}

impl HostMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every applied command to `tx` instead of recording it
    pub fn with_forwarding(mut self, tx: mpsc::UnboundedSender<HostCommand>) -> Self {
        self.forward = Some(tx);
        self
    }

    /// Track a newly opened window; the first window becomes current
    pub fn open_window(&self, window_id: WindowId) {
        let mut state = self.state.lock();
        state.windows.entry(window_id).or_default();
        if state.current.is_none() {
            state.current = Some(window_id);
        }
    }

    /// Forget a window and all of its tabs
    pub fn close_window(&self, window_id: WindowId) {
        let mut state = self.state.lock();
        if let Some(tabs) = state.windows.remove(&window_id) {
            for tab in tabs {
                state.hidden.remove(&tab);
            }
        }
        state.focused.remove(&window_id);
        if state.current == Some(window_id) {
            state.current = state.windows.keys().next().copied();
        }
    }

    /// Track a newly opened tab at the end of its window's tab strip
    pub fn open_tab(&self, window_id: WindowId, tab_id: TabId) {
        let mut state = self.state.lock();
        if state.current.is_none() {
            state.current = Some(window_id);
        }
        let tabs = state.windows.entry(window_id).or_default();
        if !tabs.contains(&tab_id) {
            tabs.push(tab_id);
        }
    }

    /// Forget a tab the host reported as closed
    pub fn forget_tab(&self, tab_id: TabId) {
        self.state.lock().remove_tab(tab_id);
    }

    /// Mark a window as the one the user is in
    pub fn focus_window(&self, window_id: WindowId) {
        let mut state = self.state.lock();
        state.windows.entry(window_id).or_default();
        state.current = Some(window_id);
    }

    /// Replace a window's tab list wholesale (initial sync from the host)
    pub fn sync_window(&self, window_id: WindowId, tab_ids: Vec<TabId>) {
        let mut state = self.state.lock();
        if state.current.is_none() {
            state.current = Some(window_id);
        }
        state.windows.insert(window_id, tab_ids);
    }

    /// Make the next issued command fail with `error`
    pub fn fail_next(&self, error: HostError) {
        self.state.lock().fail_next = Some(error);
    }

    pub fn tabs(&self, window_id: WindowId) -> Vec<TabId> {
        self.state
            .lock()
            .windows
            .get(&window_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Tabs of a window that are not hidden
    pub fn visible_tabs(&self, window_id: WindowId) -> Vec<TabId> {
        let state = self.state.lock();
        state
            .windows
            .get(&window_id)
            .map(|tabs| {
                tabs.iter()
                    .filter(|tab| !state.hidden.contains(tab))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_hidden(&self, tab_id: TabId) -> bool {
        self.state.lock().hidden.contains(&tab_id)
    }

    pub fn is_open(&self, tab_id: TabId) -> bool {
        self.state.lock().window_of(tab_id).is_some()
    }

    pub fn focused_tab(&self, window_id: WindowId) -> Option<TabId> {
        self.state.lock().focused.get(&window_id).copied()
    }

    /// Every command applied so far, oldest first
    pub fn commands(&self) -> Vec<HostCommand> {
        self.state.lock().log.clone()
    }

    /// Drain the command log
    pub fn take_commands(&self) -> Vec<HostCommand> {
        std::mem::take(&mut self.state.lock().log)
    }

    fn apply<F>(&self, command: HostCommand, tab_ids: &[TabId], mutate: F) -> Result<(), HostError>
    where
        F: FnOnce(&mut MirrorState),
    {
        {
            let mut state = self.state.lock();
            if let Some(error) = state.fail_next.take() {
                return Err(error);
            }
            state.check_tabs(tab_ids)?;
            mutate(&mut state);
            if self.forward.is_none() {
                state.log.push(command);
                return Ok(());
            }
        }

        // Forwarded commands are not logged; the receiver owns them.
        if let Some(tx) = &self.forward {
            if tx.send(command).is_err() {
                tracing::debug!("Host command receiver dropped");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for HostMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("HostMirror")
            .field("windows", &state.windows)
            .field("current", &state.current)
            .finish()
    }
}

#[async_trait]
impl HostApi for HostMirror {
    async fn current_window(&self) -> Result<WindowId, HostError> {
        tokio::task::yield_now().await;
        self.state.lock().current.ok_or(HostError::NoCurrentWindow)
    }

    async fn query_tabs(&self, window_id: WindowId) -> Result<Vec<TabId>, HostError> {
        tokio::task::yield_now().await;
        self.state
            .lock()
            .windows
            .get(&window_id)
            .cloned()
            .ok_or(HostError::WindowNotFound(window_id))
    }

    async fn close_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError> {
        tokio::task::yield_now().await;
        let command = HostCommand::CloseTabs {
            tab_ids: tab_ids.to_vec(),
        };
        self.apply(command, tab_ids, |state| {
            for tab in tab_ids {
                state.remove_tab(*tab);
            }
        })
    }

    async fn hide_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError> {
        tokio::task::yield_now().await;
        let command = HostCommand::HideTabs {
            tab_ids: tab_ids.to_vec(),
        };
        self.apply(command, tab_ids, |state| {
            state.hidden.extend(tab_ids.iter().copied());
        })
    }

    async fn show_tabs(&self, tab_ids: &[TabId]) -> Result<(), HostError> {
        tokio::task::yield_now().await;
        let command = HostCommand::ShowTabs {
            tab_ids: tab_ids.to_vec(),
        };
        self.apply(command, tab_ids, |state| {
            for tab in tab_ids {
                state.hidden.remove(tab);
            }
        })
    }

    async fn focus_tab(&self, tab_id: TabId) -> Result<(), HostError> {
        tokio::task::yield_now().await;
        let command = HostCommand::FocusTab { tab_id };
        self.apply(command, &[tab_id], |state| {
            if let Some(window_id) = state.window_of(tab_id) {
                state.focused.insert(window_id, tab_id);
            }
        })
    }
}
