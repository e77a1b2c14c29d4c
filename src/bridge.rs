//! JSON-lines bridge between the engine and an embedding host process
//!
//! Inbound lines carry host events, UI requests, or a snapshot of the host's
//! windows. Outbound lines carry request responses, tab commands for the host
//! to carry out, and workspace notifications.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinSet;

use crate::api::{self, ErrorBody, Request, Response};
use crate::data::{TabId, WindowId};
use crate::host::{HostCommand, HostMirror};
use crate::sync::{HostEvent, SyncController, WorkspaceEvent};

/// One window as reported in a sync snapshot
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub window_id: WindowId,
    #[serde(default)]
    pub tabs: Vec<TabId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Inbound {
    Event {
        event: HostEvent,
    },
    Request {
        id: u64,
        request: Request,
    },
    Sync {
        windows: Vec<WindowSnapshot>,
        #[serde(default)]
        current_window: Option<WindowId>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Outbound {
    Response {
        id: u64,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<Response>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorBody>,
    },
    Host {
        command: HostCommand,
    },
    Notify {
        event: WorkspaceEvent,
    },
    Invalid {
        details: String,
    },
}

impl Outbound {
    fn from_result(id: u64, result: Result<Response, crate::workspace::WorkspaceError>) -> Self {
        match result {
            Ok(response) => Outbound::Response {
                id,
                ok: true,
                result: Some(response),
                error: None,
            },
            Err(e) => Outbound::Response {
                id,
                ok: false,
                result: None,
                error: Some(ErrorBody::from(&e)),
            },
        }
    }
}

/// Drives a [`SyncController`] from a JSON-lines stream
pub struct Bridge {
    controller: Arc<SyncController>,
    host: HostMirror,
}

impl Bridge {
    /// `host` must be the mirror the controller issues its commands to.
    pub fn new(controller: Arc<SyncController>, host: HostMirror) -> Self {
        Self { controller, host }
    }

    /// Process inbound lines until EOF, then wait for in-flight work and flush.
    ///
    /// `commands` is the receiving end of the mirror's forwarding channel.
    pub async fn run<R, W>(
        self,
        reader: R,
        writer: W,
        commands: mpsc::UnboundedReceiver<HostCommand>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (out_tx, out_rx) = mpsc::unbounded_channel::<Outbound>();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let notifications = self.controller.subscribe();
        let writer_task = tokio::spawn(write_loop(
            writer,
            out_rx,
            commands,
            notifications,
            shutdown_rx,
        ));

        let mut in_flight = JoinSet::new();
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            tracing::trace!("Bridge inbound line: {}", line);

            match serde_json::from_str::<Inbound>(line) {
                Ok(message) => {
                    self.mirror_message(&message);
                    let controller = self.controller.clone();
                    let out_tx = out_tx.clone();
                    in_flight.spawn(async move {
                        if let Some(outbound) = handle(&controller, message).await {
                            let _ = out_tx.send(outbound);
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to parse bridge line: {e}. Line: {line}");
                    let _ = out_tx.send(Outbound::Invalid {
                        details: e.to_string(),
                    });
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Bridge task panicked");
            }
        }

        drop(out_tx);
        let _ = shutdown_tx.send(());
        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }

    /// Apply the host-side facts of a message to the mirror.
    ///
    /// Runs in arrival order, before the message's own task is spawned, so
    /// the mirror never lags behind events the engine is already handling.
    fn mirror_message(&self, message: &Inbound) {
        match message {
            Inbound::Event { event } => match event {
                HostEvent::WindowCreated { window_id } => self.host.open_window(*window_id),
                HostEvent::WindowRemoved { window_id } => self.host.close_window(*window_id),
                HostEvent::WindowFocusChanged { window_id } => self.host.focus_window(*window_id),
                HostEvent::TabCreated { tab_id, window_id } => {
                    self.host.open_tab(*window_id, *tab_id)
                }
                HostEvent::TabRemoved { tab_id, .. } => self.host.forget_tab(*tab_id),
                HostEvent::Installed | HostEvent::UpdateAvailable => {}
            },
            Inbound::Sync {
                windows,
                current_window,
            } => {
                for window in windows {
                    self.host.sync_window(window.window_id, window.tabs.clone());
                }
                if let Some(window_id) = current_window {
                    self.host.focus_window(*window_id);
                }
            }
            Inbound::Request { .. } => {}
        }
    }
}

/// Run one message against the controller; returns the line to send back, if any
pub async fn handle(controller: &SyncController, message: Inbound) -> Option<Outbound> {
    match message {
        Inbound::Event { event } => {
            let window_id = event.window_id();
            if let Err(e) = controller.handle_event(event).await {
                tracing::warn!(?window_id, error = %e, "Host event handling failed");
            }
            None
        }
        Inbound::Request { id, request } => {
            let result = api::dispatch(controller, request).await;
            if let Err(e) = &result {
                tracing::debug!(request_id = id, error = %e, "Request failed");
            }
            Some(Outbound::from_result(id, result))
        }
        Inbound::Sync { .. } => None,
    }
}

async fn write_loop<W>(
    mut writer: W,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    mut commands: mpsc::UnboundedReceiver<HostCommand>,
    mut notifications: broadcast::Receiver<WorkspaceEvent>,
    mut shutdown: oneshot::Receiver<()>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut notifications_open = true;
    loop {
        // Host commands first: a response must not overtake the commands
        // its operation issued.
        let next = tokio::select! {
            biased;
            Some(command) = commands.recv() => Outbound::Host { command },
            received = notifications.recv(), if notifications_open => match received {
                Ok(event) => Outbound::Notify { event },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Bridge fell behind on workspace notifications");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    notifications_open = false;
                    continue;
                }
            },
            Some(message) = outbound.recv() => message,
            _ = &mut shutdown => break,
        };
        write_line(&mut writer, &next).await?;
    }

    while let Ok(command) = commands.try_recv() {
        write_line(&mut writer, &Outbound::Host { command }).await?;
    }
    while let Ok(event) = notifications.try_recv() {
        write_line(&mut writer, &Outbound::Notify { event }).await?;
    }
    while let Ok(message) = outbound.try_recv() {
        write_line(&mut writer, &message).await?;
    }
    writer.flush().await
}

async fn write_line<W>(writer: &mut W, message: &Outbound) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_string(message).map_err(std::io::Error::other)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
