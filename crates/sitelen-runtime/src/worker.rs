use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::handlers;
use crate::{LayoutCommand, LayoutOptions, LayoutUpdate, Part, RequestId, Result, RuntimeError, Unit};

/// Async worker task that processes layout commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<LayoutCommand>,
    update_tx: mpsc::UnboundedSender<LayoutUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut command_rx, &update_tx).await;
    }
    log::debug!("Layout worker stopped, command channel closed");
}

async fn process_command(
    cmd: LayoutCommand,
    command_rx: &mut mpsc::UnboundedReceiver<LayoutCommand>,
    update_tx: &mpsc::UnboundedSender<LayoutUpdate>,
) {
    match cmd {
        LayoutCommand::Compose {
            mut request,
            mut parts,
            mut options,
        } => {
            // Drain any queued compose commands, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let LayoutCommand::Compose {
                    request: new_request,
                    parts: new_parts,
                    options: new_options,
                } = next_cmd
                {
                    log::debug!(
                        "Discarding queued compose request {}, using newer request {}",
                        request.0,
                        new_request.0
                    );
                    let _ = update_tx.send(LayoutUpdate::Superseded { request });
                    request = new_request;
                    parts = new_parts;
                    options = new_options;
                } else {
                    // Can't put it back, so process it before the compose
                    Box::pin(process_command(next_cmd, command_rx, update_tx)).await;
                }
            }

            handlers::handle_compose(request, parts, options, update_tx).await;
        }
        LayoutCommand::Layout {
            request,
            units,
            options,
        } => {
            handlers::handle_layout(request, units, options, update_tx).await;
        }
        LayoutCommand::LoadConfig { path } => {
            handlers::handle_load_config(path, update_tx).await;
        }
    }
}

/// Client side of a running [`worker_task`]
#[derive(Debug, Clone)]
pub struct LayoutWorker {
    command_tx: mpsc::UnboundedSender<LayoutCommand>,
}

impl LayoutWorker {
    /// Spawn a worker on the current tokio runtime.
    ///
    /// The worker stops once every handle is dropped.
    pub fn spawn() -> (Self, mpsc::UnboundedReceiver<LayoutUpdate>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        tokio::spawn(worker_task(command_rx, update_tx));

        (Self { command_tx }, update_rx)
    }

    pub fn send(&self, command: LayoutCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| RuntimeError::WorkerClosed)
    }

    /// Queue a sentence; a newer queued sentence supersedes it
    pub fn compose(&self, parts: Vec<Part>, options: LayoutOptions) -> Result<RequestId> {
        let request = RequestId::next();
        self.send(LayoutCommand::Compose {
            request,
            parts,
            options,
        })?;
        Ok(request)
    }

    pub fn layout(&self, units: Vec<Unit>, options: LayoutOptions) -> Result<RequestId> {
        let request = RequestId::next();
        self.send(LayoutCommand::Layout {
            request,
            units,
            options,
        })?;
        Ok(request)
    }

    pub fn load_config(&self, path: impl Into<PathBuf>) -> Result<()> {
        self.send(LayoutCommand::LoadConfig { path: path.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_after_shutdown() {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        drop(command_rx);
        let worker = LayoutWorker { command_tx };

        let result = worker.compose(vec![Part::words(["mi"])], LayoutOptions::default());
        assert!(matches!(result, Err(RuntimeError::WorkerClosed)));
        assert!(worker.load_config("layout.json").is_err());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestId::next();
        let b = RequestId::next();
        assert!(b > a);
    }
}
