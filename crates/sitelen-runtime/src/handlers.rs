use sitelen_layout::{LayoutEngine, LayoutError, compose_layout};
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::{LayoutOptions, LayoutUpdate, Part, RequestId, Unit};

pub async fn handle_compose(
    request: RequestId,
    parts: Vec<Part>,
    options: LayoutOptions,
    update_tx: &mpsc::UnboundedSender<LayoutUpdate>,
) {
    match compose_layout(parts, options).await {
        Ok(set) => {
            log::debug!(
                "Request {} composed {} options",
                request.0,
                set.len()
            );
            let _ = update_tx.send(LayoutUpdate::Composed { request, set });
        }
        Err(e) => {
            let _ = update_tx.send(LayoutUpdate::Error {
                request: Some(request),
                message: format!("Failed to compose layout: {}", e),
            });
        }
    }
}

pub async fn handle_layout(
    request: RequestId,
    units: Vec<Unit>,
    options: LayoutOptions,
    update_tx: &mpsc::UnboundedSender<LayoutUpdate>,
) {
    let result =
        tokio::task::spawn_blocking(move || LayoutEngine::new(options)?.layout(&units)).await;

    match result.map_err(LayoutError::from).and_then(|inner| inner) {
        Ok(set) => {
            let _ = update_tx.send(LayoutUpdate::LaidOut { request, set });
        }
        Err(e) => {
            let _ = update_tx.send(LayoutUpdate::Error {
                request: Some(request),
                message: format!("Failed to lay out units: {}", e),
            });
        }
    }
}

pub async fn handle_load_config(path: PathBuf, update_tx: &mpsc::UnboundedSender<LayoutUpdate>) {
    match LayoutOptions::load(&path).await {
        Ok(options) => {
            let _ = update_tx.send(LayoutUpdate::ConfigLoaded { options });
        }
        Err(e) => {
            let _ = update_tx.send(LayoutUpdate::Error {
                request: None,
                message: format!("Failed to load configuration: {}", e),
            });
        }
    }
}
