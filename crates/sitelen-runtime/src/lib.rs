use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

mod handlers;
mod worker;

// Re-export types from the library crate
pub use sitelen_layout::{LayoutOptions, LayoutSet, Part, Unit};
pub use worker::{LayoutWorker, worker_task};

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Commands sent from a client to the worker
#[derive(Debug)]
pub enum LayoutCommand {
    /// Lay out a sentence. Superseded by a newer queued `Compose`.
    Compose {
        request: RequestId,
        parts: Vec<Part>,
        options: LayoutOptions,
    },
    /// Lay out a flat unit sequence
    Layout {
        request: RequestId,
        units: Vec<Unit>,
        options: LayoutOptions,
    },
    LoadConfig {
        path: PathBuf,
    },
}

/// Updates sent from the worker to a client
#[derive(Debug, Clone)]
pub enum LayoutUpdate {
    /// Result of a `Compose` command
    Composed {
        request: RequestId,
        set: LayoutSet,
    },
    /// Result of a `Layout` command
    LaidOut {
        request: RequestId,
        set: LayoutSet,
    },
    /// A queued compose request was dropped in favour of a newer one
    Superseded {
        request: RequestId,
    },
    ConfigLoaded {
        options: LayoutOptions,
    },
    Error {
        request: Option<RequestId>,
        message: String,
    },
}

/// Handle to a layout request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl RequestId {
    /// A process-unique id
    pub fn next() -> Self {
        Self(NEXT_REQUEST_ID.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Layout worker has shut down")]
    WorkerClosed,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
