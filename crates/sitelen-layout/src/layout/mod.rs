//! Container layout engine
//!
//! This module handles the search for block layouts of a flat unit sequence:
//! - In-progress state with structural sharing between branches
//! - Row/column extension with compatibility and reading-flow checks
//! - Normalization, canonical signatures and surface pruning

mod budget;
mod collector;
mod engine;
mod signature;
mod state;
mod types;

pub(crate) use budget::Budget;
pub(crate) use collector::OptionCollector;
pub use engine::{LayoutEngine, layout};
pub use signature::Signature;
pub use state::LayoutState;
pub use types::*;
