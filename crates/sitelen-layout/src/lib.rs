pub mod compose;
pub mod constants;
pub mod layout;
mod options;
mod sizer;
mod stats;
mod types;

pub use compose::{Composer, Part, PartBody, PartRole, compose_layout};
pub use layout::{
    Extension, LayoutEngine, LayoutOption, LayoutSet, LayoutState, Placement, Signature, layout,
};
pub use options::*;
pub use sizer::*;
pub use stats::SearchStatistics;
pub use types::*;
