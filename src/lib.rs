pub mod artwork;
pub mod cli;
pub mod collection;
pub mod config;
pub mod error;
pub mod events;
pub mod input;
pub mod mode;
pub mod navigator;
pub mod pipeline;
pub mod render;
pub mod shell;
pub mod source;
pub mod time;
pub mod transition;
pub mod viewpoint;

pub use artwork::{ArtworkId, ArtworkRecord, ItemView};
pub use error::NavigatorError;
pub use mode::{Intent, Mode};
pub use navigator::{Navigator, NavigatorState, SearchOutcome};
pub use pipeline::SortKey;
pub use viewpoint::{Pose, ViewpointCycle};

/// Direction of a cyclic step through the collection or the viewpoint tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Forward,
    Backward,
}

/// Modular step: backward from 0 lands on `len - 1`, forward from the last index lands on 0.
pub(crate) fn wrap_index(index: usize, len: usize, step: Step) -> usize {
    if len == 0 {
        return 0;
    }
    match step {
        Step::Forward => (index + 1) % len,
        Step::Backward => (index + len - 1) % len,
    }
}
