//! UI panels

mod grid;
mod tracks;

pub use grid::{GridAction, GridPanel};
pub use tracks::{TracksAction, TracksPanel};
