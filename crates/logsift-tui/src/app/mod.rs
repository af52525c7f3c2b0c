//! Application state and actions

mod action;
mod state;

pub use action::{map_key, Action};
pub use state::{AppState, PickerKind, PickerState, Screen};
