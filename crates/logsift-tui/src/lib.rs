//! TUI shell for logsift
//!
//! The engine does all the deciding; this crate only renders its model and
//! translates keys into filter/navigation actions.

pub mod app;
pub mod tui;
pub mod ui;

pub use app::{map_key, Action, AppState, PickerKind, Screen};
pub use tui::{Event, EventHandler, Tui};
pub use ui::{render, Theme};
