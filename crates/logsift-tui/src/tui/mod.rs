//! Terminal handling

mod event;
mod terminal;

pub use event::{Event, EventHandler};
pub use terminal::Tui;
