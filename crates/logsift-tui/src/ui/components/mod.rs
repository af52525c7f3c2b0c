mod help_overlay;
mod picker_overlay;
mod status_bar;

pub use help_overlay::HelpOverlay;
pub use picker_overlay::PickerOverlay;
pub use status_bar::StatusBar;
