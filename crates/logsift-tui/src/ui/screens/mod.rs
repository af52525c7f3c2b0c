mod events;
mod metadata;

pub use events::EventsScreen;
pub use metadata::MetadataScreen;
