//! Normalization and filtering engine for logsift
//!
//! This crate turns an arbitrarily-shaped JSON log export into a stable
//! internal model: it locates the event collection, normalizes each record,
//! summarizes the metadata block, and evaluates filters over the result.
//! It performs no I/O; callers hand it already-parsed text and read the
//! derived model back out.

mod catalog;
mod document;
mod filter;
mod meta;
mod normalize;
mod resolve;
mod value;

pub use catalog::OptionCatalogs;
pub use document::{Document, LevelCounts};
pub use filter::FilterState;
pub use meta::{build_meta_model, resolve_meta_root, summarize_meta_value};
pub use normalize::{canonicalize_timestamp, infer_application, normalize_event, normalize_level};
pub use resolve::resolve_event_collection;
pub use value::{first_defined, first_inline, to_inline_string, to_json_string};

// Re-export types used in our public API
pub use logsift_types::{
    ArcEvent, Fact, LevelTone, LoadError, MetaEntry, NormalizedEvent, PrettyMetaBlock,
};
