//! Option catalog builder
//!
//! Derives the distinct sorted value sets used to populate the filter
//! pickers.

use std::collections::BTreeSet;

use logsift_types::ArcEvent;

/// Distinct sorted values per filterable dimension
#[derive(Clone, Debug, Default)]
pub struct OptionCatalogs {
    pub levels: Vec<String>,
    pub applications: Vec<String>,
    pub contexts: Vec<String>,
}

impl OptionCatalogs {
    pub fn from_events(events: &[ArcEvent]) -> Self {
        let mut levels = BTreeSet::new();
        let mut applications = BTreeSet::new();
        let mut contexts = BTreeSet::new();
        for event in events {
            levels.insert(event.level.clone());
            applications.insert(event.application.clone());
            contexts.insert(event.context.clone());
        }
        Self {
            levels: levels.into_iter().collect(),
            applications: applications.into_iter().collect(),
            contexts: contexts.into_iter().collect(),
        }
    }
}
