//! Metadata resolver & summarizer
//!
//! Locates the metadata root in the export and produces two views:
//! hand-curated pretty blocks for recognized substructures (browser, agent,
//! settings, templates, widgets) and generic key/value summaries for
//! everything else. All lookups degrade to "no block" — metadata never
//! fails a load.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use logsift_types::{Fact, MetaEntry, PrettyMetaBlock};

use crate::value::{first_inline, to_inline_string, to_json_string};

/// Candidate keys for the metadata root, in order
const META_ROOT_KEYS: [&str; 3] = ["meta", "metadata", "header"];

/// Inline values longer than this are truncated in generic summaries
const SUMMARY_MAX_LEN: usize = 180;
const SUMMARY_KEEP_LEN: usize = 177;

/// Keys previewed in a generic object summary
const OBJECT_KEY_PREVIEW: usize = 5;

/// Highlight caps per block
const AGENT_HIGHLIGHT_CAP: usize = 10;
const TEMPLATE_HIGHLIGHT_CAP: usize = 10;
const WIDGET_HIGHLIGHT_CAP: usize = 12;

/// The known setting keys rendered as facts, in display order
const KNOWN_SETTING_KEYS: [&str; 11] = [
    "language",
    "timezone",
    "theme",
    "autoAnswer",
    "ringtone",
    "ringtoneVolume",
    "notificationsEnabled",
    "wrapUpTime",
    "defaultChannel",
    "pageSize",
    "refreshInterval",
];

/// The localStorage key holding the JSON-encoded widget catalog
const WIDGET_CATALOG_KEY: &str = "_cc.widgets";

/// Locate the metadata root: first of `meta`/`metadata`/`header` whose
/// value is an object. Arrays and scalars under those keys are rejected.
pub fn resolve_meta_root(root: &Value) -> Option<&Map<String, Value>> {
    let obj = root.as_object()?;
    META_ROOT_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_object))
}

/// Generic one-line summary of a metadata value.
pub fn summarize_meta_value(value: &Value) -> String {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            truncate_summary(to_inline_string(value))
        }
        Value::Array(items) => format!("Array({})", items.len()),
        Value::Object(obj) => {
            let keys: Vec<&str> = obj
                .keys()
                .take(OBJECT_KEY_PREVIEW)
                .map(String::as_str)
                .collect();
            let mut summary = format!("Object({} keys): {}", obj.len(), keys.join(", "));
            if obj.len() > OBJECT_KEY_PREVIEW {
                summary.push_str(", …");
            }
            summary
        }
        _ => to_json_string(value, 0),
    }
}

fn truncate_summary(text: String) -> String {
    if text.chars().count() <= SUMMARY_MAX_LEN {
        return text;
    }
    let mut kept: String = text.chars().take(SUMMARY_KEEP_LEN).collect();
    kept.push('…');
    kept
}

/// Build the full metadata view-model: pretty blocks for recognized keys,
/// generic entries (sorted by key) for the rest.
pub fn build_meta_model(meta: &Map<String, Value>) -> (Vec<PrettyMetaBlock>, Vec<MetaEntry>) {
    let mut blocks = Vec::new();
    blocks.extend(browser_block(meta));
    blocks.extend(agent_block(meta));
    blocks.extend(settings_block(meta));
    blocks.extend(templates_block(meta));
    blocks.extend(widgets_block(meta));

    let mut claimed: BTreeSet<&str> = blocks.iter().map(|b| b.key.as_str()).collect();
    // The widget block is synthesized from localStorage, so a generic
    // localStorage entry would duplicate it.
    if claimed.contains("widgets") {
        claimed.insert("localStorage");
    }

    let mut entries: Vec<MetaEntry> = meta
        .iter()
        .filter(|(key, _)| !claimed.contains(key.as_str()))
        .map(|(key, value)| {
            MetaEntry::new(key.clone(), summarize_meta_value(value), value.clone())
        })
        .collect();
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    (blocks, entries)
}

fn push_fact(facts: &mut Vec<Fact>, label: &str, value: String) {
    if !value.is_empty() {
        facts.push(Fact::new(label, value));
    }
}

fn inline_at(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(to_inline_string).unwrap_or_default()
}

// ============================================================================
// Pretty blocks
// ============================================================================

fn browser_block(meta: &Map<String, Value>) -> Option<PrettyMetaBlock> {
    let browser = meta.get("browser")?.as_object()?;

    let name = inline_at(browser, "name");
    let version = inline_at(browser, "version");
    let subtitle = format!("{name} {version}").trim().to_string();

    let mut facts = Vec::new();
    push_fact(&mut facts, "Name", name);
    push_fact(&mut facts, "Version", version);
    push_fact(&mut facts, "Layout engine", inline_at(browser, "layout"));
    if let Some(os) = browser.get("os").and_then(Value::as_object) {
        push_fact(&mut facts, "OS family", inline_at(os, "family"));
        push_fact(&mut facts, "OS version", inline_at(os, "version"));
        push_fact(&mut facts, "OS architecture", inline_at(os, "architecture"));
    }

    let mut highlights = Vec::new();
    for key in ["description", "ua"] {
        let text = inline_at(browser, key);
        if !text.is_empty() {
            highlights.push(text);
        }
    }

    Some(PrettyMetaBlock::new(
        "browser",
        "Browser",
        subtitle,
        facts,
        highlights,
        meta.get("browser").cloned().unwrap_or(Value::Null),
    ))
}

fn agent_block(meta: &Map<String, Value>) -> Option<PrettyMetaBlock> {
    let agent = meta.get("agent")?.as_object()?;

    let mut subtitle = inline_at(agent, "displayName");
    if subtitle.is_empty() {
        let first = inline_at(agent, "firstName");
        let last = inline_at(agent, "lastName");
        subtitle = format!("{first} {last}").trim().to_string();
    }
    if subtitle.is_empty() {
        subtitle = "Unknown Agent".to_string();
    }

    let reason_codes = agent
        .get("reasonCodes")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut facts = Vec::new();
    push_fact(&mut facts, "Handle", inline_at(agent, "handle"));
    push_fact(&mut facts, "Role", inline_at(agent, "role"));
    push_fact(&mut facts, "State", inline_at(agent, "state"));
    push_fact(&mut facts, "Channel", inline_at(agent, "channel"));
    push_fact(&mut facts, "Station", inline_at(agent, "station"));
    push_fact(&mut facts, "Agent id", inline_at(agent, "id"));
    push_fact(&mut facts, "Provider id", inline_at(agent, "providerId"));
    if !reason_codes.is_empty() {
        push_fact(&mut facts, "Reason codes", reason_codes.len().to_string());
    }

    let highlights: Vec<String> = reason_codes
        .iter()
        .take(AGENT_HIGHLIGHT_CAP)
        .map(|code| first_inline(&[code.get("friendlyName"), code.get("code")]))
        .filter(|name| !name.is_empty())
        .collect();

    Some(PrettyMetaBlock::new(
        "agent",
        "Agent",
        subtitle,
        facts,
        highlights,
        meta.get("agent").cloned().unwrap_or(Value::Null),
    ))
}

fn settings_block(meta: &Map<String, Value>) -> Option<PrettyMetaBlock> {
    let settings = meta.get("settings")?.as_object()?;

    let mut facts = Vec::new();
    for key in KNOWN_SETTING_KEYS {
        // Absent or blank settings are dropped, not rendered empty
        push_fact(&mut facts, key, inline_at(settings, key));
    }

    let mut highlights = Vec::new();
    let deferred = inline_at(settings, "deferredTimeInterval");
    if !deferred.is_empty() {
        highlights.push(format!("Deferred time interval: {deferred}"));
    }

    Some(PrettyMetaBlock::new(
        "settings",
        "Settings",
        format!("{} known settings", facts.len()),
        facts,
        highlights,
        meta.get("settings").cloned().unwrap_or(Value::Null),
    ))
}

fn templates_block(meta: &Map<String, Value>) -> Option<PrettyMetaBlock> {
    let templates = meta.get("templates")?.as_array()?;
    if templates.is_empty() || !templates.iter().any(Value::is_object) {
        return None;
    }

    let mut core_count = 0usize;
    let mut compressed_count = 0usize;
    let mut tab_count = 0usize;
    let mut widget_refs = 0usize;
    for template in templates {
        if template.get("core") == Some(&Value::Bool(true)) {
            core_count += 1;
        }
        if template.get("useCompressedWorkspaces") == Some(&Value::Bool(true)) {
            compressed_count += 1;
        }
        for_each_template_tab(template, |tab| {
            tab_count += 1;
            widget_refs += tab
                .get("widgets")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0);
        });
    }

    let facts = vec![
        Fact::new("Core templates", core_count.to_string()),
        Fact::new("Compressed workspaces", compressed_count.to_string()),
        Fact::new("Tabs", tab_count.to_string()),
        Fact::new("Widget references", widget_refs.to_string()),
    ];

    let highlights: Vec<String> = templates
        .iter()
        .take(TEMPLATE_HIGHLIGHT_CAP)
        .map(|t| first_inline(&[t.get("name"), t.get("id")]))
        .filter(|name| !name.is_empty())
        .collect();

    Some(PrettyMetaBlock::new(
        "templates",
        "Templates",
        format!("{} templates", templates.len()),
        facts,
        highlights,
        meta.get("templates").cloned().unwrap_or(Value::Null),
    ))
}

/// Walk `template.layout` → per-role object → `tabs` object → each tab
fn for_each_template_tab(template: &Value, mut visit: impl FnMut(&Map<String, Value>)) {
    let Some(layout) = template.get("layout").and_then(Value::as_object) else {
        return;
    };
    for role_layout in layout.values() {
        let Some(tabs) = role_layout.get("tabs").and_then(Value::as_object) else {
            continue;
        };
        for tab in tabs.values() {
            if let Some(tab) = tab.as_object() {
                visit(tab);
            }
        }
    }
}

fn widgets_block(meta: &Map<String, Value>) -> Option<PrettyMetaBlock> {
    // Catalog comes from a JSON-encoded string in localStorage; a bad or
    // missing payload yields an empty catalog, never an error.
    let catalog: Vec<String> = meta
        .get("localStorage")
        .and_then(|ls| ls.get(WIDGET_CATALOG_KEY))
        .and_then(Value::as_str)
        .and_then(|encoded| serde_json::from_str::<Value>(encoded).ok())
        .and_then(|parsed| {
            parsed
                .as_object()
                .map(|obj| obj.keys().cloned().collect())
        })
        .unwrap_or_default();

    let mut referenced: Vec<String> = Vec::new();
    if let Some(templates) = meta.get("templates").and_then(Value::as_array) {
        for template in templates {
            for_each_template_tab(template, |tab| {
                let widgets = tab
                    .get("widgets")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                for widget in widgets {
                    let name = match widget {
                        Value::String(s) => s.clone(),
                        other => first_inline(&[other.get("name"), other.get("id")]),
                    };
                    if !name.is_empty() {
                        referenced.push(name);
                    }
                }
            });
        }
    }

    // Unique names deliberately union catalog and references without
    // distinguishing provenance; the separate facts carry the split.
    let unique: BTreeSet<&String> = catalog.iter().chain(referenced.iter()).collect();
    if unique.is_empty() {
        return None;
    }

    let facts = vec![
        Fact::new("Catalog widgets", catalog.len().to_string()),
        Fact::new("Template references", referenced.len().to_string()),
        Fact::new("Unique names", unique.len().to_string()),
    ];
    let highlights: Vec<String> = unique
        .iter()
        .take(WIDGET_HIGHLIGHT_CAP)
        .map(|name| (*name).clone())
        .collect();

    Some(PrettyMetaBlock::new(
        "widgets",
        "Widgets",
        format!("{} unique widgets", unique.len()),
        facts,
        highlights,
        meta.get("localStorage").cloned().unwrap_or(Value::Null),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta_of(root: Value) -> Map<String, Value> {
        resolve_meta_root(&root).cloned().unwrap()
    }

    #[test]
    fn test_meta_root_resolution_order() {
        let root = json!({"metadata": {"a": 1}, "meta": {"b": 2}});
        let found = resolve_meta_root(&root).unwrap();
        assert!(found.contains_key("b"));
    }

    #[test]
    fn test_meta_root_rejects_non_objects() {
        let root = json!({"meta": [1, 2], "header": {"ok": true}});
        let found = resolve_meta_root(&root).unwrap();
        assert!(found.contains_key("ok"));
        assert!(resolve_meta_root(&json!({"meta": "scalar"})).is_none());
    }

    #[test]
    fn test_summarize_scalars_and_composites() {
        assert_eq!(summarize_meta_value(&json!("hi")), "hi");
        assert_eq!(summarize_meta_value(&json!(7)), "7");
        assert_eq!(summarize_meta_value(&json!([1, 2, 3])), "Array(3)");
        assert_eq!(
            summarize_meta_value(&json!({"a": 1, "b": 2})),
            "Object(2 keys): a, b"
        );
        assert_eq!(summarize_meta_value(&Value::Null), "null");
    }

    #[test]
    fn test_summarize_object_key_preview() {
        let value = json!({"a":1,"b":2,"c":3,"d":4,"e":5,"f":6});
        assert_eq!(
            summarize_meta_value(&value),
            "Object(6 keys): a, b, c, d, e, …"
        );
    }

    #[test]
    fn test_summarize_long_string_truncation() {
        let long = "x".repeat(200);
        let summary = summarize_meta_value(&json!(long));
        assert_eq!(summary.chars().count(), SUMMARY_KEEP_LEN + 1);
        assert!(summary.ends_with('…'));
        // Exactly at the limit passes through untouched
        let edge = "y".repeat(SUMMARY_MAX_LEN);
        assert_eq!(summarize_meta_value(&json!(edge.clone())), edge);
    }

    #[test]
    fn test_browser_block_subtitle_and_exclusion() {
        let meta = meta_of(json!({"meta": {
            "browser": {"name": "Chrome", "version": "120"},
            "session": "abc"
        }}));
        let (blocks, entries) = build_meta_model(&meta);
        let browser = blocks.iter().find(|b| b.key == "browser").unwrap();
        assert_eq!(browser.subtitle, "Chrome 120");
        assert!(entries.iter().all(|e| e.key != "browser"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "session");
    }

    #[test]
    fn test_browser_block_os_facts_and_highlights() {
        let meta = meta_of(json!({"meta": {"browser": {
            "name": "Firefox",
            "version": "121",
            "layout": "Gecko",
            "os": {"family": "Linux", "version": "6.1", "architecture": 64},
            "ua": "Mozilla/5.0"
        }}}));
        let (blocks, _) = build_meta_model(&meta);
        let browser = &blocks[0];
        let labels: Vec<&str> = browser.facts.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Name",
                "Version",
                "Layout engine",
                "OS family",
                "OS version",
                "OS architecture"
            ]
        );
        assert_eq!(browser.highlights, vec!["Mozilla/5.0"]);
    }

    #[test]
    fn test_agent_block_name_fallbacks() {
        let meta = meta_of(json!({"meta": {"agent": {
            "firstName": "Ada", "lastName": "Lovelace",
            "reasonCodes": [
                {"friendlyName": "Lunch"},
                {"code": "RC-2"}
            ]
        }}}));
        let (blocks, _) = build_meta_model(&meta);
        let agent = &blocks[0];
        assert_eq!(agent.subtitle, "Ada Lovelace");
        assert_eq!(agent.highlights, vec!["Lunch", "RC-2"]);

        let meta = meta_of(json!({"meta": {"agent": {}}}));
        let (blocks, _) = build_meta_model(&meta);
        assert_eq!(blocks[0].subtitle, "Unknown Agent");
    }

    #[test]
    fn test_settings_block_drops_blank_keys() {
        let meta = meta_of(json!({"meta": {"settings": {
            "language": "en",
            "timezone": "",
            "unknownKey": "ignored",
            "deferredTimeInterval": 15
        }}}));
        let (blocks, _) = build_meta_model(&meta);
        let settings = &blocks[0];
        assert_eq!(settings.facts, vec![Fact::new("language", "en")]);
        assert_eq!(
            settings.highlights,
            vec!["Deferred time interval: 15".to_string()]
        );
    }

    fn template_fixture() -> Value {
        json!({"meta": {
            "templates": [{
                "id": "t-1",
                "name": "Supervisor",
                "core": true,
                "layout": {
                    "desktop": {
                        "tabs": {
                            "home": {"widgets": ["clock", {"name": "queue"}]},
                            "stats": {"widgets": ["clock"]}
                        }
                    }
                }
            }, {
                "id": "t-2",
                "useCompressedWorkspaces": true
            }],
            "localStorage": {
                "_cc.widgets": "{\"clock\":{},\"notes\":{}}"
            }
        }})
    }

    #[test]
    fn test_templates_block_walks_layout() {
        let meta = meta_of(template_fixture());
        let (blocks, _) = build_meta_model(&meta);
        let templates = blocks.iter().find(|b| b.key == "templates").unwrap();
        let fact = |label: &str| {
            templates
                .facts
                .iter()
                .find(|f| f.label == label)
                .unwrap()
                .value
                .clone()
        };
        assert_eq!(fact("Core templates"), "1");
        assert_eq!(fact("Compressed workspaces"), "1");
        assert_eq!(fact("Tabs"), "2");
        assert_eq!(fact("Widget references"), "3");
        assert_eq!(templates.highlights, vec!["Supervisor", "t-2"]);
    }

    #[test]
    fn test_widgets_block_unions_catalog_and_references() {
        let meta = meta_of(template_fixture());
        let (blocks, entries) = build_meta_model(&meta);
        let widgets = blocks.iter().find(|b| b.key == "widgets").unwrap();
        let fact = |label: &str| {
            widgets
                .facts
                .iter()
                .find(|f| f.label == label)
                .unwrap()
                .value
                .clone()
        };
        assert_eq!(fact("Catalog widgets"), "2");
        assert_eq!(fact("Template references"), "3");
        // clock, notes, queue
        assert_eq!(fact("Unique names"), "3");
        assert_eq!(widgets.highlights, vec!["clock", "notes", "queue"]);
        // localStorage is consumed by the widgets block
        assert!(entries.iter().all(|e| e.key != "localStorage"));
    }

    #[test]
    fn test_widget_catalog_parse_failure_degrades() {
        let meta = meta_of(json!({"meta": {
            "localStorage": {"_cc.widgets": "not json at all"}
        }}));
        let (blocks, entries) = build_meta_model(&meta);
        // Empty union: no widgets block, localStorage falls back to generic
        assert!(blocks.iter().all(|b| b.key != "widgets"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "localStorage");
    }

    #[test]
    fn test_templates_block_requires_objects() {
        let meta = meta_of(json!({"meta": {"templates": ["just", "strings"]}}));
        let (blocks, _) = build_meta_model(&meta);
        assert!(blocks.iter().all(|b| b.key != "templates"));
        let meta = meta_of(json!({"meta": {"templates": []}}));
        let (blocks, _) = build_meta_model(&meta);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_generic_entries_sorted() {
        let meta = meta_of(json!({"meta": {"zeta": 1, "alpha": 2, "mid": 3}}));
        let (_, entries) = build_meta_model(&meta);
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }
}
