//! # Schema Updates
//!
//! Additive merging of property changes into a fetched [`DatabaseSchema`].
//! Existing choice options are never dropped: new options are appended and
//! duplicates by name are suppressed.

use super::model::DatabaseSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Choice-type properties whose option lists can be extended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    Select,
    MultiSelect,
}

impl ChoiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChoiceKind::Select => "select",
            ChoiceKind::MultiSelect => "multi_select",
        }
    }

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "select" => Some(ChoiceKind::Select),
            "multi_select" => Some(ChoiceKind::MultiSelect),
            _ => None,
        }
    }
}

/// A requested change to one property.
///
/// Deserializes from the same shape the service uses for property
/// definitions, with `new_name` marking a rename.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PropertyChange {
    Rename {
        new_name: String,
    },
    Definition {
        #[serde(rename = "type")]
        kind: String,
        #[serde(flatten)]
        config: Map<String, Value>,
    },
}

impl PropertyChange {
    /// Option objects carried by a definition change
    fn options(&self) -> Vec<Value> {
        match self {
            PropertyChange::Rename { .. } => Vec::new(),
            PropertyChange::Definition { kind, config } => config
                .get(kind)
                .and_then(|c| c.get("options"))
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// A batch of property changes keyed by current property name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaUpdate {
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl SchemaUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename `from` to `to`, keeping its definition
    pub fn rename(mut self, from: &str, to: &str) -> Self {
        self.properties
            .insert(from.to_string(), json!({ "new_name": to }));
        self
    }

    /// Add options to a choice-type property
    pub fn add_options(mut self, property: &str, kind: ChoiceKind, options: Vec<SelectOption>) -> Self {
        let options: Vec<Value> = options.into_iter().map(SelectOption::into_value).collect();
        self.properties.insert(
            property.to_string(),
            json!({ "type": kind.as_str(), kind.as_str(): { "options": options } }),
        );
        self
    }

    /// Parsed changes in request order.
    ///
    /// Entries that match neither a rename nor a typed definition are returned
    /// as skipped.
    pub fn changes(&self) -> (Vec<(String, PropertyChange)>, Vec<SkippedChange>) {
        let mut changes = Vec::new();
        let mut skipped = Vec::new();
        for (name, raw) in &self.properties {
            match serde_json::from_value::<PropertyChange>(raw.clone()) {
                Ok(change) => changes.push((name.clone(), change)),
                Err(_) => skipped.push(SkippedChange {
                    property: name.clone(),
                    reason: SkipReason::Malformed,
                }),
            }
        }
        (changes, skipped)
    }
}

/// A choice option as sent to the service
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub name: String,
    pub color: Option<String>,
}

impl SelectOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    fn into_value(self) -> Value {
        match self.color {
            Some(color) => json!({ "name": self.name, "color": color }),
            None => json!({ "name": self.name }),
        }
    }
}

/// Why a requested change was not applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The property does not exist in the current schema.
    MissingProperty,
    /// Only `select` and `multi_select` definitions can be updated.
    UnsupportedType(String),
    /// The change is neither a rename nor a typed definition.
    Malformed,
    /// The rename target is already used by another property.
    NameTaken(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChange {
    pub property: String,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            SkipReason::MissingProperty => {
                write!(f, "Property '{}' does not exist in the database.", self.property)
            }
            SkipReason::UnsupportedType(kind) => {
                write!(f, "Property type '{kind}' not supported for updates.")
            }
            SkipReason::Malformed => {
                write!(f, "Property '{}' has no type or new_name.", self.property)
            }
            SkipReason::NameTaken(new_name) => write!(
                f,
                "Cannot rename '{}': property '{new_name}' already exists.",
                self.property
            ),
        }
    }
}

/// Result of merging a [`SchemaUpdate`] into the current schema
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSchema {
    /// Full property map after the changes, in schema order
    pub properties: Map<String, Value>,
    /// Only the changed properties, keyed the way the PATCH request expects
    pub patch: Map<String, Value>,
    pub skipped: Vec<SkippedChange>,
}

impl MergedSchema {
    pub fn is_empty(&self) -> bool {
        self.patch.is_empty()
    }

    /// Request body for the schema PATCH
    pub fn payload(&self) -> Value {
        json!({ "properties": self.patch })
    }
}

/// Merge `update` into `current` without touching the service.
pub fn merge_schema_update(current: &DatabaseSchema, update: &SchemaUpdate) -> MergedSchema {
    let (changes, mut skipped) = update.changes();
    let mut properties = current.properties.clone();
    let mut patch = Map::new();

    for (name, change) in changes {
        match &change {
            PropertyChange::Rename { new_name } => {
                let Some(definition) = current.property(&name) else {
                    skipped.push(SkippedChange {
                        property: name,
                        reason: SkipReason::MissingProperty,
                    });
                    continue;
                };
                if *new_name != name && properties.contains_key(new_name) {
                    skipped.push(SkippedChange {
                        property: name,
                        reason: SkipReason::NameTaken(new_name.clone()),
                    });
                    continue;
                }
                let mut renamed = definition.clone();
                if let Some(obj) = renamed.as_object_mut() {
                    obj.insert("name".to_string(), Value::String(new_name.clone()));
                }
                rename_in_place(&mut properties, &name, new_name, renamed.clone());
                patch.insert(name, renamed);
            }
            PropertyChange::Definition { kind, .. } => {
                let Some(choice) = ChoiceKind::parse(kind) else {
                    skipped.push(SkippedChange {
                        property: name,
                        reason: SkipReason::UnsupportedType(kind.clone()),
                    });
                    continue;
                };
                // targets are names in the fetched schema, never names
                // introduced by a rename in the same request
                let Some(definition) = current.property(&name) else {
                    skipped.push(SkippedChange {
                        property: name,
                        reason: SkipReason::MissingProperty,
                    });
                    continue;
                };

                let existing = definition
                    .get(choice.as_str())
                    .and_then(|c| c.get("options"))
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let options = merge_options(existing, change.options());

                let merged = json!({
                    "type": choice.as_str(),
                    choice.as_str(): { "options": options },
                });
                if let Some(Value::Object(target)) = properties.get_mut(&name) {
                    target.insert("type".to_string(), merged["type"].clone());
                    target.insert(choice.as_str().to_string(), merged[choice.as_str()].clone());
                }
                patch.insert(name, merged);
            }
        }
    }

    MergedSchema {
        properties,
        patch,
        skipped,
    }
}

/// Append `incoming` options whose names are not yet present.
fn merge_options(existing: Vec<Value>, incoming: Vec<Value>) -> Vec<Value> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());
    for option in existing.into_iter().chain(incoming) {
        let Some(name) = option.get("name").and_then(Value::as_str) else {
            continue;
        };
        if seen.insert(name.to_string()) {
            merged.push(option);
        }
    }
    merged
}

/// Replace key `from` with `to`, keeping its position. `to` must be unused.
fn rename_in_place(properties: &mut Map<String, Value>, from: &str, to: &str, value: Value) {
    let entries = std::mem::take(properties);
    for (key, existing) in entries {
        if key == from {
            properties.insert(to.to_string(), value.clone());
        } else {
            properties.insert(key, existing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> DatabaseSchema {
        serde_json::from_value(json!({
            "object": "database",
            "id": "db",
            "properties": {
                "Company": { "id": "c1", "name": "Company", "type": "title", "title": {} },
                "Status": {
                    "id": "s1",
                    "name": "Status",
                    "type": "select",
                    "select": { "options": [
                        { "name": "A", "color": "red" },
                        { "name": "B", "color": "blue" }
                    ] }
                },
                "Tags": {
                    "id": "t1",
                    "name": "Tags",
                    "type": "multi_select",
                    "multi_select": { "options": [] }
                }
            }
        }))
        .unwrap()
    }

    fn names(options: &Value) -> Vec<&str> {
        options
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["name"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn merge_should_append_new_options_once() {
        let update = SchemaUpdate::new().add_options(
            "Status",
            ChoiceKind::Select,
            vec![SelectOption::new("B"), SelectOption::new("C").with_color("green")],
        );
        let merged = merge_schema_update(&schema(), &update);

        assert!(merged.skipped.is_empty());
        assert_eq!(names(&merged.patch["Status"]["select"]["options"]), vec!["A", "B", "C"]);
        // pre-existing option keeps its original color
        assert_eq!(merged.patch["Status"]["select"]["options"][1]["color"], "blue");
        assert_eq!(
            names(&merged.properties["Status"]["select"]["options"]),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn merge_should_suppress_duplicates_within_request() {
        let update = SchemaUpdate::new().add_options(
            "Tags",
            ChoiceKind::MultiSelect,
            vec![SelectOption::new("rust"), SelectOption::new("rust"), SelectOption::new("remote")],
        );
        let merged = merge_schema_update(&schema(), &update);
        assert_eq!(
            names(&merged.patch["Tags"]["multi_select"]["options"]),
            vec!["rust", "remote"]
        );
    }

    #[test]
    fn rename_should_move_definition_to_new_name() {
        let update = SchemaUpdate::new().rename("Company", "Employer");
        let merged = merge_schema_update(&schema(), &update);

        assert!(!merged.properties.contains_key("Company"));
        let renamed = &merged.properties["Employer"];
        assert_eq!(renamed["type"], "title");
        assert_eq!(renamed["id"], "c1");
        assert_eq!(renamed["name"], "Employer");
        assert_eq!(
            merged.properties.keys().filter(|k| *k == "Employer").count(),
            1
        );
        // position is preserved
        assert_eq!(merged.properties.keys().next().map(String::as_str), Some("Employer"));
        // request is keyed by the current name
        assert_eq!(merged.patch["Company"]["name"], "Employer");
    }

    #[test]
    fn rename_onto_existing_property_should_be_skipped() {
        let mut current = schema();
        current.properties.insert(
            "Employer".to_string(),
            json!({ "id": "e1", "name": "Employer", "type": "rich_text", "rich_text": {} }),
        );
        let update = SchemaUpdate::new().rename("Company", "Employer");
        let merged = merge_schema_update(&current, &update);

        assert!(merged.is_empty());
        assert_eq!(
            merged.skipped,
            vec![SkippedChange {
                property: "Company".to_string(),
                reason: SkipReason::NameTaken("Employer".to_string()),
            }]
        );
        assert_eq!(merged.properties, current.properties);
        assert_eq!(merged.properties["Employer"]["type"], "rich_text");
    }

    #[test]
    fn rename_to_same_name_should_apply() {
        let update = SchemaUpdate::new().rename("Company", "Company");
        let merged = merge_schema_update(&schema(), &update);
        assert!(merged.skipped.is_empty());
        assert_eq!(merged.patch["Company"]["name"], "Company");
        assert_eq!(merged.properties.len(), 3);
    }

    #[test]
    fn options_for_a_name_introduced_by_rename_should_be_skipped() {
        let update = SchemaUpdate::new()
            .rename("Status", "Stage")
            .add_options("Stage", ChoiceKind::Select, vec![SelectOption::new("C")]);
        let merged = merge_schema_update(&schema(), &update);

        assert_eq!(
            merged.skipped,
            vec![SkippedChange {
                property: "Stage".to_string(),
                reason: SkipReason::MissingProperty,
            }]
        );
        let keys: Vec<&String> = merged.patch.keys().collect();
        assert_eq!(keys, vec!["Status"]);
        assert_eq!(merged.patch["Status"]["name"], "Stage");
        assert_eq!(names(&merged.properties["Stage"]["select"]["options"]), vec!["A", "B"]);
    }

    #[test]
    fn unsupported_type_should_be_skipped() {
        let mut update = SchemaUpdate::new();
        update.properties.insert(
            "Company".to_string(),
            json!({ "type": "rich_text", "rich_text": {} }),
        );
        let merged = merge_schema_update(&schema(), &update);

        assert!(merged.is_empty());
        assert_eq!(
            merged.skipped,
            vec![SkippedChange {
                property: "Company".to_string(),
                reason: SkipReason::UnsupportedType("rich_text".to_string()),
            }]
        );
        assert_eq!(
            merged.skipped[0].to_string(),
            "Property type 'rich_text' not supported for updates."
        );
    }

    #[test]
    fn missing_property_should_be_skipped() {
        let update = SchemaUpdate::new()
            .add_options("Stage", ChoiceKind::Select, vec![SelectOption::new("X")])
            .rename("Nope", "Still Nope");
        let merged = merge_schema_update(&schema(), &update);

        assert!(merged.is_empty());
        assert_eq!(merged.skipped.len(), 2);
        assert!(merged
            .skipped
            .iter()
            .all(|s| s.reason == SkipReason::MissingProperty));
    }

    #[test]
    fn malformed_change_should_be_skipped() {
        let mut update = SchemaUpdate::new();
        update
            .properties
            .insert("Status".to_string(), json!({ "color": "red" }));
        let merged = merge_schema_update(&schema(), &update);
        assert_eq!(merged.skipped[0].reason, SkipReason::Malformed);
    }

    #[test]
    fn payload_should_wrap_changed_properties() {
        let update = SchemaUpdate::new().add_options(
            "Status",
            ChoiceKind::Select,
            vec![SelectOption::new("C")],
        );
        let payload = merge_schema_update(&schema(), &update).payload();
        let props = payload["properties"].as_object().unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props["Status"]["type"], "select");
    }

    #[test]
    fn change_with_new_name_should_parse_as_rename() {
        let change: PropertyChange =
            serde_json::from_value(json!({ "new_name": "X", "type": "select" })).unwrap();
        assert_eq!(
            change,
            PropertyChange::Rename {
                new_name: "X".to_string()
            }
        );
    }
}
