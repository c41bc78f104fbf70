//! # Database Records
//!
//! Transient copies of what the hosted database owns. Unknown fields are kept
//! in `extra` so a fetched object can be written back out unchanged.

use super::error::NotionError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum number of rows the query endpoint returns per page.
pub const MAX_PAGE_SIZE: u8 = 100;

/// A single row (page) in a database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Row {
    /// Property value by name
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// A database object, including its ordered property definitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DatabaseSchema {
    /// Property definition by name
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Property type tag, e.g. `select`
    pub fn property_type(&self, name: &str) -> Option<&str> {
        self.property(name)?.get("type")?.as_str()
    }

    /// Option names of a choice-type property, in stored order
    pub fn option_names(&self, name: &str) -> Vec<String> {
        let Some(kind) = self.property_type(name) else {
            return Vec::new();
        };
        self.property(name)
            .and_then(|p| p.get(kind))
            .and_then(|c| c.get("options"))
            .and_then(Value::as_array)
            .map(|opts| {
                opts.iter()
                    .filter_map(|o| o.get("name").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Query parameters for listing rows
#[derive(Debug, Clone, Serialize)]
pub struct RowQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<Value>>,
    pub page_size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self {
            filter: None,
            sorts: None,
            page_size: MAX_PAGE_SIZE,
            start_cursor: None,
        }
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_sorts(mut self, sorts: Vec<Value>) -> Self {
        self.sorts = Some(sorts);
        self
    }

    /// Page size, clamped to `1..=100`
    pub fn with_page_size(mut self, page_size: u8) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn with_start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }
}

impl Default for RowQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// One page of query results as returned by the service
#[derive(Debug, Deserialize)]
pub(crate) struct QueryPage {
    #[serde(default)]
    pub results: Vec<Row>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Rows collected by a paginated listing.
///
/// When a page request fails, the rows from earlier pages are kept and the
/// failure is recorded in `interruption`.
#[derive(Debug)]
pub struct RowListing {
    pub rows: Vec<Row>,
    pub interruption: Option<NotionError>,
}

impl RowListing {
    pub fn is_complete(&self) -> bool {
        self.interruption.is_none()
    }

    /// Discard partial rows and surface the failure, if any
    pub fn into_result(self) -> Result<Vec<Row>, NotionError> {
        match self.interruption {
            Some(e) => Err(e),
            None => Ok(self.rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_query_should_omit_unset_fields() {
        let body = serde_json::to_value(RowQuery::new()).unwrap();
        assert_eq!(body, json!({ "page_size": 100 }));
    }

    #[test]
    fn row_query_should_clamp_page_size() {
        assert_eq!(RowQuery::new().with_page_size(0).page_size, 1);
        assert_eq!(RowQuery::new().with_page_size(250).page_size, 100);
        assert_eq!(RowQuery::new().with_page_size(25).page_size, 25);
    }

    #[test]
    fn row_query_should_serialize_filter_sorts_and_cursor() {
        let query = RowQuery::new()
            .with_filter(json!({ "property": "Status", "select": { "equals": "Applied" } }))
            .with_sorts(vec![json!({ "timestamp": "created_time", "direction": "descending" })])
            .with_start_cursor("abc");
        let body = serde_json::to_value(query).unwrap();
        assert_eq!(body["start_cursor"], "abc");
        assert_eq!(body["filter"]["property"], "Status");
        assert_eq!(body["sorts"][0]["direction"], "descending");
    }

    #[test]
    fn row_should_keep_unknown_fields() {
        let raw = json!({
            "object": "page",
            "id": "row-1",
            "archived": false,
            "url": "https://www.notion.so/row-1",
            "properties": { "Name": { "type": "title", "title": [] } }
        });
        let row: Row = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(row.id, "row-1");
        assert!(row.property("Name").is_some());
        assert_eq!(serde_json::to_value(&row).unwrap(), raw);
    }

    #[test]
    fn schema_should_report_option_names_in_order() {
        let schema: DatabaseSchema = serde_json::from_value(json!({
            "id": "db",
            "properties": {
                "Status": {
                    "name": "Status",
                    "type": "select",
                    "select": { "options": [ { "name": "B" }, { "name": "A" } ] }
                },
                "Name": { "name": "Name", "type": "title", "title": {} }
            }
        }))
        .unwrap();
        assert_eq!(schema.property_type("Status"), Some("select"));
        assert_eq!(schema.option_names("Status"), vec!["B", "A"]);
        assert!(schema.option_names("Name").is_empty());
        assert!(schema.option_names("Missing").is_empty());
    }

    #[test]
    fn listing_should_distinguish_complete_from_partial() {
        let complete = RowListing {
            rows: Vec::new(),
            interruption: None,
        };
        assert!(complete.is_complete());
        assert!(complete.into_result().is_ok());

        let partial = RowListing {
            rows: Vec::new(),
            interruption: Some(NotionError::NoValidUpdates),
        };
        assert!(!partial.is_complete());
        assert!(partial.into_result().is_err());
    }
}
