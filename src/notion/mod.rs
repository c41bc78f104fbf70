//! # Notion Database Client
//!
//! Row and schema operations against the hosted database's REST API.
//!
//! ```text
//! NotionClient ──▶ POST  databases/{id}/query   (paginated listing)
//!              ──▶ GET   pages/{id}             (single row)
//!              ──▶ POST  pages                  (create row)
//!              ──▶ PATCH pages/{id}             (update / archive row)
//!              ──▶ GET   databases/{id}         (schema, saved to disk)
//!              ──▶ PATCH databases/{id}         (merged schema changes)
//! ```

pub mod client;
pub mod error;
pub mod model;
pub mod schema;

pub use client::{
    save_schema, ConnectionSettings, NotionClient, SchemaUpdateOutcome, DEFAULT_API_URL,
    DEFAULT_NOTION_VERSION,
};
pub use error::NotionError;
pub use model::{DatabaseSchema, Row, RowListing, RowQuery, MAX_PAGE_SIZE};
pub use schema::{
    merge_schema_update, ChoiceKind, MergedSchema, PropertyChange, SchemaUpdate, SelectOption,
    SkipReason, SkippedChange,
};
