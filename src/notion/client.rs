//! # Notion Client
//!
//! Typed operations over the hosted database's REST endpoints. Requests are
//! issued one at a time and never retried.

use super::error::{NotionError, Result};
use super::model::{DatabaseSchema, QueryPage, Row, RowListing, RowQuery};
use super::schema::{merge_schema_update, SchemaUpdate, SkippedChange};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::path::Path;

/// Default API base
pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";

/// API version sent with every request
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

const NOTION_VERSION_HEADER: &str = "Notion-Version";

/// Connection settings for [`NotionClient`]
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub api_url: String,
    pub api_key: String,
    pub notion_version: String,
}

impl ConnectionSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_notion_version(mut self, version: impl Into<String>) -> Self {
        self.notion_version = version.into();
        self
    }
}

/// Outcome of a successful schema update
#[derive(Debug)]
pub struct SchemaUpdateOutcome {
    /// Database object returned by the PATCH
    pub database: DatabaseSchema,
    /// Requested changes that were not applied
    pub skipped: Vec<SkippedChange>,
}

#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
}

impl NotionClient {
    pub fn new(settings: &ConnectionSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
            .map_err(|_| NotionError::InvalidHeader("Authorization"))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            NOTION_VERSION_HEADER,
            HeaderValue::from_str(&settings.notion_version)
                .map_err(|_| NotionError::InvalidHeader(NOTION_VERSION_HEADER))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        tracing::debug!("NotionClient created for {}", settings.api_url);
        Ok(Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Send a request and decode a success body, or capture status and body.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(NotionError::Http {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// List every row matching `query`, following page cursors.
    ///
    /// A failing page ends the listing; rows from earlier pages are kept.
    pub async fn list_rows(&self, database_id: &str, query: &RowQuery) -> RowListing {
        let path = format!("databases/{database_id}/query");
        let mut rows = Vec::new();
        let mut cursor = query.start_cursor.clone();

        loop {
            let mut page_query = query.clone();
            page_query.start_cursor = cursor.take();
            let body = match serde_json::to_value(&page_query) {
                Ok(body) => body,
                Err(e) => {
                    return RowListing {
                        rows,
                        interruption: Some(e.into()),
                    }
                }
            };

            let page: QueryPage = match self.send(Method::POST, &path, Some(&body)).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        "Failed to query database {}: {} ({} rows kept)",
                        database_id,
                        e,
                        rows.len()
                    );
                    return RowListing {
                        rows,
                        interruption: Some(e),
                    };
                }
            };

            tracing::debug!(
                "Fetched {} rows, has_more={}",
                page.results.len(),
                page.has_more
            );
            rows.extend(page.results);

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        tracing::info!("Fetched {} rows from database {}", rows.len(), database_id);
        RowListing {
            rows,
            interruption: None,
        }
    }

    pub async fn get_row(&self, page_id: &str) -> Result<Row> {
        self.send(Method::GET, &format!("pages/{page_id}"), None)
            .await
            .inspect_err(|e| tracing::warn!("Failed to retrieve page {}: {}", page_id, e))
    }

    /// Create a row under `database_id` with the given property values
    pub async fn add_row(&self, database_id: &str, properties: Map<String, Value>) -> Result<Row> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });
        let row: Row = self
            .send(Method::POST, "pages", Some(&body))
            .await
            .inspect_err(|e| tracing::warn!("Failed to add row: {}", e))?;
        tracing::info!("Row {} added successfully", row.id);
        Ok(row)
    }

    /// Update only the named properties of a row
    pub async fn update_row(&self, page_id: &str, properties: Map<String, Value>) -> Result<Row> {
        let body = json!({ "properties": properties });
        let row: Row = self
            .send(Method::PATCH, &format!("pages/{page_id}"), Some(&body))
            .await
            .inspect_err(|e| tracing::warn!("Failed to update row {}: {}", page_id, e))?;
        tracing::info!("Row {} updated successfully", row.id);
        Ok(row)
    }

    /// Archive a row. The service has no hard delete.
    pub async fn delete_row(&self, page_id: &str) -> Result<()> {
        let body = json!({ "archived": true });
        let _: Value = self
            .send(Method::PATCH, &format!("pages/{page_id}"), Some(&body))
            .await
            .inspect_err(|e| tracing::warn!("Failed to archive row {}: {}", page_id, e))?;
        tracing::info!("Row {} archived successfully", page_id);
        Ok(())
    }

    /// Fetch the database object and save it as pretty JSON at `output_path`.
    pub async fn get_schema(&self, database_id: &str, output_path: &Path) -> Result<DatabaseSchema> {
        let schema: DatabaseSchema = self
            .send(Method::GET, &format!("databases/{database_id}"), None)
            .await
            .inspect_err(|e| {
                tracing::warn!("Failed to retrieve database schema {}: {}", database_id, e)
            })?;
        save_schema(&schema, output_path)?;
        tracing::info!("Database schema saved to {}", output_path.display());
        Ok(schema)
    }

    /// Merge `update` into the current schema and PATCH the changed properties.
    ///
    /// The schema snapshot at `output_path` is refreshed before and after.
    pub async fn update_schema(
        &self,
        database_id: &str,
        update: &SchemaUpdate,
        output_path: &Path,
    ) -> Result<SchemaUpdateOutcome> {
        let current = self
            .get_schema(database_id, output_path)
            .await
            .map_err(|e| NotionError::SchemaUnavailable(Box::new(e)))?;

        let merged = merge_schema_update(&current, update);
        for skipped in &merged.skipped {
            tracing::warn!("Skipping schema change: {}", skipped);
        }
        if merged.is_empty() {
            return Err(NotionError::NoValidUpdates);
        }

        let database: DatabaseSchema = self
            .send(
                Method::PATCH,
                &format!("databases/{database_id}"),
                Some(&merged.payload()),
            )
            .await
            .inspect_err(|e| tracing::warn!("Failed to update database schema: {}", e))?;
        tracing::info!("Database schema updated successfully");

        if let Err(e) = self.get_schema(database_id, output_path).await {
            tracing::warn!("Schema updated but the local copy was not refreshed: {}", e);
        }

        Ok(SchemaUpdateOutcome {
            database,
            skipped: merged.skipped,
        })
    }
}

/// Overwrite `path` with the schema as pretty JSON, creating parent directories.
pub fn save_schema(schema: &DatabaseSchema, path: &Path) -> Result<()> {
    let io_err = |source| NotionError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let text = serde_json::to_string_pretty(schema)?;
    std::fs::write(path, text).map_err(io_err)
}
