//! Demonstration routine run from the menu: dump every row of the configured
//! database and its schema into whatever writer it is given.

use crate::notion::{NotionClient, NotionError, RowQuery};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// List all rows and fetch the schema, writing results and diagnostics to `out`.
///
/// Service failures are written as diagnostics; only errors from `out`
/// itself end the routine early.
pub async fn run_demo<W: Write>(
    client: &NotionClient,
    database_id: &str,
    schema_path: &Path,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Getting all rows from the database...")?;
    let listing = client.list_rows(database_id, &RowQuery::new()).await;
    writeln!(out, "{}", to_pretty_json(&listing.rows)?)?;
    if let Some(e) = &listing.interruption {
        report_failure(out, "Failed to query database", e)?;
        writeln!(
            out,
            "Only {} rows were fetched before the failure.",
            listing.rows.len()
        )?;
    }

    writeln!(out, "\nGetting the database schema...")?;
    match client.get_schema(database_id, schema_path).await {
        Ok(schema) => {
            writeln!(out, "{}", to_pretty_json(&schema)?)?;
            writeln!(out, "Database schema saved to {}", schema_path.display())?;
        }
        Err(e) => report_failure(out, "Failed to retrieve database schema", &e)?,
    }

    out.flush()
}

/// Write `context: <status>` and the response body, or the error itself
/// when there was no response.
pub fn report_failure<W: Write>(out: &mut W, context: &str, error: &NotionError) -> io::Result<()> {
    match error.status() {
        Some(status) => {
            writeln!(out, "{context}: {status}")?;
            if let Some(body) = error.body() {
                writeln!(out, "{body}")?;
            }
            Ok(())
        }
        None => writeln!(out, "{context}: {error}"),
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> io::Result<String> {
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}
