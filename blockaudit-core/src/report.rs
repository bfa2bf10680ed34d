//! Output formatting - CSV, plaintext and JSON.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::search::SearchMatch;
use crate::usage::AuditedPath;

pub const USAGE_HEADERS: [&str; 8] = [
    "Page Type",
    "Field",
    "Path",
    "Block",
    "Occurrences",
    "Pages",
    "Live",
    "In Default Site",
];

/// Search rows end with one column per match, so the last header spans a
/// variable number of columns.
pub const SEARCH_HEADERS: [&str; 10] = [
    "Page ID",
    "Page Type",
    "Page Title",
    "Page URL",
    "Field",
    "Field Type",
    "Stream Field Path",
    "Block Type",
    "Result Path",
    "Stream Field Matches",
];

/// One line of the block usage report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRow {
    pub page_type: String,
    pub field: String,
    pub path: String,
    pub block: String,
    pub occurrences: usize,
    pub pages: usize,
    pub live: usize,
    pub in_default_site: usize,
}

impl From<&AuditedPath> for UsageRow {
    fn from(audited: &AuditedPath) -> Self {
        Self {
            page_type: audited.page_type.clone(),
            field: audited.field.clone(),
            path: audited.path.clone(),
            block: audited.block_type.clone(),
            occurrences: audited.total_occurrences,
            pages: audited.pages_count,
            live: audited.pages_live_count,
            in_default_site: audited.pages_in_default_site_count,
        }
    }
}

impl UsageRow {
    fn record(&self) -> Vec<String> {
        vec![
            self.page_type.clone(),
            self.field.clone(),
            self.path.clone(),
            self.block.clone(),
            self.occurrences.to_string(),
            self.pages.to_string(),
            self.live.to_string(),
            self.in_default_site.to_string(),
        ]
    }
}

/// One line of the page search report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRow {
    pub page_id: u64,
    pub page_type: String,
    pub page_title: String,
    pub page_url: String,
    pub field: String,
    pub field_type: String,
    pub stream_field_path: String,
    pub block_type: String,
    pub result_path: String,
    pub matches: Vec<String>,
}

impl From<&SearchMatch> for SearchRow {
    fn from(found: &SearchMatch) -> Self {
        Self {
            page_id: found.page_id.0,
            page_type: found.page_type.clone(),
            page_title: found.page_title.clone(),
            page_url: found.page_url.clone().unwrap_or_default(),
            field: found.field_name.clone(),
            field_type: found.field_type.clone(),
            stream_field_path: found.schema_path_str(),
            block_type: found.block_type.clone().unwrap_or_default(),
            result_path: found.result_path_str(),
            matches: found.matches.clone(),
        }
    }
}

impl SearchRow {
    fn record(&self) -> Vec<String> {
        let mut record = vec![
            self.page_id.to_string(),
            self.page_type.clone(),
            self.page_title.clone(),
            self.page_url.clone(),
            self.field.clone(),
            self.field_type.clone(),
            self.stream_field_path.clone(),
            self.block_type.clone(),
            self.result_path.clone(),
        ];
        record.extend(self.matches.iter().cloned());
        record
    }
}

/// Writes the block usage report as CSV, header first.
pub fn write_usage_csv<W: Write>(writer: W, rows: &[UsageRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(USAGE_HEADERS)?;
    for row in rows {
        wtr.write_record(row.record())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the page search report as CSV, header first. Rows vary in width.
pub fn write_search_csv<W: Write>(writer: W, rows: &[SearchRow]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    wtr.write_record(SEARCH_HEADERS)?;
    for row in rows {
        wtr.write_record(row.record())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints block usage in plain text format.
pub fn print_usage_plain(rows: &[UsageRow]) {
    if rows.is_empty() {
        println!("No block usage found.");
        return;
    }
    println!("BLOCK USAGE ({}):", rows.len());
    for row in rows {
        println!(
            "- {}.{}: {} [{}] occurrences={} pages={} live={} default_site={}",
            row.page_type,
            row.field,
            row.path,
            row.block,
            row.occurrences,
            row.pages,
            row.live,
            row.in_default_site
        );
    }
}

/// Prints search matches in plain text format.
pub fn print_search_plain(rows: &[SearchRow]) {
    if rows.is_empty() {
        println!("No matches found.");
        return;
    }
    println!("MATCHES ({}):", rows.len());
    for row in rows {
        let location = if row.result_path.is_empty() {
            row.field.clone()
        } else {
            format!("{}/{}", row.field, row.result_path)
        };
        println!(
            "- page {} \"{}\" ({}) {}: {}",
            row.page_id,
            row.page_title,
            row.page_type,
            location,
            row.matches.join(", ")
        );
    }
}

/// Wraps report rows in a timestamped JSON document.
pub fn report_json<T: Serialize>(kind: &str, rows: &[T]) -> Value {
    json!({
        "report": kind,
        "generated_at": Utc::now().to_rfc3339(),
        "count": rows.len(),
        "rows": rows,
    })
}

/// Prints a JSON document.
///
/// Falls back to the compact form if pretty printing fails.
pub fn print_json(report: &Value) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!("{}", report);
        }
    }
}
