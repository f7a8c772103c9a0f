//! Stock Report Model
//!
//! A stock report is a batch of lines, each recording the start and end
//! count of one item. Reports are committed through stored procedures and
//! read back as flat line rows.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of a submitted batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLineInput {
    pub item_id: String,
    pub start_stock: i64,
    pub end_stock: i64,
}

/// Record a new multi-line report (`record_stock_report_multi` parameters)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSubmission {
    #[serde(rename = "p_note")]
    pub note: Option<String>,
    #[serde(rename = "p_total_revenue")]
    pub total_revenue: Option<Decimal>,
    #[serde(rename = "p_lines")]
    pub lines: Vec<ReportLineInput>,
}

/// Replace the lines of a committed report (`update_stock_report_batch` parameters)
///
/// Carries the full replacement line set, not a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportUpdate {
    #[serde(rename = "p_report_id")]
    pub report_id: String,
    #[serde(rename = "p_note")]
    pub note: Option<String>,
    #[serde(rename = "p_total_revenue")]
    pub total_revenue: Option<Decimal>,
    #[serde(rename = "p_lines")]
    pub lines: Vec<ReportLineInput>,
}

/// Delete a committed report (`delete_stock_report_batch` parameters)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDelete {
    #[serde(rename = "p_report_id")]
    pub report_id: String,
}

/// Range query (`reports_between_multi` parameters), dates as `YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRangeQuery {
    #[serde(rename = "p_from", with = "ymd")]
    pub from: NaiveDate,
    #[serde(rename = "p_to", with = "ymd")]
    pub to: NaiveDate,
}

/// Flat row returned by the range query: one committed line plus the
/// report-level fields repeated on every row of the same report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLineRow {
    pub report_id: String,
    pub line_id: String,
    pub item_id: String,
    pub item_name: String,
    pub start_stock: i64,
    pub end_stock: i64,
    pub sold: i64,
    pub note: Option<String>,
    pub total_revenue: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Committed line inside a [`ReportRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub line_id: String,
    pub item_id: String,
    pub item_name: String,
    pub start_stock: i64,
    pub end_stock: i64,
    pub sold: i64,
}

impl From<&ReportLineRow> for LineRecord {
    fn from(row: &ReportLineRow) -> Self {
        Self {
            line_id: row.line_id.clone(),
            item_id: row.item_id.clone(),
            item_name: row.item_name.clone(),
            start_stock: row.start_stock,
            end_stock: row.end_stock,
            sold: row.sold,
        }
    }
}

/// One committed batch. Server-owned; the client only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub report_id: String,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
    pub total_revenue: Option<Decimal>,
    pub lines: Vec<LineRecord>,
}

impl ReportRecord {
    /// Sum of `sold` over this report's lines
    pub fn total_sold(&self) -> i64 {
        self.lines.iter().map(|l| l.sold).fold(0, i64::saturating_add)
    }

    /// Title shown for the report: its note, or "Report" when there is none
    pub fn title(&self) -> &str {
        match self.note.as_deref() {
            Some(note) if !note.is_empty() => note,
            _ => "Report",
        }
    }
}

/// Serde adapter for `YYYY-MM-DD` calendar dates
pub mod ymd {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
