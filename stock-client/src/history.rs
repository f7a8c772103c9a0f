//! Report History view-model
//!
//! The range query returns one flat row per committed line. This module
//! groups those rows back into reports, totals them, aggregates sold
//! quantities per item, and renders the copy-to-clipboard texts.

use std::collections::HashMap;
use std::fmt::Display;

use chrono::{Datelike, Months, NaiveDate, TimeZone};
use shared::models::report::ymd;
use shared::{LineRecord, ReportLineRow, ReportRecord};

use crate::backend::StockBackend;
use crate::error::{ClientError, ClientResult};

/// Calendar date format used in copied texts (`Jan 05, 2024`)
pub const DATE_DISPLAY_FORMAT: &str = "%b %d, %Y";
/// Timestamp format used in copied texts (`Jan 05, 2024 • 2:30 PM`)
pub const DATETIME_DISPLAY_FORMAT: &str = "%b %d, %Y • %-I:%M %p";

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Parse `YYYY-MM-DD` bounds
    pub fn parse(from: &str, to: &str) -> ClientResult<Self> {
        let parse = |raw: &str| {
            NaiveDate::parse_from_str(raw.trim(), ymd::FORMAT).map_err(|_| {
                ClientError::Validation(format!("Invalid date {:?}, expected YYYY-MM-DD", raw))
            })
        };
        Ok(Self::new(parse(from)?, parse(to)?))
    }

    /// First through last day of the month containing `today`
    pub fn current_month(today: NaiveDate) -> Self {
        let from = today.with_day(1).unwrap_or(today);
        let to = from
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(today);
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Sold quantity of one item across the whole range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAggregate {
    pub item_id: String,
    pub name: String,
    pub sold: i64,
}

/// Reports committed within a date range, grouped and totalled
#[derive(Debug, Clone, PartialEq)]
pub struct ReportHistory {
    pub range: DateRange,
    /// Most recent first
    pub reports: Vec<ReportRecord>,
    pub total_sold: i64,
    /// Highest sold first; ties keep first-seen order
    pub per_item: Vec<ItemAggregate>,
}

impl ReportHistory {
    /// Fetch the range and group it
    pub async fn load<B>(backend: &B, range: DateRange) -> ClientResult<Self>
    where
        B: StockBackend + ?Sized,
    {
        let rows = backend.reports_between(range.from, range.to).await?;
        tracing::debug!(from = %range.from, to = %range.to, rows = rows.len(), "Loaded report rows");
        Ok(Self::from_rows(range, rows))
    }

    /// History with no reports, shown when loading fails
    pub fn empty(range: DateRange) -> Self {
        Self {
            range,
            reports: Vec::new(),
            total_sold: 0,
            per_item: Vec::new(),
        }
    }

    pub fn from_rows(range: DateRange, rows: Vec<ReportLineRow>) -> Self {
        let total_sold = rows.iter().map(|r| r.sold).fold(0, i64::saturating_add);
        let per_item = aggregate_items(&rows);
        let reports = group_rows(rows);
        Self {
            range,
            reports,
            total_sold,
            per_item,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn report(&self, report_id: &str) -> Option<&ReportRecord> {
        self.reports.iter().find(|r| r.report_id == report_id)
    }

    /// Copy text for the whole range
    pub fn aggregate_text(&self) -> String {
        aggregate_text(&self.range, self.total_sold, &self.per_item)
    }
}

/// Group flat rows by report.
///
/// Report-level fields come from the first row seen for each report. Reports
/// are ordered by creation time, newest first; equal timestamps keep
/// first-seen order.
pub fn group_rows(rows: Vec<ReportLineRow>) -> Vec<ReportRecord> {
    let mut reports: Vec<ReportRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let line = LineRecord::from(&row);
        match index.get(&row.report_id) {
            Some(&i) => reports[i].lines.push(line),
            None => {
                index.insert(row.report_id.clone(), reports.len());
                reports.push(ReportRecord {
                    report_id: row.report_id,
                    created_at: row.created_at,
                    note: row.note,
                    total_revenue: row.total_revenue,
                    lines: vec![line],
                });
            }
        }
    }

    reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    reports
}

/// Sold per item over all rows, highest first (stable on ties).
///
/// The item's name is taken from its first row.
pub fn aggregate_items(rows: &[ReportLineRow]) -> Vec<ItemAggregate> {
    let mut items: Vec<ItemAggregate> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        match index.get(row.item_id.as_str()) {
            Some(&i) => items[i].sold = items[i].sold.saturating_add(row.sold),
            None => {
                index.insert(&row.item_id, items.len());
                items.push(ItemAggregate {
                    item_id: row.item_id.clone(),
                    name: row.item_name.clone(),
                    sold: row.sold,
                });
            }
        }
    }

    items.sort_by(|a, b| b.sold.cmp(&a.sold));
    items
}

/// Copy text for one report, with its timestamp shown in `tz`
pub fn report_text<Tz>(report: &ReportRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let created = report
        .created_at
        .with_timezone(tz)
        .format(DATETIME_DISPLAY_FORMAT);

    let mut out = format!(
        "{}\n{}\nTotal stock sold: {}\n",
        report.title(),
        created,
        report.total_sold()
    );
    if let Some(revenue) = report.total_revenue {
        out.push_str(&format!("Total revenue: {}\n", revenue.normalize()));
    }
    out.push('\n');

    let lines = report
        .lines
        .iter()
        .map(|l| format!("{}: {}", l.item_name, l.sold))
        .collect::<Vec<_>>();
    out.push_str(&lines.join("\n"));
    out
}

/// Copy text for a range aggregate
pub fn aggregate_text(range: &DateRange, total_sold: i64, per_item: &[ItemAggregate]) -> String {
    let lines = per_item
        .iter()
        .map(|i| format!("{}: {}", i.name, i.sold))
        .collect::<Vec<_>>();
    format!(
        "Aggregated stock report between {} and {}\nTotal stock sold: {}\n\n{}",
        range.from.format(DATE_DISPLAY_FORMAT),
        range.to.format(DATE_DISPLAY_FORMAT),
        total_sold,
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    fn row(report: &str, item: &str, name: &str, sold: i64, created: &str) -> ReportLineRow {
        ReportLineRow {
            report_id: report.into(),
            line_id: format!("{}-{}", report, item),
            item_id: item.into(),
            item_name: name.into(),
            start_stock: sold + 1,
            end_stock: 1,
            sold,
            note: None,
            total_revenue: None,
            created_at: at(created),
        }
    }

    #[test]
    fn test_grouping_and_order() {
        let rows = vec![
            row("A", "w", "Widget", 3, "2024-01-10T09:00:00Z"),
            row("A", "g", "Gadget", 5, "2024-01-10T09:00:00Z"),
            row("B", "w", "Widget", 2, "2024-01-12T09:00:00Z"),
        ];
        let history = ReportHistory::from_rows(DateRange::new(date(2024, 1, 1), date(2024, 1, 31)), rows);

        assert_eq!(history.reports.len(), 2);
        assert_eq!(history.reports[0].report_id, "B");
        assert_eq!(history.reports[0].total_sold(), 2);
        assert_eq!(history.reports[1].report_id, "A");
        assert_eq!(history.reports[1].total_sold(), 8);
        assert_eq!(history.reports[1].lines.len(), 2);
        assert_eq!(history.total_sold, 10);
    }

    #[test]
    fn test_report_fields_from_first_row() {
        let mut first = row("A", "w", "Widget", 1, "2024-01-10T09:00:00Z");
        first.note = Some("Morning".into());
        first.total_revenue = Some(Decimal::new(50, 0));
        let mut second = row("A", "g", "Gadget", 1, "2024-01-10T09:00:00Z");
        second.note = Some("ignored".into());

        let reports = group_rows(vec![first, second]);
        assert_eq!(reports[0].note.as_deref(), Some("Morning"));
        assert_eq!(reports[0].total_revenue, Some(Decimal::new(50, 0)));
    }

    #[test]
    fn test_equal_timestamps_keep_first_seen_order() {
        let rows = vec![
            row("X", "a", "A", 1, "2024-01-10T09:00:00Z"),
            row("Y", "a", "A", 1, "2024-01-10T09:00:00Z"),
        ];
        let ids: Vec<_> = group_rows(rows).into_iter().map(|r| r.report_id).collect();
        assert_eq!(ids, vec!["X", "Y"]);
    }

    #[test]
    fn test_per_item_aggregate_is_stable_descending() {
        let rows = vec![
            row("A", "a", "Apples", 2, "2024-01-10T09:00:00Z"),
            row("A", "b", "Bananas", 5, "2024-01-10T09:00:00Z"),
            row("B", "c", "Cherries", 3, "2024-01-11T09:00:00Z"),
            row("B", "a", "Apples", 3, "2024-01-11T09:00:00Z"),
        ];
        let items = aggregate_items(&rows);
        let summary: Vec<_> = items.iter().map(|i| (i.name.as_str(), i.sold)).collect();
        assert_eq!(summary, vec![("Apples", 5), ("Bananas", 5), ("Cherries", 3)]);
    }

    #[test]
    fn test_aggregate_text_literal() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        let items = vec![
            ItemAggregate {
                item_id: "w".into(),
                name: "Widget".into(),
                sold: 10,
            },
            ItemAggregate {
                item_id: "g".into(),
                name: "Gadget".into(),
                sold: 4,
            },
        ];
        assert_eq!(
            aggregate_text(&range, 14, &items),
            "Aggregated stock report between Jan 01, 2024 and Jan 31, 2024\nTotal stock sold: 14\n\nWidget: 10\nGadget: 4"
        );
    }

    #[test]
    fn test_report_text_without_revenue() {
        let reports = group_rows(vec![
            row("A", "w", "Widget", 3, "2024-03-05T14:07:00Z"),
            row("A", "g", "Gadget", 5, "2024-03-05T14:07:00Z"),
        ]);
        assert_eq!(
            report_text(&reports[0], &Utc),
            "Report\nMar 05, 2024 • 2:07 PM\nTotal stock sold: 8\n\nWidget: 3\nGadget: 5"
        );
    }

    #[test]
    fn test_report_text_with_note_revenue_and_offset() {
        let mut r = row("A", "w", "Widget", 4, "2024-03-05T23:30:00Z");
        r.note = Some("Late shift".into());
        r.total_revenue = Some(Decimal::new(12050, 2));
        let reports = group_rows(vec![r]);

        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            report_text(&reports[0], &tz),
            "Late shift\nMar 06, 2024 • 1:30 AM\nTotal stock sold: 4\nTotal revenue: 120.5\n\nWidget: 4"
        );
    }

    #[test]
    fn test_current_month() {
        let range = DateRange::current_month(date(2024, 2, 14));
        assert_eq!(range, DateRange::new(date(2024, 2, 1), date(2024, 2, 29)));
        let range = DateRange::current_month(date(2023, 12, 31));
        assert_eq!(range, DateRange::new(date(2023, 12, 1), date(2023, 12, 31)));
        assert!(range.contains(date(2023, 12, 15)));
        assert!(!range.contains(date(2024, 1, 1)));
    }

    #[test]
    fn test_parse_range() {
        let range = DateRange::parse("2024-01-01", " 2024-01-31 ").unwrap();
        assert_eq!(range, DateRange::new(date(2024, 1, 1), date(2024, 1, 31)));
        assert!(matches!(
            DateRange::parse("01/01/2024", "2024-01-31"),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_totals_saturate_on_huge_rows() {
        let mut big = row("A", "w", "Widget", 0, "2024-01-10T09:00:00Z");
        big.sold = i64::MAX;
        let rows = vec![
            big,
            row("A", "g", "Gadget", 5, "2024-01-10T09:00:00Z"),
            row("B", "w", "Widget", 3, "2024-01-11T09:00:00Z"),
        ];
        let history = ReportHistory::from_rows(DateRange::new(date(2024, 1, 1), date(2024, 1, 31)), rows);

        assert_eq!(history.total_sold, i64::MAX);
        assert_eq!(history.report("A").unwrap().total_sold(), i64::MAX);
        assert_eq!(history.per_item[0].name, "Widget");
        assert_eq!(history.per_item[0].sold, i64::MAX);
    }

    #[test]
    fn test_empty_history() {
        let history = ReportHistory::empty(DateRange::current_month(date(2024, 5, 2)));
        assert!(history.is_empty());
        assert_eq!(history.total_sold, 0);
        assert_eq!(
            history.aggregate_text(),
            "Aggregated stock report between May 01, 2024 and May 31, 2024\nTotal stock sold: 0\n\n"
        );
    }
}
