//! Report Composer
//!
//! Pure derivations over a draft for display: sold per line, the running
//! total, and the name to show for each line.

use shared::ItemRef;
use shared::util::{parse_count, sold};

use super::store::{DraftReport, LineItem};

/// Placeholder shown for a line with no item selected
pub const SELECT_ITEM_LABEL: &str = "Select item";

/// Units sold on one line; unparseable counts read as 0
pub fn line_sold(line: &LineItem) -> i64 {
    sold(parse_count(&line.start_count), parse_count(&line.end_count))
}

/// Sum of [`line_sold`] over all lines, saturating at `i64::MAX`
pub fn total_sold(lines: &[LineItem]) -> i64 {
    lines.iter().map(line_sold).fold(0, i64::saturating_add)
}

/// Name to show for a line: cached name, else catalog lookup, else the raw
/// id, else the picker placeholder.
pub fn display_name(line: &LineItem, catalog: &[ItemRef]) -> String {
    if let Some(name) = &line.item_name {
        return name.clone();
    }
    match &line.item_id {
        Some(id) => catalog
            .iter()
            .find(|i| &i.id == id)
            .map(|i| i.name.clone())
            .unwrap_or_else(|| id.clone()),
        None => SELECT_ITEM_LABEL.to_string(),
    }
}

/// One line ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedLine {
    pub index: usize,
    pub item_id: Option<String>,
    pub name: String,
    pub start_count: String,
    pub end_count: String,
    pub sold: i64,
}

/// Everything the report form shows, derived from one draft snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedReport {
    pub lines: Vec<ComposedLine>,
    pub total_sold: i64,
    pub note: String,
    pub total_revenue: String,
}

impl ComposedReport {
    pub fn compose(draft: &DraftReport, catalog: &[ItemRef]) -> Self {
        let lines = draft
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| ComposedLine {
                index,
                item_id: line.item_id.clone(),
                name: display_name(line, catalog),
                start_count: line.start_count.clone(),
                end_count: line.end_count.clone(),
                sold: line_sold(line),
            })
            .collect::<Vec<_>>();
        let total_sold = lines.iter().map(|l| l.sold).fold(0, i64::saturating_add);
        Self {
            lines,
            total_sold,
            note: draft.note.clone(),
            total_revenue: draft.total_revenue.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
