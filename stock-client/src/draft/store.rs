//! Draft Report Store
//!
//! Holds the single in-progress report. Every screen that contributes to the
//! draft gets a clone of the same [`ReportStore`] handle, so a line added from
//! the catalog is visible where the report is finished. All operations are
//! total: out-of-range indices and duplicate adds are no-ops, nothing panics.

use std::sync::Arc;

use parking_lot::RwLock;
use shared::{ItemRef, ReportRecord};

/// Default value of a freshly added count field
pub const DEFAULT_COUNT: &str = "0";

/// One `(item, start, end)` entry of a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// Committed line this entry edits, when the draft came from a saved report
    pub line_id: Option<String>,
    /// `None` until the user picks an item
    pub item_id: Option<String>,
    /// Cached display name
    pub item_name: Option<String>,
    /// Raw start-count input
    pub start_count: String,
    /// Raw end-count input
    pub end_count: String,
}

impl LineItem {
    /// Line for `item_id` with both counts at zero
    pub fn for_item(item_id: impl Into<String>) -> Self {
        Self {
            item_id: Some(item_id.into()),
            ..Self::blank()
        }
    }

    /// Line with no item selected yet
    pub fn blank() -> Self {
        Self {
            line_id: None,
            item_id: None,
            item_name: None,
            start_count: DEFAULT_COUNT.to_string(),
            end_count: DEFAULT_COUNT.to_string(),
        }
    }

    /// Set both raw counts
    pub fn with_counts(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_count = start.into();
        self.end_count = end.into();
        self
    }

    /// Cache a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.item_name = Some(name.into());
        self
    }

    /// Merge the fields set in `patch`, leaving the rest untouched
    pub fn apply(&mut self, patch: LinePatch) {
        if let Some(item_id) = patch.item_id {
            self.item_id = Some(item_id);
        }
        if let Some(item_name) = patch.item_name {
            self.item_name = Some(item_name);
        }
        if let Some(start) = patch.start_count {
            self.start_count = start;
        }
        if let Some(end) = patch.end_count {
            self.end_count = end;
        }
    }
}

/// Partial update of a [`LineItem`]; unset fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinePatch {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub start_count: Option<String>,
    pub end_count: Option<String>,
}

impl LinePatch {
    /// Select an item from the catalog (id plus display name)
    pub fn select_item(item: &ItemRef) -> Self {
        Self {
            item_id: Some(item.id.clone()),
            item_name: Some(item.name.clone()),
            ..Self::default()
        }
    }

    pub fn start(value: impl Into<String>) -> Self {
        Self {
            start_count: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn end(value: impl Into<String>) -> Self {
        Self {
            end_count: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn item(item_id: impl Into<String>) -> Self {
        Self {
            item_id: Some(item_id.into()),
            ..Self::default()
        }
    }
}

/// Uncommitted report: ordered lines plus free-text note and revenue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftReport {
    pub lines: Vec<LineItem>,
    pub note: String,
    /// Raw revenue input; empty means "no revenue"
    pub total_revenue: String,
}

impl DraftReport {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.lines
            .iter()
            .any(|l| l.item_id.as_deref() == Some(item_id))
    }

    /// Append a line for `item_id` unless one already exists.
    ///
    /// Returns `true` when a line was added.
    pub fn add_item(&mut self, item_id: &str) -> bool {
        if self.has_item(item_id) {
            return false;
        }
        self.lines.push(LineItem::for_item(item_id));
        true
    }

    pub fn add_blank_line(&mut self) {
        self.lines.push(LineItem::blank());
    }

    /// Remove the line at `index`; out of range is a no-op.
    ///
    /// Returns the removed line.
    pub fn remove_line(&mut self, index: usize) -> Option<LineItem> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    /// Merge `patch` into the line at `index`; out of range is a no-op.
    ///
    /// Does not check for duplicate items: only `add_item` refuses them.
    pub fn patch_line(&mut self, index: usize, patch: LinePatch) -> bool {
        match self.lines.get_mut(index) {
            Some(line) => {
                line.apply(patch);
                true
            }
            None => false,
        }
    }

    /// `{id, name}` of every line that has an item, in line order.
    ///
    /// Names come from `catalog`; an id missing from it is shown as itself.
    pub fn current_items(&self, catalog: Option<&[ItemRef]>) -> Vec<ItemRef> {
        self.lines
            .iter()
            .filter_map(|l| l.item_id.as_deref())
            .map(|id| {
                let name = catalog
                    .and_then(|items| items.iter().find(|i| i.id == id))
                    .map(|i| i.name.clone())
                    .unwrap_or_else(|| id.to_string());
                ItemRef::new(id, name)
            })
            .collect()
    }

    /// Editable draft seeded from a committed report
    pub fn from_record(record: &ReportRecord) -> Self {
        let lines = record
            .lines
            .iter()
            .map(|l| LineItem {
                line_id: Some(l.line_id.clone()),
                item_id: Some(l.item_id.clone()),
                item_name: Some(l.item_name.clone()),
                start_count: l.start_stock.to_string(),
                end_count: l.end_stock.to_string(),
            })
            .collect();
        Self {
            lines,
            note: record.note.clone().unwrap_or_default(),
            total_revenue: record
                .total_revenue
                .map(|r| r.normalize().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Shared handle to the process-wide draft.
///
/// Cloning yields another handle to the same draft. Writers are serialised by
/// the lock; each call applies one whole operation.
#[derive(Debug, Clone, Default)]
pub struct ReportStore {
    inner: Arc<RwLock<DraftReport>>,
}

impl ReportStore {
    /// Empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Owned copy of the current draft
    pub fn snapshot(&self) -> DraftReport {
        self.inner.read().clone()
    }

    /// Run `f` against the current draft without copying it
    pub fn read<R>(&self, f: impl FnOnce(&DraftReport) -> R) -> R {
        f(&self.inner.read())
    }

    /// Add a line for `item_id`; a second add of the same item does nothing.
    pub fn add_item(&self, item_id: &str) -> bool {
        let added = self.inner.write().add_item(item_id);
        if added {
            tracing::debug!(item_id = %item_id, "Item added to draft");
        }
        added
    }

    pub fn add_blank_line(&self) {
        self.inner.write().add_blank_line();
    }

    pub fn remove_line(&self, index: usize) -> Option<LineItem> {
        self.inner.write().remove_line(index)
    }

    pub fn patch_line(&self, index: usize, patch: LinePatch) -> bool {
        self.inner.write().patch_line(index, patch)
    }

    /// Replace the whole line set
    pub fn replace_lines(&self, lines: Vec<LineItem>) {
        self.inner.write().lines = lines;
    }

    pub fn set_note(&self, note: impl Into<String>) {
        self.inner.write().note = note.into();
    }

    pub fn set_total_revenue(&self, revenue: impl Into<String>) {
        self.inner.write().total_revenue = revenue.into();
    }

    /// Reset to an empty draft
    pub fn clear(&self) {
        *self.inner.write() = DraftReport::default();
        tracing::debug!("Draft cleared");
    }

    pub fn has_item(&self, item_id: &str) -> bool {
        self.inner.read().has_item(item_id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// See [`DraftReport::current_items`]
    pub fn current_items(&self, catalog: Option<&[ItemRef]>) -> Vec<ItemRef> {
        self.inner.read().current_items(catalog)
    }
}
