// stock-client/tests/support/mod.rs
// In-memory backend for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use tokio::sync::Notify;

use shared::{
    CatalogItem, ItemCreate, ItemRef, ReportLineRow, ReportSubmission, ReportUpdate, Tag,
};
use stock_client::{ClientError, ClientResult, StockBackend};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Record(ReportSubmission),
    Update(ReportUpdate),
    Delete(String),
    Range(NaiveDate, NaiveDate),
    ListItems,
    ListItemRefs,
    ListTags,
    AddItem(ItemCreate),
}

/// Holds a remote call open until released
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<(Option<String>, String)>>,
    gate: Mutex<Option<Arc<Gate>>>,
    rows: Mutex<Vec<ReportLineRow>>,
    items: Mutex<Vec<CatalogItem>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every following call fails with a remote error
    pub fn fail_with(&self, code: Option<&str>, message: &str) {
        *self.failure.lock() = Some((code.map(str::to_string), message.to_string()));
    }

    pub fn succeed(&self) {
        *self.failure.lock() = None;
    }

    /// Make the next remote write wait for `Gate::release`
    pub fn hold(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate {
            entered: Notify::new(),
            release: Notify::new(),
        });
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    pub fn set_rows(&self, rows: Vec<ReportLineRow>) {
        *self.rows.lock() = rows;
    }

    pub fn set_items(&self, items: Vec<CatalogItem>) {
        *self.items.lock() = items;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) -> ClientResult<()> {
        self.calls.lock().push(call);
        match self.failure.lock().clone() {
            Some((code, message)) => Err(ClientError::remote(code, message)),
            None => Ok(()),
        }
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }
}

#[async_trait]
impl StockBackend for FakeBackend {
    async fn record_report(&self, submission: &ReportSubmission) -> ClientResult<()> {
        self.pass_gate().await;
        self.record(Call::Record(submission.clone()))
    }

    async fn update_report(&self, update: &ReportUpdate) -> ClientResult<()> {
        self.pass_gate().await;
        self.record(Call::Update(update.clone()))
    }

    async fn delete_report(&self, report_id: &str) -> ClientResult<()> {
        self.pass_gate().await;
        self.record(Call::Delete(report_id.to_string()))
    }

    async fn reports_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ClientResult<Vec<ReportLineRow>> {
        self.record(Call::Range(from, to))?;
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|r| {
                let day = r.created_at.date_naive();
                from <= day && day <= to
            })
            .cloned()
            .collect())
    }

    async fn list_items(&self) -> ClientResult<Vec<CatalogItem>> {
        self.record(Call::ListItems)?;
        Ok(self.items.lock().clone())
    }

    async fn list_item_refs(&self) -> ClientResult<Vec<ItemRef>> {
        self.record(Call::ListItemRefs)?;
        Ok(self.items.lock().iter().map(CatalogItem::as_ref_pair).collect())
    }

    async fn list_tags(&self) -> ClientResult<Vec<Tag>> {
        self.record(Call::ListTags)?;
        Ok(Vec::new())
    }

    async fn add_item(&self, item: &ItemCreate) -> ClientResult<String> {
        self.record(Call::AddItem(item.clone()))?;
        let id = format!("item-{}", self.items.lock().len() + 1);
        self.items.lock().push(CatalogItem {
            id: id.clone(),
            name: item.name.clone(),
            sku: item.sku.clone(),
            current_stock: item.initial_stock,
            low_stock_threshold: item.low_stock_threshold,
            tags: item
                .tags_csv
                .as_deref()
                .map(|csv| csv.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
            is_low: item.initial_stock <= item.low_stock_threshold,
        });
        Ok(id)
    }
}

pub fn row(
    report_id: &str,
    item_id: &str,
    item_name: &str,
    start: i64,
    end: i64,
    at: (i32, u32, u32, u32),
) -> ReportLineRow {
    let (y, m, d, h) = at;
    ReportLineRow {
        report_id: report_id.into(),
        line_id: format!("{}-{}", report_id, item_id),
        item_id: item_id.into(),
        item_name: item_name.into(),
        start_stock: start,
        end_stock: end,
        sold: (start - end).max(0),
        note: None,
        total_revenue: None,
        created_at: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
    }
}
