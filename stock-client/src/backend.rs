//! Backend seam
//!
//! Every remote call the client makes goes through [`StockBackend`]. The HTTP
//! implementation is [`crate::RestClient`]; tests substitute an in-memory one.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{
    CatalogItem, ItemCreate, ItemRef, ReportLineRow, ReportSubmission, ReportUpdate, Tag,
};

use crate::error::ClientResult;

/// Remote procedures and table reads of the inventory backend
#[async_trait]
pub trait StockBackend: Send + Sync {
    /// `record_stock_report_multi`: commit a new batch
    async fn record_report(&self, submission: &ReportSubmission) -> ClientResult<()>;

    /// `update_stock_report_batch`: replace a committed batch's lines
    async fn update_report(&self, update: &ReportUpdate) -> ClientResult<()>;

    /// `delete_stock_report_batch`: delete a batch; the backend reverses its
    /// stock effect
    async fn delete_report(&self, report_id: &str) -> ClientResult<()>;

    /// `reports_between_multi`: committed line rows in `[from, to]`
    async fn reports_between(&self, from: NaiveDate, to: NaiveDate)
    -> ClientResult<Vec<ReportLineRow>>;

    /// Full catalog (`items_view`), ordered by name
    async fn list_items(&self) -> ClientResult<Vec<CatalogItem>>;

    /// `{id, name}` pairs (`items`), ordered by name
    async fn list_item_refs(&self) -> ClientResult<Vec<ItemRef>>;

    /// All tags, ordered by name
    async fn list_tags(&self) -> ClientResult<Vec<Tag>>;

    /// `add_item_with_tags`: returns the new item's id
    async fn add_item(&self, item: &ItemCreate) -> ClientResult<String>;
}
