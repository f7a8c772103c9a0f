//! Catalog view-model
//!
//! Filtering of the item list, the low-stock list, picker search, and the
//! create-item form.

use std::sync::Arc;

use shared::util::{non_empty, parse_count};
use shared::{CatalogItem, ItemCreate, ItemRef};

use crate::backend::StockBackend;
use crate::error::{ClientError, ClientResult};
use crate::views::{StaleViews, ViewKey};

/// Text and tag filter over the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub query: String,
    pub tag: Option<String>,
}

impl CatalogFilter {
    /// Select `tag`, or clear the selection if it is already active
    pub fn toggle_tag(&mut self, tag: &str) {
        if self.tag.as_deref() == Some(tag) {
            self.tag = None;
        } else {
            self.tag = Some(tag.to_string());
        }
    }

    /// Case-insensitive name/SKU match, restricted to the active tag
    pub fn matches(&self, item: &CatalogItem) -> bool {
        let q = self.query.trim().to_lowercase();
        let text_ok = q.is_empty()
            || item.name.to_lowercase().contains(&q)
            || item
                .sku
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&q);
        let tag_ok = self.tag.as_deref().is_none_or(|t| item.has_tag(t));
        text_ok && tag_ok
    }

    pub fn apply<'a>(&self, items: &'a [CatalogItem]) -> Vec<&'a CatalogItem> {
        items.iter().filter(|i| self.matches(i)).collect()
    }
}

/// Items flagged low, fewest in stock first
pub fn low_stock(items: &[CatalogItem]) -> Vec<&CatalogItem> {
    let mut low: Vec<_> = items.iter().filter(|i| i.is_low).collect();
    low.sort_by_key(|i| i.current_stock);
    low
}

/// Item picker search by name
pub fn search_refs<'a>(refs: &'a [ItemRef], query: &str) -> Vec<&'a ItemRef> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return refs.iter().collect();
    }
    refs.iter()
        .filter(|r| r.name.to_lowercase().contains(&q))
        .collect()
}

/// Create-item form state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub sku: String,
    pub initial_stock: String,
    pub low_stock_threshold: String,
    pub tags: Vec<String>,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            sku: String::new(),
            initial_stock: "0".to_string(),
            low_stock_threshold: "5".to_string(),
            tags: Vec::new(),
        }
    }
}

impl ItemForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a trimmed tag; blank and duplicate tags are ignored
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.tags.retain(|t| t != tag);
    }

    /// Request for `add_item_with_tags`; a blank name is rejected
    pub fn to_request(&self) -> ClientResult<ItemCreate> {
        if self.name.trim().is_empty() {
            return Err(ClientError::Validation("Item name is required".into()));
        }
        Ok(ItemCreate {
            name: self.name.clone(),
            sku: non_empty(&self.sku),
            initial_stock: parse_count(&self.initial_stock),
            low_stock_threshold: parse_count(&self.low_stock_threshold),
            tags_csv: non_empty(&self.tags.join(",")),
        })
    }
}

/// Catalog reads and item creation
pub struct CatalogService<B: StockBackend> {
    backend: Arc<B>,
    views: StaleViews,
}

impl<B: StockBackend> Clone for CatalogService<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            views: self.views.clone(),
        }
    }
}

impl<B: StockBackend> CatalogService<B> {
    pub fn new(backend: Arc<B>, views: StaleViews) -> Self {
        Self { backend, views }
    }

    pub async fn items(&self) -> ClientResult<Vec<CatalogItem>> {
        self.backend.list_items().await
    }

    pub async fn item_refs(&self) -> ClientResult<Vec<ItemRef>> {
        self.backend.list_item_refs().await
    }

    pub async fn tags(&self) -> ClientResult<Vec<shared::Tag>> {
        self.backend.list_tags().await
    }

    /// Create an item from the form; the item lists go stale on success
    pub async fn create_item(&self, form: &ItemForm) -> ClientResult<String> {
        let request = form.to_request()?;
        let id = self.backend.add_item(&request).await?;
        self.views.invalidate(&ViewKey::AFTER_ITEM_CHANGE);
        tracing::info!(item_id = %id, name = %request.name, "Item created");
        Ok(id)
    }
}
