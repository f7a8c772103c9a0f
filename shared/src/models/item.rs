//! Item Model

use serde::{Deserialize, Deserializer, Serialize};

/// Catalog item as exposed by the `items_view` view.
///
/// `is_low` is computed server-side (`current_stock <= low_stock_threshold`)
/// and consumed as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub low_stock_threshold: i64,
    /// Tag names; `null` when the item has no tags
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_low: bool,
}

/// Read an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

impl CatalogItem {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn as_ref_pair(&self) -> ItemRef {
        ItemRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Minimal `{id, name}` projection used by the item picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
    pub name: String,
}

impl ItemRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Create item payload (`add_item_with_tags` parameters)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCreate {
    #[serde(rename = "p_name")]
    pub name: String,
    #[serde(rename = "p_sku")]
    pub sku: Option<String>,
    #[serde(rename = "p_initial_stock")]
    pub initial_stock: i64,
    #[serde(rename = "p_low_stock_threshold")]
    pub low_stock_threshold: i64,
    /// Comma-separated tag names
    #[serde(rename = "p_tags_csv")]
    pub tags_csv: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_row_with_null_columns() {
        let raw = r#"[{"id":"i1","name":"Widget","sku":null,"current_stock":3,
            "low_stock_threshold":5,"tags":null,"is_low":true},
            {"id":"i2","name":"Gadget","sku":"G-1","current_stock":null,
            "low_stock_threshold":null,"tags":["gift"],"is_low":null}]"#;
        let items: Vec<CatalogItem> = serde_json::from_str(raw).unwrap();

        assert!(items[0].tags.is_empty());
        assert_eq!(items[0].current_stock, 3);
        assert!(items[0].is_low);
        assert_eq!(items[1].current_stock, 0);
        assert_eq!(items[1].low_stock_threshold, 0);
        assert!(!items[1].is_low);
        assert!(items[1].has_tag("gift"));
    }

    #[test]
    fn test_catalog_row_with_missing_columns() {
        let item: CatalogItem = serde_json::from_str(r#"{"id":"i3","name":"Soap"}"#).unwrap();
        assert_eq!(item.sku, None);
        assert!(item.tags.is_empty());
        assert!(!item.is_low);
    }
}
