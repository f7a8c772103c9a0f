//! Tag Model

use serde::{Deserialize, Serialize};

/// Tag entity (free-form item label, e.g. "bestseller")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}
