//! Shared types for the stock reporting client
//!
//! Wire types for the inventory backend (items, tags, profiles, stock
//! reports), auth DTOs, error envelopes, and lenient parsing of raw form
//! input.

pub mod client;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
pub use models::{
    CatalogItem, ItemCreate, ItemRef, LineRecord, Profile, ReportDelete, ReportLineInput,
    ReportLineRow, ReportRangeQuery, ReportRecord, ReportSubmission, ReportUpdate, Role, Tag,
};
