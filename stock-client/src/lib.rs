//! Stock Client - inventory stock-report client core
//!
//! Draft report store, report composition, the submission gateway, and the
//! history and catalog view-models, over a REST backend.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod draft;
pub mod error;
pub mod gateway;
pub mod history;
pub mod http;
pub mod views;

pub use backend::StockBackend;
pub use catalog::{CatalogFilter, CatalogService, ItemForm};
pub use config::ClientConfig;
pub use draft::{ComposedReport, DraftReport, LineItem, LinePatch, ReportStore};
pub use error::{ClientError, ClientResult};
pub use gateway::ReportGateway;
pub use history::{DateRange, ItemAggregate, ReportHistory};
pub use http::RestClient;
pub use views::{StaleViews, ViewKey};

// Re-export shared types for convenience
pub use shared::client::{AuthSession, AuthUser, PasswordCredentials, SignUpResponse};
pub use shared::{CatalogItem, ItemRef, Profile, ReportLineRow, ReportRecord, Role, Tag};
