//! Data models
//!
//! Wire types exchanged with the inventory backend. Table rows are read as
//! returned; procedure parameters carry the backend's `p_` prefixed names.

pub mod item;
pub mod profile;
pub mod report;
pub mod tag;

// Re-exports
pub use item::*;
pub use profile::*;
pub use report::*;
pub use tag::*;
