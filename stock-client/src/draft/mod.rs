//! Draft report: the shared store and the derived view of it.

pub mod composer;
mod store;

pub use composer::{ComposedLine, ComposedReport, display_name, line_sold, total_sold};
pub use store::{DEFAULT_COUNT, DraftReport, LineItem, LinePatch, ReportStore};
