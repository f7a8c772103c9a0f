//! Submission Gateway
//!
//! Turns drafts into batch requests and reconciles local state afterwards:
//! on success the shared draft is cleared (new reports only) and dependent
//! views are marked stale; on failure nothing local changes, so the user can
//! fix the problem and resubmit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shared::util::{non_empty, parse_count, parse_revenue};
use shared::{ReportLineInput, ReportSubmission, ReportUpdate};

use crate::backend::StockBackend;
use crate::draft::{DraftReport, ReportStore};
use crate::error::{ClientError, ClientResult};
use crate::views::{StaleViews, ViewKey};

/// Validate a draft and convert its lines to the wire shape.
///
/// Fails with `EmptyReport` when there are no lines and with
/// `MissingItemSelection` when any line has no item.
pub fn build_lines(draft: &DraftReport) -> ClientResult<Vec<ReportLineInput>> {
    if draft.lines.is_empty() {
        return Err(ClientError::EmptyReport);
    }
    draft
        .lines
        .iter()
        .map(|line| {
            let item_id = line
                .item_id
                .clone()
                .ok_or(ClientError::MissingItemSelection)?;
            Ok(ReportLineInput {
                item_id,
                start_stock: parse_count(&line.start_count),
                end_stock: parse_count(&line.end_count),
            })
        })
        .collect()
}

/// Payload for a new report
pub fn build_submission(draft: &DraftReport) -> ClientResult<ReportSubmission> {
    Ok(ReportSubmission {
        lines: build_lines(draft)?,
        note: non_empty(&draft.note),
        total_revenue: parse_revenue(&draft.total_revenue),
    })
}

/// Full replacement payload for a committed report
pub fn build_update(report_id: &str, draft: &DraftReport) -> ClientResult<ReportUpdate> {
    Ok(ReportUpdate {
        report_id: report_id.to_string(),
        lines: build_lines(draft)?,
        note: non_empty(&draft.note),
        total_revenue: parse_revenue(&draft.total_revenue),
    })
}

/// Clears the in-flight flag when dropped, on every exit path
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> ClientResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| ClientError::SubmissionInFlight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends drafts to the backend and reconciles the shared draft and views.
///
/// At most one submit, edit or delete is outstanding per gateway; a second
/// call made while one is awaiting its response fails with
/// `SubmissionInFlight` without touching the network.
pub struct ReportGateway<B: StockBackend> {
    backend: Arc<B>,
    store: ReportStore,
    views: StaleViews,
    in_flight: Arc<AtomicBool>,
}

impl<B: StockBackend> Clone for ReportGateway<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            store: self.store.clone(),
            views: self.views.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<B: StockBackend> ReportGateway<B> {
    pub fn new(backend: Arc<B>, store: ReportStore, views: StaleViews) -> Self {
        Self {
            backend,
            store,
            views,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    pub fn views(&self) -> &StaleViews {
        &self.views
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Whether a request from this gateway is awaiting its response
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Commit the shared draft as a new report.
    ///
    /// Preconditions are checked before any network call. Exactly one remote
    /// call is made; there is no retry. On success the draft is cleared and
    /// the catalog and history views are marked stale. On failure the draft
    /// is left as it was.
    pub async fn submit(&self) -> ClientResult<()> {
        let submission = self.store.read(build_submission)?;
        let _guard = InFlight::acquire(&self.in_flight)?;

        let lines = submission.lines.len();
        match self.backend.record_report(&submission).await {
            Ok(()) => {
                self.store.clear();
                self.views.invalidate(&ViewKey::AFTER_REPORT_CHANGE);
                tracing::info!(lines, "Stock report submitted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(lines, error = %e, "Stock report submission failed, draft kept");
                Err(e)
            }
        }
    }

    /// Replace a committed report's lines, note and revenue with `draft`.
    ///
    /// The shared draft is not involved; editing works on its own copy.
    pub async fn edit_submit(&self, report_id: &str, draft: &DraftReport) -> ClientResult<()> {
        let update = build_update(report_id, draft)?;
        let _guard = InFlight::acquire(&self.in_flight)?;

        match self.backend.update_report(&update).await {
            Ok(()) => {
                self.views.invalidate(&ViewKey::AFTER_REPORT_CHANGE);
                tracing::info!(report_id = %report_id, lines = update.lines.len(), "Stock report updated");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(report_id = %report_id, error = %e, "Stock report update failed");
                Err(e)
            }
        }
    }

    /// Delete a committed report; the backend reverses its stock effect.
    pub async fn delete_submit(&self, report_id: &str) -> ClientResult<()> {
        let _guard = InFlight::acquire(&self.in_flight)?;

        match self.backend.delete_report(report_id).await {
            Ok(()) => {
                self.views.invalidate(&ViewKey::AFTER_REPORT_CHANGE);
                tracing::info!(report_id = %report_id, "Stock report deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(report_id = %report_id, error = %e, "Stock report delete failed");
                Err(e)
            }
        }
    }
}
