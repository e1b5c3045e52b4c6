//! Telemetry domain: correlation ids, quality events and metrics sinks.

pub mod events;
pub mod sinks;

pub use events::{LessonCompletedData, QualityEvent, SectionResolvedData};
pub use sinks::{CollectingMetricsSink, QualityMetricsSink, TracingMetricsSink};

use chrono::Utc;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_REQUEST: AtomicU32 = AtomicU32::new(1);

/// Id shared by every log line and report of one lesson request.
///
/// `req-<utc timestamp>-<sequence>`; the sequence keeps ids from the same
/// millisecond apart within a process.
pub fn new_correlation_id() -> String {
    let sequence = NEXT_REQUEST.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{:04}", Utc::now().format("%Y%m%dT%H%M%S%3f"), sequence)
}
