//! Destinations for finished quality reports.

use crate::lesson::quality::QualityReport;
use crate::telemetry::events::QualityEvent;
use parking_lot::Mutex;
use tracing::info;

/// Receives the quality report of every successful lesson request.
pub trait QualityMetricsSink: Send + Sync {
    fn record(&self, report: &QualityReport);
}

/// Emits each quality event as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMetricsSink;

impl QualityMetricsSink for TracingMetricsSink {
    fn record(&self, report: &QualityReport) {
        for event in QualityEvent::from_report(report) {
            info!(
                target: "lessonloom::quality",
                correlation_id = %event.correlation_id,
                seq = event.seq,
                event_type = %event.event_type,
                data = %event.data,
                "quality event"
            );
        }
    }
}

/// Keeps reports in memory.
#[derive(Debug, Default)]
pub struct CollectingMetricsSink {
    reports: Mutex<Vec<QualityReport>>,
}

impl CollectingMetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<QualityReport> {
        self.reports.lock().clone()
    }

    pub fn last(&self) -> Option<QualityReport> {
        self.reports.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }
}

impl QualityMetricsSink for CollectingMetricsSink {
    fn record(&self, report: &QualityReport) {
        self.reports.lock().push(report.clone());
    }
}
