//! Abnormality value objects embedded in transport and delivery tasks.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Caller-supplied description of an abnormal condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbnormalReport {
    abnormal_type: String,
    reason: String,
    handler: String,
}

impl AbnormalReport {
    /// Creates a report. Values are trimmed; none are required.
    #[must_use]
    pub fn new(
        abnormal_type: impl Into<String>,
        reason: impl Into<String>,
        handler: impl Into<String>,
    ) -> Self {
        Self {
            abnormal_type: abnormal_type.into().trim().to_owned(),
            reason: reason.into().trim().to_owned(),
            handler: handler.into().trim().to_owned(),
        }
    }

    /// Returns the abnormality category (for example `vehicle_fault`).
    #[must_use]
    pub fn abnormal_type(&self) -> &str {
        &self.abnormal_type
    }

    /// Returns the free-text reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the person handling the abnormality.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }
}

/// Abnormality recorded on a task.
///
/// The value is owned by its task and replaced wholesale; recording a
/// handle result produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbnormalInfo {
    abnormal_type: String,
    reason: String,
    handler: String,
    reported_at: DateTime<Utc>,
    handle_result: Option<String>,
}

/// Parameter object for reconstructing persisted abnormal info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAbnormalInfo {
    /// Persisted abnormality category.
    pub abnormal_type: String,
    /// Persisted reason.
    pub reason: String,
    /// Persisted handler.
    pub handler: String,
    /// Persisted report timestamp.
    pub reported_at: DateTime<Utc>,
    /// Persisted handle result, if the abnormality was handled.
    pub handle_result: Option<String>,
}

impl AbnormalInfo {
    /// Records a new abnormality at the current clock time.
    #[must_use]
    pub fn reported(report: AbnormalReport, clock: &impl Clock) -> Self {
        Self {
            abnormal_type: report.abnormal_type,
            reason: report.reason,
            handler: report.handler,
            reported_at: clock.utc(),
            handle_result: None,
        }
    }

    /// Reconstructs abnormal info from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAbnormalInfo) -> Self {
        Self {
            abnormal_type: data.abnormal_type,
            reason: data.reason,
            handler: data.handler,
            reported_at: data.reported_at,
            handle_result: data.handle_result,
        }
    }

    /// Returns a copy carrying the given handle result.
    #[must_use]
    pub fn with_handle_result(&self, result: impl Into<String>) -> Self {
        Self {
            handle_result: Some(result.into()),
            ..self.clone()
        }
    }

    /// Returns the abnormality category.
    #[must_use]
    pub fn abnormal_type(&self) -> &str {
        &self.abnormal_type
    }

    /// Returns the reported reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the reported handler.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Returns when the abnormality was reported.
    #[must_use]
    pub const fn reported_at(&self) -> DateTime<Utc> {
        self.reported_at
    }

    /// Returns the handle result, if any.
    #[must_use]
    pub fn handle_result(&self) -> Option<&str> {
        self.handle_result.as_deref()
    }
}
