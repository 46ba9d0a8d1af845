//! Driving port for attendance scans.

use async_trait::async_trait;

use crate::domain::{Error, Participant};

/// Result of a successful scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceReceipt {
    pub participant: Participant,
    /// `true` when an earlier scan already recorded attendance.
    pub already_attended: bool,
}

/// Records attendance from a scanned token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceCommand: Send + Sync {
    async fn mark_attendance(&self, token: &str) -> Result<AttendanceReceipt, Error>;
}
