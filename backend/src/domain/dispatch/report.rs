//! Aggregate dispatch results.

use serde::Serialize;
use uuid::Uuid;

/// Category of a per-recipient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// An artifact renderer failed.
    Render,
    /// The mail transport did not confirm the send.
    Transport,
    /// The send succeeded but the delivery flag could not be written.
    DeliveryState,
    /// The call deadline passed before the recipient finished.
    Timeout,
    /// The producer's precondition did not hold for this participant.
    Contract,
    /// The recipient's task ended without reporting, for example after a
    /// panic inside a producer.
    Aborted,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::Transport => "transport",
            Self::DeliveryState => "delivery_state",
            Self::Timeout => "timeout",
            Self::Contract => "contract",
            Self::Aborted => "aborted",
        }
    }
}

/// One recipient that was not confirmed sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFailure {
    pub participant_id: Uuid,
    pub kind: FailureKind,
    pub detail: String,
}

impl DeliveryFailure {
    pub fn new(participant_id: Uuid, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            participant_id,
            kind,
            detail: detail.into(),
        }
    }
}

/// Outcome of one dispatch call.
///
/// `sent + failures.len() == attempted` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReport {
    pub attempted: usize,
    pub sent: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DispatchReport {
    /// Report for a call that resolved no recipients.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Failures of one kind, in report order.
    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &DeliveryFailure> {
        self.failures
            .iter()
            .filter(move |failure| failure.kind == kind)
    }
}
