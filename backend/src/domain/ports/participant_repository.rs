//! Port for participant persistence.
//!
//! Attendance and delivery flags are written with field-scoped updates so an
//! attendance scan and a dispatch flag write for the same participant never
//! overwrite each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::dispatch::RecipientSelection;
use crate::domain::{DeliveryFlag, Participant, ScanToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by participant repository adapters.
    pub enum ParticipantRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "participant repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "participant repository query failed: {message}",
        /// The unique index on scan tokens rejected an insert.
        DuplicateToken { token: String } =>
            "scan token already issued: {token}",
    }
}

/// Result of the conditional attendance update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceMark {
    /// This call performed the first transition.
    Marked(Participant),
    /// The participant had already attended; nothing changed.
    AlreadyAttended(Participant),
    /// No participant carries the token.
    UnknownToken,
}

/// Port for storing participants and their state flags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Persist a new participant. Token collisions surface as
    /// [`ParticipantRepositoryError::DuplicateToken`].
    async fn insert(&self, participant: &Participant) -> Result<(), ParticipantRepositoryError>;

    async fn find_by_id(
        &self,
        participant_id: &Uuid,
    ) -> Result<Option<Participant>, ParticipantRepositoryError>;

    /// Exact token lookup.
    async fn find_by_token(
        &self,
        token: &ScanToken,
    ) -> Result<Option<Participant>, ParticipantRepositoryError>;

    /// List the event's participants matching `selection`. Ids that belong
    /// to another event are not returned.
    async fn list_for_event(
        &self,
        event_id: &Uuid,
        selection: &RecipientSelection,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError>;

    /// E-mail addresses already registered for the event, as stored.
    async fn emails_for_event(
        &self,
        event_id: &Uuid,
    ) -> Result<Vec<String>, ParticipantRepositoryError>;

    /// Atomically flip attendance for `token` when it is still unset,
    /// stamping `at`.
    async fn mark_attended(
        &self,
        token: &ScanToken,
        at: DateTime<Utc>,
    ) -> Result<AttendanceMark, ParticipantRepositoryError>;

    /// Set one delivery flag without touching other columns. Returns `false`
    /// when the participant no longer exists.
    async fn set_delivery_flag(
        &self,
        participant_id: &Uuid,
        flag: DeliveryFlag,
    ) -> Result<bool, ParticipantRepositoryError>;
}

/// Fixture implementation for tests that do not exercise participant storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureParticipantRepository;

#[async_trait]
impl ParticipantRepository for FixtureParticipantRepository {
    async fn insert(&self, _participant: &Participant) -> Result<(), ParticipantRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _participant_id: &Uuid,
    ) -> Result<Option<Participant>, ParticipantRepositoryError> {
        Ok(None)
    }

    async fn find_by_token(
        &self,
        _token: &ScanToken,
    ) -> Result<Option<Participant>, ParticipantRepositoryError> {
        Ok(None)
    }

    async fn list_for_event(
        &self,
        _event_id: &Uuid,
        _selection: &RecipientSelection,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError> {
        Ok(Vec::new())
    }

    async fn emails_for_event(
        &self,
        _event_id: &Uuid,
    ) -> Result<Vec<String>, ParticipantRepositoryError> {
        Ok(Vec::new())
    }

    async fn mark_attended(
        &self,
        _token: &ScanToken,
        _at: DateTime<Utc>,
    ) -> Result<AttendanceMark, ParticipantRepositoryError> {
        Ok(AttendanceMark::UnknownToken)
    }

    async fn set_delivery_flag(
        &self,
        _participant_id: &Uuid,
        _flag: DeliveryFlag,
    ) -> Result<bool, ParticipantRepositoryError> {
        Ok(false)
    }
}
