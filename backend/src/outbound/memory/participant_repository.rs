//! In-memory `ParticipantRepository`.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::dispatch::RecipientSelection;
use crate::domain::ports::{AttendanceMark, ParticipantRepository, ParticipantRepositoryError};
use crate::domain::{DeliveryFlag, Participant, ScanToken};

/// Participant store kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryParticipantRepository {
    participants: Mutex<Vec<Participant>>,
}

impl InMemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Participant>>, ParticipantRepositoryError> {
        self.participants
            .lock()
            .map_err(|_| ParticipantRepositoryError::query("participant store lock poisoned"))
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn insert(&self, participant: &Participant) -> Result<(), ParticipantRepositoryError> {
        let mut participants = self.lock()?;
        if participants
            .iter()
            .any(|existing| existing.token() == participant.token())
        {
            return Err(ParticipantRepositoryError::duplicate_token(
                participant.token().as_str(),
            ));
        }
        if participants
            .iter()
            .any(|existing| existing.id() == participant.id())
        {
            return Err(ParticipantRepositoryError::query(format!(
                "participant {} already exists",
                participant.id()
            )));
        }
        participants.push(participant.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        participant_id: &Uuid,
    ) -> Result<Option<Participant>, ParticipantRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .find(|participant| participant.id() == *participant_id)
            .cloned())
    }

    async fn find_by_token(
        &self,
        token: &ScanToken,
    ) -> Result<Option<Participant>, ParticipantRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .find(|participant| participant.token() == token)
            .cloned())
    }

    async fn list_for_event(
        &self,
        event_id: &Uuid,
        selection: &RecipientSelection,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|participant| {
                participant.event_id() == *event_id && selection.includes(&participant.id())
            })
            .cloned()
            .collect())
    }

    async fn emails_for_event(
        &self,
        event_id: &Uuid,
    ) -> Result<Vec<String>, ParticipantRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|participant| participant.event_id() == *event_id)
            .map(|participant| participant.email().to_owned())
            .collect())
    }

    async fn mark_attended(
        &self,
        token: &ScanToken,
        at: DateTime<Utc>,
    ) -> Result<AttendanceMark, ParticipantRepositoryError> {
        let mut participants = self.lock()?;
        let Some(participant) = participants
            .iter_mut()
            .find(|participant| participant.token() == token)
        else {
            return Ok(AttendanceMark::UnknownToken);
        };
        if participant.record_attendance(at) {
            Ok(AttendanceMark::Marked(participant.clone()))
        } else {
            Ok(AttendanceMark::AlreadyAttended(participant.clone()))
        }
    }

    async fn set_delivery_flag(
        &self,
        participant_id: &Uuid,
        flag: DeliveryFlag,
    ) -> Result<bool, ParticipantRepositoryError> {
        let mut participants = self.lock()?;
        let Some(participant) = participants
            .iter_mut()
            .find(|participant| participant.id() == *participant_id)
        else {
            return Ok(false);
        };
        participant.set_delivery_flag(flag);
        Ok(true)
    }
}
