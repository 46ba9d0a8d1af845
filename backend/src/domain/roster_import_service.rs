//! Roster import use case.
//!
//! Rows are screened in one pure pass, then persisted one at a time with a
//! freshly issued scan token each. A storage failure stops the import and
//! leaves the rows persisted so far in place; the error details report how
//! many.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::participant::normalise_email;
use crate::domain::ports::{EventRepository, ParticipantRepository, RosterImportCommand};
use crate::domain::repository_errors::{
    map_event_repository_error, map_participant_repository_error,
};
use crate::domain::roster::{
    DuplicateEmailPolicy, ImportOutcome, ImportReport, RosterRow, RosterTable, screen_roster,
};
use crate::domain::{Error, Participant, ParticipantDraft, ScanTokenGenerator};

/// Roster import service implementing [`RosterImportCommand`].
pub struct RosterImportService<E, P> {
    events: Arc<E>,
    participants: Arc<P>,
    tokens: Arc<ScanTokenGenerator>,
    duplicate_policy: DuplicateEmailPolicy,
}

impl<E, P> RosterImportService<E, P> {
    /// Create a service that rejects duplicate e-mails.
    pub fn new(events: Arc<E>, participants: Arc<P>, tokens: Arc<ScanTokenGenerator>) -> Self {
        Self {
            events,
            participants,
            tokens,
            duplicate_policy: DuplicateEmailPolicy::default(),
        }
    }

    /// Override how duplicate e-mails are handled.
    pub fn with_duplicate_policy(mut self, policy: DuplicateEmailPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

impl<E, P> RosterImportService<E, P>
where
    P: ParticipantRepository,
{
    fn build_participant(&self, event_id: Uuid, row: RosterRow) -> Result<Participant, Error> {
        let row_number = row.row;
        Participant::new(ParticipantDraft {
            id: Uuid::new_v4(),
            event_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            token: self.tokens.issue(event_id),
            payment: row.payment,
            extension_fields: row.extension_fields,
        })
        .map_err(|err| Error::internal(format!("screened roster row {row_number} is invalid: {err}")))
    }

    async fn existing_emails(&self, event_id: &Uuid) -> Result<HashSet<String>, Error> {
        let emails = self
            .participants
            .emails_for_event(event_id)
            .await
            .map_err(map_participant_repository_error)?;
        Ok(emails.iter().map(|email| normalise_email(email)).collect())
    }
}

#[async_trait]
impl<E, P> RosterImportCommand for RosterImportService<E, P>
where
    E: EventRepository,
    P: ParticipantRepository,
{
    async fn import_roster(
        &self,
        event_id: Uuid,
        table: RosterTable,
    ) -> Result<ImportOutcome, Error> {
        self.events
            .find_by_id(&event_id)
            .await
            .map_err(map_event_repository_error)?
            .ok_or_else(|| Error::not_found(format!("event {event_id} not found")))?;

        let existing = match self.duplicate_policy {
            DuplicateEmailPolicy::Reject => self.existing_emails(&event_id).await?,
            DuplicateEmailPolicy::Allow => HashSet::new(),
        };
        let screened = screen_roster(&table, &existing, self.duplicate_policy)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        if screened.accepted.is_empty() {
            info!(%event_id, rejected = screened.rejected.len(), "roster had no valid rows");
            return Ok(ImportOutcome::NoValidRows {
                rejected: screened.rejected,
            });
        }

        let mut created = Vec::with_capacity(screened.accepted.len());
        for row in screened.accepted {
            let participant = self.build_participant(event_id, row)?;
            if let Err(err) = self.participants.insert(&participant).await {
                warn!(%event_id, persisted = created.len(), error = %err, "roster import aborted");
                return Err(map_participant_repository_error(err)
                    .with_details(json!({ "persisted": created.len() })));
            }
            created.push(participant);
        }

        info!(
            %event_id,
            created = created.len(),
            rejected = screened.rejected.len(),
            "roster imported"
        );
        Ok(ImportOutcome::Imported(ImportReport {
            created,
            rejected: screened.rejected,
        }))
    }
}

#[cfg(test)]
#[path = "roster_import_service_tests.rs"]
mod tests;
