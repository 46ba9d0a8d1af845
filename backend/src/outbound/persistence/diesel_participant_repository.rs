//! PostgreSQL-backed `ParticipantRepository` implementation using Diesel ORM.
//!
//! Attendance uses a single conditional `UPDATE ... WHERE attended = false
//! RETURNING *`, so of several concurrent scans exactly one observes the
//! transition. Delivery flags are written column by column and never touch
//! the attendance columns.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::dispatch::RecipientSelection;
use crate::domain::ports::{AttendanceMark, ParticipantRepository, ParticipantRepositoryError};
use crate::domain::{DeliveryFlag, Participant, ParticipantDraft, PaymentDetails, ScanToken};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation_constraint,
};
use super::models::{NewParticipantRow, ParticipantRow};
use super::pool::{DbPool, PoolError};
use super::schema::participants;

/// Name of the unique index guarding scan tokens.
const TOKEN_CONSTRAINT: &str = "participants_token_key";

/// Diesel-backed implementation of the participant repository port.
#[derive(Clone)]
pub struct DieselParticipantRepository {
    pool: DbPool,
}

impl DieselParticipantRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ParticipantRepositoryError {
    map_basic_pool_error(error, ParticipantRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ParticipantRepositoryError {
    map_basic_diesel_error(
        error,
        ParticipantRepositoryError::query,
        ParticipantRepositoryError::connection,
    )
}

fn map_insert_error(
    error: diesel::result::Error,
    participant: &Participant,
) -> ParticipantRepositoryError {
    match unique_violation_constraint(&error) {
        Some(constraint) if constraint == TOKEN_CONSTRAINT || constraint.is_empty() => {
            warn!(constraint, "scan token collided on insert");
            ParticipantRepositoryError::duplicate_token(participant.token().as_str())
        }
        _ => map_diesel_error(error),
    }
}

fn encode_extension_fields(
    participant: &Participant,
) -> Result<serde_json::Value, ParticipantRepositoryError> {
    serde_json::to_value(participant.extension_fields()).map_err(|err| {
        ParticipantRepositoryError::query(format!("serialise extension fields: {err}"))
    })
}

/// Convert a database row into a validated domain participant.
fn row_to_participant(row: ParticipantRow) -> Result<Participant, ParticipantRepositoryError> {
    let ParticipantRow {
        id,
        event_id,
        name,
        email,
        phone,
        token,
        attended: _,
        attended_at,
        transaction_id,
        transaction_time,
        amount,
        payment_mode,
        receipt_sent,
        extension_fields,
        created_at: _,
    } = row;

    let token = ScanToken::new(token)
        .map_err(|err| ParticipantRepositoryError::query(format!("participant {id}: {err}")))?;
    let extension_fields: BTreeMap<String, String> = serde_json::from_value(extension_fields)
        .map_err(|err| {
            ParticipantRepositoryError::query(format!("decode extension fields of {id}: {err}"))
        })?;

    let mut participant = Participant::new(ParticipantDraft {
        id,
        event_id,
        name,
        email,
        phone,
        token,
        payment: PaymentDetails {
            transaction_id,
            transaction_time,
            amount,
            payment_mode,
        },
        extension_fields,
    })
    .map_err(|err| ParticipantRepositoryError::query(format!("participant {id}: {err}")))?;

    if let Some(at) = attended_at {
        participant.record_attendance(at);
    }
    if receipt_sent {
        participant.set_delivery_flag(DeliveryFlag::ReceiptSent);
    }
    Ok(participant)
}

fn rows_to_participants(
    rows: Vec<ParticipantRow>,
) -> Result<Vec<Participant>, ParticipantRepositoryError> {
    rows.into_iter().map(row_to_participant).collect()
}

#[async_trait]
impl ParticipantRepository for DieselParticipantRepository {
    async fn insert(&self, participant: &Participant) -> Result<(), ParticipantRepositoryError> {
        let extension_fields = encode_extension_fields(participant)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let payment = participant.payment();
        let new_row = NewParticipantRow {
            id: participant.id(),
            event_id: participant.event_id(),
            name: participant.name(),
            email: participant.email(),
            phone: participant.phone(),
            token: participant.token().as_str(),
            attended: participant.attended(),
            attended_at: participant.attended_at(),
            transaction_id: &payment.transaction_id,
            transaction_time: &payment.transaction_time,
            amount: &payment.amount,
            payment_mode: &payment.payment_mode,
            receipt_sent: participant.receipt_sent(),
            extension_fields: &extension_fields,
        };

        diesel::insert_into(participants::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_insert_error(err, participant))
    }

    async fn find_by_id(
        &self,
        participant_id: &Uuid,
    ) -> Result<Option<Participant>, ParticipantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = participants::table
            .filter(participants::id.eq(participant_id))
            .select(ParticipantRow::as_select())
            .first::<ParticipantRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_participant).transpose()
    }

    async fn find_by_token(
        &self,
        token: &ScanToken,
    ) -> Result<Option<Participant>, ParticipantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = participants::table
            .filter(participants::token.eq(token.as_str()))
            .select(ParticipantRow::as_select())
            .first::<ParticipantRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_participant).transpose()
    }

    async fn list_for_event(
        &self,
        event_id: &Uuid,
        selection: &RecipientSelection,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError> {
        let mut query = participants::table
            .filter(participants::event_id.eq(event_id))
            .order((participants::created_at.asc(), participants::id.asc()))
            .select(ParticipantRow::as_select())
            .into_boxed();
        if let RecipientSelection::Only(ids) = selection {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(participants::id.eq_any(ids.clone()));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_participants(rows)
    }

    async fn emails_for_event(
        &self,
        event_id: &Uuid,
    ) -> Result<Vec<String>, ParticipantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        participants::table
            .filter(participants::event_id.eq(event_id))
            .select(participants::email)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn mark_attended(
        &self,
        token: &ScanToken,
        at: DateTime<Utc>,
    ) -> Result<AttendanceMark, ParticipantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let marked = diesel::update(
            participants::table
                .filter(participants::token.eq(token.as_str()))
                .filter(participants::attended.eq(false)),
        )
        .set((
            participants::attended.eq(true),
            participants::attended_at.eq(Some(at)),
        ))
        .returning(ParticipantRow::as_returning())
        .get_result::<ParticipantRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(row) = marked {
            return row_to_participant(row).map(AttendanceMark::Marked);
        }

        let existing = participants::table
            .filter(participants::token.eq(token.as_str()))
            .select(ParticipantRow::as_select())
            .first::<ParticipantRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match existing {
            Some(row) => row_to_participant(row).map(AttendanceMark::AlreadyAttended),
            None => Ok(AttendanceMark::UnknownToken),
        }
    }

    async fn set_delivery_flag(
        &self,
        participant_id: &Uuid,
        flag: DeliveryFlag,
    ) -> Result<bool, ParticipantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = participants::table.filter(participants::id.eq(participant_id));

        let updated = match flag {
            DeliveryFlag::ReceiptSent => diesel::update(target)
                .set(participants::receipt_sent.eq(true))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?,
        };
        Ok(updated > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion and error mapping coverage.

    use chrono::TimeZone;
    use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind};
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    struct ConstraintInfo(Option<&'static str>);

    impl DatabaseErrorInformation for ConstraintInfo {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("participants")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[fixture]
    fn row() -> ParticipantRow {
        let at = Utc
            .with_ymd_and_hms(2026, 3, 5, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        ParticipantRow {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "Alice".to_owned(),
            email: "alice@example.com".to_owned(),
            phone: String::new(),
            token: "tok-alice".to_owned(),
            attended: false,
            attended_at: None,
            transaction_id: "T1".to_owned(),
            transaction_time: "2026-02-01 10:00".to_owned(),
            amount: "500".to_owned(),
            payment_mode: "UPI".to_owned(),
            receipt_sent: false,
            extension_fields: json!({ "college": "MIT" }),
            created_at: at,
        }
    }

    #[rstest]
    fn row_conversion_restores_payment_and_extensions(row: ParticipantRow) {
        let participant = row_to_participant(row).expect("valid row");

        assert!(participant.has_payment());
        assert_eq!(participant.payment().payment_mode, "UPI");
        assert_eq!(
            participant.extension_fields().get("college"),
            Some(&"MIT".to_owned())
        );
        assert!(!participant.attended());
    }

    #[rstest]
    fn row_conversion_restores_state_flags(mut row: ParticipantRow) {
        let at = Utc
            .with_ymd_and_hms(2026, 3, 5, 10, 0, 0)
            .single()
            .expect("valid timestamp");
        row.attended = true;
        row.attended_at = Some(at);
        row.receipt_sent = true;

        let participant = row_to_participant(row).expect("valid row");

        assert_eq!(participant.attended_at(), Some(at));
        assert!(participant.receipt_sent());
    }

    #[rstest]
    #[case::blank_token(|row: &mut ParticipantRow| row.token = " ".to_owned())]
    #[case::blank_name(|row: &mut ParticipantRow| row.name = String::new())]
    #[case::bad_extensions(|row: &mut ParticipantRow| row.extension_fields = json!([1, 2]))]
    fn corrupt_rows_are_query_errors(
        mut row: ParticipantRow,
        #[case] corrupt: fn(&mut ParticipantRow),
    ) {
        corrupt(&mut row);

        let error = row_to_participant(row).expect_err("corrupt row");

        assert!(matches!(error, ParticipantRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(Some(TOKEN_CONSTRAINT), true)]
    #[case(None, true)]
    #[case(Some("participants_pkey"), false)]
    fn token_violations_become_duplicate_token(
        row: ParticipantRow,
        #[case] constraint: Option<&'static str>,
        #[case] duplicate: bool,
    ) {
        let participant = row_to_participant(row).expect("valid row");
        let error = diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintInfo(constraint)),
        );

        let mapped = map_insert_error(error, &participant);

        assert_eq!(
            matches!(mapped, ParticipantRepositoryError::DuplicateToken { .. }),
            duplicate
        );
    }
}
