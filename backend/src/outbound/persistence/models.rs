//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{event_admins, events, participants};

/// Row struct for reading from the events table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub event_date: DateTime<Utc>,
    pub description: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "maintained by trigger; read for completeness only")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new event records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub event_date: DateTime<Utc>,
    pub description: &'a str,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Changeset for the editable event details.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events)]
pub(crate) struct EventDetailsUpdate<'a> {
    pub name: &'a str,
    pub event_date: DateTime<Utc>,
    pub description: &'a str,
}

/// Row struct for the admin membership table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = event_admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventAdminRow {
    pub event_id: Uuid,
    pub admin_id: Uuid,
}

/// Row struct for reading from the participants table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParticipantRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub token: String,
    #[expect(dead_code, reason = "mirrors attended_at; kept for SQL-side filtering")]
    pub attended: bool,
    pub attended_at: Option<DateTime<Utc>>,
    pub transaction_id: String,
    pub transaction_time: String,
    pub amount: String,
    pub payment_mode: String,
    pub receipt_sent: bool,
    pub extension_fields: serde_json::Value,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating participant records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = participants)]
pub(crate) struct NewParticipantRow<'a> {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub token: &'a str,
    pub attended: bool,
    pub attended_at: Option<DateTime<Utc>>,
    pub transaction_id: &'a str,
    pub transaction_time: &'a str,
    pub amount: &'a str,
    pub payment_mode: &'a str,
    pub receipt_sent: bool,
    pub extension_fields: &'a serde_json::Value,
}
