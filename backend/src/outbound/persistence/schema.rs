//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Conference events.
    events (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name, never blank.
        name -> Varchar,
        /// Scheduled start of the event.
        event_date -> Timestamptz,
        description -> Text,
        /// Creating admin; always also present in `event_admins`.
        owner_id -> Uuid,
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Admin membership per event. Rows cascade with the event.
    event_admins (event_id, admin_id) {
        event_id -> Uuid,
        admin_id -> Uuid,
    }
}

diesel::table! {
    /// Participants enrolled in an event.
    ///
    /// `token` carries a unique index; `attended` only ever moves from false
    /// to true.
    participants (id) {
        id -> Uuid,
        event_id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        token -> Varchar,
        attended -> Bool,
        attended_at -> Nullable<Timestamptz>,
        transaction_id -> Varchar,
        transaction_time -> Varchar,
        amount -> Varchar,
        payment_mode -> Varchar,
        receipt_sent -> Bool,
        /// Roster columns outside the known attribute set.
        extension_fields -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(event_admins -> events (event_id));
diesel::joinable!(participants -> events (event_id));

diesel::allow_tables_to_appear_in_same_query!(event_admins, events, participants);
