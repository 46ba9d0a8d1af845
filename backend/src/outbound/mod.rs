//! Driven adapters behind the domain ports.
//!
//! `persistence` stores events and participants in PostgreSQL through
//! Diesel; `memory` keeps them in process when no database is configured.
//! `mail` speaks SMTP through lettre, and `render` shells out to the QR and
//! certificate generators. None of them make business decisions.

pub mod mail;
pub mod memory;
pub mod persistence;
pub mod render;
