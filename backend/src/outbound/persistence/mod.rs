//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the event and
//! participant repository ports backed by PostgreSQL via the Diesel ORM with
//! async support through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Strongly typed errors**: All database errors are mapped to the
//!   repository port error enums.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselEventRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/conference")).await?;
//! let events = DieselEventRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_event_repository;
mod diesel_participant_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_event_repository::DieselEventRepository;
pub use diesel_participant_repository::DieselParticipantRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
