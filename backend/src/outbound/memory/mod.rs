//! In-process repository adapters.
//!
//! Used when no database URL is configured and throughout the test suites.
//! Each repository guards its state with one mutex, so the conditional
//! attendance update and field-scoped flag writes are atomic with respect to
//! each other.

mod event_repository;
mod participant_repository;

pub use event_repository::InMemoryEventRepository;
pub use participant_repository::InMemoryParticipantRepository;
