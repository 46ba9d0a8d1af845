//! Translation of repository port errors into domain errors.

use crate::domain::Error;
use crate::domain::ports::{EventRepositoryError, ParticipantRepositoryError};

pub(crate) fn map_event_repository_error(error: EventRepositoryError) -> Error {
    match error {
        EventRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("event repository unavailable: {message}"))
        }
        EventRepositoryError::Query { message } => {
            Error::internal(format!("event repository error: {message}"))
        }
    }
}

pub(crate) fn map_participant_repository_error(error: ParticipantRepositoryError) -> Error {
    match error {
        ParticipantRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("participant repository unavailable: {message}"))
        }
        ParticipantRepositoryError::Query { message } => {
            Error::internal(format!("participant repository error: {message}"))
        }
        ParticipantRepositoryError::DuplicateToken { token } => {
            Error::internal(format!("scan token collision on insert: {token}"))
        }
    }
}
