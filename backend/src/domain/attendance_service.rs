//! Attendance scanning.
//!
//! The conditional write lives in the repository so that concurrent scans of
//! the same token record exactly one transition.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{AttendanceCommand, AttendanceMark, AttendanceReceipt, ParticipantRepository};
use crate::domain::repository_errors::map_participant_repository_error;
use crate::domain::{Error, ScanToken};

/// Attendance service implementing [`AttendanceCommand`].
#[derive(Clone)]
pub struct AttendanceService<P> {
    participants: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<P> AttendanceService<P> {
    pub fn new(participants: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            participants,
            clock,
        }
    }
}

#[async_trait]
impl<P> AttendanceCommand for AttendanceService<P>
where
    P: ParticipantRepository,
{
    async fn mark_attendance(&self, token: &str) -> Result<AttendanceReceipt, Error> {
        let token = ScanToken::new(token)
            .map_err(|err| Error::invalid_request(format!("invalid scan token: {err}")))?;

        let mark = self
            .participants
            .mark_attended(&token, self.clock.utc())
            .await
            .map_err(map_participant_repository_error)?;

        match mark {
            AttendanceMark::Marked(participant) => {
                info!(participant_id = %participant.id(), "attendance recorded");
                Ok(AttendanceReceipt {
                    participant,
                    already_attended: false,
                })
            }
            AttendanceMark::AlreadyAttended(participant) => Ok(AttendanceReceipt {
                participant,
                already_attended: true,
            }),
            AttendanceMark::UnknownToken => Err(Error::invalid_code("no participant holds this code")),
        }
    }
}
