//! Driving port for roster imports.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::roster::{ImportOutcome, RosterTable};

/// Imports a roster into an existing event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterImportCommand: Send + Sync {
    /// Screen and persist `table`. Row-level problems are reported in the
    /// outcome; malformed headers and storage failures fail the call.
    async fn import_roster(&self, event_id: Uuid, table: RosterTable)
    -> Result<ImportOutcome, Error>;
}
