//! Roster parsing and screening.
//!
//! A roster is screened in one pure pass: headers are normalised through a
//! fixed synonym table, each row is checked for the required identity fields,
//! and e-mail duplicates are filtered according to a
//! [`DuplicateEmailPolicy`]. Persistence and token issuance happen in
//! [`crate::domain::RosterImportService`].

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::participant::{Participant, PaymentDetails, normalise_email};

mod columns;
mod table;

use columns::{ColumnMap, cell, optional_cell};
pub use columns::RosterAttribute;
pub use table::RosterTable;

/// Call-level roster shape errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("roster has no data rows")]
    NoDataRows,
    #[error("roster is not valid CSV: {0}")]
    Malformed(String),
    #[error("roster header is missing required columns: {}", missing.join(", "))]
    MissingRequiredColumns { missing: Vec<&'static str> },
}

/// Why a single row was not imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    MissingRequiredField,
    DuplicateEmail,
}

/// A rejected row with its raw cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRejection {
    /// One-based position among the data rows.
    pub row: usize,
    pub cells: Vec<String>,
    pub reason: RejectionReason,
}

/// How rows whose e-mail is already known to the event are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateEmailPolicy {
    /// Reject with [`RejectionReason::DuplicateEmail`].
    #[default]
    Reject,
    /// Import anyway as a separate participant.
    Allow,
}

/// A row that passed screening, ready to become a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub row: usize,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub payment: PaymentDetails,
    pub extension_fields: BTreeMap<String, String>,
}

/// Result of screening a roster against an event's existing e-mails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenedRoster {
    pub accepted: Vec<RosterRow>,
    pub rejected: Vec<RowRejection>,
}

/// Screen `table`, rejecting rows without identity fields and, under
/// [`DuplicateEmailPolicy::Reject`], rows whose e-mail is in
/// `existing_emails` or repeats an earlier accepted row.
///
/// `existing_emails` must already be normalised with
/// [`normalise_email`].
pub fn screen_roster(
    table: &RosterTable,
    existing_emails: &HashSet<String>,
    policy: DuplicateEmailPolicy,
) -> Result<ScreenedRoster, RosterError> {
    let columns = ColumnMap::resolve(&table.headers)?;
    let mut seen = existing_emails.clone();
    let mut screened = ScreenedRoster::default();

    for (offset, cells) in table.rows.iter().enumerate() {
        let row = offset + 1;
        let reject = |reason| RowRejection {
            row,
            cells: cells.clone(),
            reason,
        };

        let name = cell(cells, columns.name);
        let email = cell(cells, columns.email);
        if name.is_empty() || email.is_empty() {
            screened
                .rejected
                .push(reject(RejectionReason::MissingRequiredField));
            continue;
        }

        let key = normalise_email(email);
        if policy == DuplicateEmailPolicy::Reject && !seen.insert(key) {
            screened.rejected.push(reject(RejectionReason::DuplicateEmail));
            continue;
        }

        let extension_fields = columns
            .extensions
            .iter()
            .map(|(index, header)| (header.clone(), cell(cells, *index).to_owned()))
            .collect();

        screened.accepted.push(RosterRow {
            row,
            name: name.to_owned(),
            email: email.to_owned(),
            phone: optional_cell(cells, columns.phone),
            payment: PaymentDetails {
                transaction_id: optional_cell(cells, columns.transaction_id),
                transaction_time: optional_cell(cells, columns.transaction_time),
                amount: optional_cell(cells, columns.amount),
                payment_mode: optional_cell(cells, columns.payment_mode),
            },
            extension_fields,
        });
    }

    Ok(screened)
}

/// Participants created by an import plus the rows left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub created: Vec<Participant>,
    pub rejected: Vec<RowRejection>,
}

/// Outcome of a roster import call.
///
/// A roster in which no row qualifies is reported as
/// [`ImportOutcome::NoValidRows`] so callers can tell it apart from a
/// successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported(ImportReport),
    NoValidRows { rejected: Vec<RowRejection> },
}

impl ImportOutcome {
    /// Rows rejected during screening.
    pub fn rejected(&self) -> &[RowRejection] {
        match self {
            Self::Imported(report) => &report.rejected,
            Self::NoValidRows { rejected } => rejected,
        }
    }

    /// Participants created, empty for [`ImportOutcome::NoValidRows`].
    pub fn created(&self) -> &[Participant] {
        match self {
            Self::Imported(report) => &report.created,
            Self::NoValidRows { .. } => &[],
        }
    }
}
