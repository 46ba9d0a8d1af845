//! Header normalisation for roster tables.

use super::RosterError;

/// Participant attributes a roster column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterAttribute {
    Name,
    Email,
    Phone,
    TransactionId,
    TransactionTime,
    Amount,
    PaymentMode,
}

impl RosterAttribute {
    /// Map a header cell onto an attribute, ignoring case and surrounding
    /// whitespace. Unknown headers become extension fields.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::roster::RosterAttribute;
    ///
    /// assert_eq!(RosterAttribute::from_header(" Mobile "), Some(RosterAttribute::Phone));
    /// assert_eq!(RosterAttribute::from_header("TXN_ID"), Some(RosterAttribute::TransactionId));
    /// assert_eq!(RosterAttribute::from_header("college"), None);
    /// ```
    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "phone" | "mobile" => Some(Self::Phone),
            "transactionid" | "transaction_id" | "txn_id" => Some(Self::TransactionId),
            "transactiontime" | "transaction_time" | "txn_time" => Some(Self::TransactionTime),
            "amount" => Some(Self::Amount),
            "paymentmode" | "payment_mode" | "mode" => Some(Self::PaymentMode),
            _ => None,
        }
    }
}

/// Resolved column positions for one roster header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ColumnMap {
    pub name: usize,
    pub email: usize,
    pub phone: Option<usize>,
    pub transaction_id: Option<usize>,
    pub transaction_time: Option<usize>,
    pub amount: Option<usize>,
    pub payment_mode: Option<usize>,
    pub extensions: Vec<(usize, String)>,
}

impl ColumnMap {
    /// Resolve header positions. The first column mapping to an attribute
    /// wins; later duplicates are ignored.
    pub fn resolve(headers: &[String]) -> Result<Self, RosterError> {
        let mut name = None;
        let mut email = None;
        let mut phone = None;
        let mut transaction_id = None;
        let mut transaction_time = None;
        let mut amount = None;
        let mut payment_mode = None;
        let mut extensions = Vec::new();

        for (index, header) in headers.iter().enumerate() {
            let trimmed = header.trim();
            if trimmed.is_empty() {
                continue;
            }
            let slot = match RosterAttribute::from_header(trimmed) {
                Some(RosterAttribute::Name) => &mut name,
                Some(RosterAttribute::Email) => &mut email,
                Some(RosterAttribute::Phone) => &mut phone,
                Some(RosterAttribute::TransactionId) => &mut transaction_id,
                Some(RosterAttribute::TransactionTime) => &mut transaction_time,
                Some(RosterAttribute::Amount) => &mut amount,
                Some(RosterAttribute::PaymentMode) => &mut payment_mode,
                None => {
                    extensions.push((index, trimmed.to_owned()));
                    continue;
                }
            };
            slot.get_or_insert(index);
        }

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if email.is_none() {
            missing.push("email");
        }
        match (name, email) {
            (Some(name), Some(email)) => Ok(Self {
                name,
                email,
                phone,
                transaction_id,
                transaction_time,
                amount,
                payment_mode,
                extensions,
            }),
            _ => Err(RosterError::MissingRequiredColumns { missing }),
        }
    }
}

/// Read a cell, treating missing trailing cells as empty.
pub(super) fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map_or("", |value| value.trim())
}

/// Read an optional column's cell.
pub(super) fn optional_cell(row: &[String], index: Option<usize>) -> String {
    index.map_or_else(String::new, |index| cell(row, index).to_owned())
}
