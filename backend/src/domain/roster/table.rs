//! Raw tabular roster input.

use csv_async::{AsyncReaderBuilder, StringRecord, Trim};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use super::RosterError;

/// A header row plus data rows, cells already split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RosterTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from RFC 4180 comma-separated text.
    ///
    /// The first non-blank record is the header. Quoted cells may hold
    /// commas, quotes and line breaks; `\r\n` and `\n` both end a record.
    /// Cells are trimmed, rows may be shorter or longer than the header, and
    /// records whose cells are all blank are dropped.
    ///
    /// # Errors
    /// [`RosterError::NoDataRows`] when nothing follows the header, and
    /// [`RosterError::Malformed`] when the CSV reader gives up on a record.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::roster::RosterTable;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let table = RosterTable::parse_delimited("name,email\r\n\"Smith, John\", j@x.io\r\n\r\n")
    ///     .await
    ///     .expect("valid roster");
    /// assert_eq!(table.headers, vec!["name", "email"]);
    /// assert_eq!(table.rows, vec![vec!["Smith, John".to_owned(), "j@x.io".to_owned()]]);
    /// # });
    /// ```
    pub async fn parse_delimited(text: &str) -> Result<Self, RosterError> {
        let mut reader = AsyncReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .create_reader(text.as_bytes());
        let mut records = reader.records();

        let mut headers = None;
        let mut rows = Vec::new();
        while let Some(record) = records.next().await {
            let record = record.map_err(|err| RosterError::Malformed(err.to_string()))?;
            if is_blank(&record) {
                continue;
            }
            let cells: Vec<String> = record.iter().map(str::to_owned).collect();
            if headers.is_none() {
                headers = Some(cells);
            } else {
                rows.push(cells);
            }
        }

        match headers {
            Some(headers) if !rows.is_empty() => Ok(Self { headers, rows }),
            _ => Err(RosterError::NoDataRows),
        }
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}
