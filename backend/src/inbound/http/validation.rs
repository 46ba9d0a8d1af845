//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    AmbiguousRoster,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::AmbiguousRoster => "ambiguous_roster",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

/// Reject a roster body that carries both or neither of its two shapes.
pub(crate) fn ambiguous_roster_error(field: FieldName) -> Error {
    field_error(
        field,
        ErrorCode::AmbiguousRoster,
        "provide either csv or headers with rows".to_owned(),
    )
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        field_value_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_uuid_list(values: Vec<String>, field: FieldName) -> Result<Vec<Uuid>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Uuid::parse_str(&value).map_err(|_| {
                Error::invalid_request(format!("{} must contain valid UUIDs", field.as_str()))
                    .with_details(json!({
                        "field": field.as_str(),
                        "index": index,
                        "value": value,
                        "code": ErrorCode::InvalidUuid.as_str(),
                    }))
            })
        })
        .collect()
}

/// Accept an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub(crate) fn parse_event_date(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            field_value_error(
                field,
                ErrorCode::InvalidDate,
                format!("{} must be a date or RFC 3339 timestamp", field.as_str()),
                value,
            )
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ErrorCode as DomainCode;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a Value> {
        error.details().and_then(|details| details.get(key))
    }

    #[rstest]
    #[case("2026-03-05", "2026-03-05T00:00:00+00:00")]
    #[case("2026-03-05T09:30:00+02:00", "2026-03-05T07:30:00+00:00")]
    fn event_dates_accept_dates_and_timestamps(#[case] raw: &str, #[case] expected: &str) {
        let parsed = parse_event_date(raw, FieldName::new("date")).expect("valid date");

        assert_eq!(parsed.to_rfc3339(), expected);
    }

    #[rstest]
    fn malformed_event_date_names_the_field() {
        let error = parse_event_date("next tuesday", FieldName::new("date"))
            .expect_err("invalid date");

        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&error, "field"), Some(&Value::from("date")));
        assert_eq!(detail(&error, "code"), Some(&Value::from("invalid_date")));
    }

    #[rstest]
    fn uuid_list_reports_offending_index() {
        let values = vec![Uuid::nil().to_string(), "nope".to_owned()];

        let error = parse_uuid_list(values, FieldName::new("participantIds"))
            .expect_err("second entry is invalid");

        assert_eq!(detail(&error, "index"), Some(&Value::from(1)));
        assert_eq!(detail(&error, "value"), Some(&Value::from("nope")));
    }

    #[rstest]
    fn missing_field_uses_stable_code() {
        let error = missing_field_error(FieldName::new("token"));

        assert_eq!(error.message(), "missing required field: token");
        assert_eq!(detail(&error, "code"), Some(&Value::from("missing_field")));
    }
}
