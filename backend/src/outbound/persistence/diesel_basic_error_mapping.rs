//! Shared Diesel error mapping for the event and participant repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.cause().to_owned())
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Closed connections become connection errors; everything else, including
/// constraint violations the caller did not intercept, is a query error.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("unique constraint violated")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            query("referenced record does not exist")
        }
        _ => query("database error"),
    }
}

/// Return the violated constraint name when `error` is a unique violation.
pub fn unique_violation_constraint(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(&'static str),
        Connection(&'static str),
    }

    struct Info(&'static str, Option<&'static str>);

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.1
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("boom", constraint)))
    }

    fn map(error: DieselError) -> Mapped {
        map_basic_diesel_error(error, Mapped::Query, Mapped::Connection)
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        assert_eq!(
            map(database_error(DatabaseErrorKind::ClosedConnection, None)),
            Mapped::Connection("database connection error")
        );
    }

    #[rstest]
    #[case(DieselError::NotFound, "record not found")]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation, None),
        "unique constraint violated"
    )]
    #[case(
        database_error(DatabaseErrorKind::CheckViolation, None),
        "database error"
    )]
    fn other_failures_map_to_query(#[case] error: DieselError, #[case] expected: &'static str) {
        assert_eq!(map(error), Mapped::Query(expected));
    }

    #[rstest]
    fn unique_violation_exposes_constraint_name() {
        let error = database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("participants_token_key"),
        );
        assert_eq!(
            unique_violation_constraint(&error),
            Some("participants_token_key")
        );
        assert_eq!(unique_violation_constraint(&DieselError::NotFound), None);
    }

    #[rstest]
    fn pool_errors_map_to_connection_constructor() {
        let mapped: String = map_basic_pool_error(PoolError::checkout("timed out"), |m| m);
        assert_eq!(mapped, "timed out");
    }
}
