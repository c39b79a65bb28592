//! Validator findings

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    /// Heuristic finding; still reported, but the query may be intended
    Warning,
}

/// One finding about a query. `Display` is the user-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("SELECT list is empty")]
    EmptySelect,

    #[error("Missing object name after FROM")]
    MissingObject,

    #[error("Failed to retrieve describe for {0}")]
    DescribeUnavailable(String),

    #[error("Query object '{query_object}' does not match describe for '{describe_object}'")]
    ObjectMismatch {
        query_object: String,
        describe_object: String,
    },

    #[error("FIELDS() cannot be combined with explicit fields")]
    FieldsMacroWithFields,

    #[error("FIELDS() cannot be combined with aggregate functions")]
    FieldsMacroWithAggregate,

    #[error("ORDER BY has no fields")]
    EmptyOrderBy,

    #[error("LIMIT must be a non-negative integer (found '{0}')")]
    InvalidLimit(String),

    #[error("OFFSET must be a non-negative integer (found '{0}')")]
    InvalidOffset(String),

    #[error("OFFSET requires LIMIT")]
    OffsetWithoutLimit,

    #[error("Aggregate functions cannot be mixed with non-aggregated fields without GROUP BY")]
    AggregateWithoutGroupBy,

    #[error("Field '{0}' must be aggregated or appear in GROUP BY")]
    FieldNotGrouped(String),

    #[error("HAVING requires GROUP BY")]
    HavingWithoutGroupBy,

    #[error("ORDER BY is not allowed inside a subquery: {0}")]
    OrderByInSubquery(String),

    #[error("Subquery for '{field}' must select exactly one field (found {count})")]
    SemiJoinFieldCount { field: String, count: usize },

    #[error(
        "Subquery for '{field}' selects Id from {subquery_object}; \
         it should reference a relationship Id such as {outer_object}Id"
    )]
    SemiJoinSelectsId {
        field: String,
        subquery_object: String,
        outer_object: String,
    },

    #[error("{operator} on '{field}' requires a parenthesized list or subquery")]
    ListOperatorRequiresList { field: String, operator: String },

    #[error("Unexpected comparison operator after {operator} on '{field}'")]
    ComparisonAfterListOperator { field: String, operator: String },

    #[error("Boolean field '{field}' expects TRUE or FALSE without quotes (found {value})")]
    BooleanValue { field: String, value: String },

    #[error("Numeric field '{field}' expects a number (found {value})")]
    NumericValue { field: String, value: String },

    #[error("Date field '{field}' expects an unquoted date literal (found {value})")]
    DateValueQuoted { field: String, value: String },

    #[error(
        "Date field '{field}' expects a date literal such as TODAY or LAST_N_DAYS:7 \
         (found {value})"
    )]
    DateValue { field: String, value: String },

    #[error("Id field '{field}' expects a 15 or 18 character Id (found {value})")]
    IdValue { field: String, value: String },

    #[error("Text field '{field}' expects a quoted value for {operator} (found {value})")]
    StringValueUnquoted {
        field: String,
        operator: String,
        value: String,
    },

    #[error("'{0} = null' should be written as {0} IS NULL")]
    NullEquality(String),
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::SemiJoinSelectsId { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
