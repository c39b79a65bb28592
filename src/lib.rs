//! SOQL query tooling: a tolerant clause parser, a composer and importer
//! for structured builder state, and a semantic validator that checks
//! queries against object describes.

pub mod builder;
pub mod composer;
pub mod importer;
pub mod lexer;
pub mod operator;
pub mod parser;
pub mod scanner;
pub mod schema;
pub mod validator;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use builder::{BuilderState, FilterState, OrderBy, SortDirection, SubqueryState};
pub use composer::{compose_args, compose_query, compose_selection, compose_where, quote_value};
pub use importer::{import_query, ImportError, ImportReport};
pub use lexer::{tokenize, Lexer, Span, Token, TokenKind};
pub use operator::{Operator, OperatorParseError};
pub use parser::{parse_query_parts, Filter, QueryModel, SelectItemKind};
pub use scanner::{extract_clause, split_csv_respecting_parens, trim_quotes, Scanner};
pub use schema::{DescribeCache, FieldDescribe, SObjectDescribe, SalesforceFieldType};
pub use validator::{
    validate_soql, validate_soql_with_config, Diagnostic, Severity, SoqlValidator,
    ValidationResult, ValidatorConfig,
};
