//! Tolerant SOQL parser
//!
//! [`parse_query_parts`] decomposes raw query text into a [`QueryModel`].
//! It never fails: clauses it cannot find come back empty, and the
//! validator reports those gaps.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lexer::TokenKind;
use crate::operator::Operator;
use crate::scanner::{
    split_conditions, split_csv_respecting_parens, strip_outer_parens, subquery_body, Scanner,
};

pub const SELECT_END: &[&str] = &["FROM"];
pub const WHERE_END: &[&str] = &[
    "GROUP BY", "ORDER BY", "LIMIT", "OFFSET", "HAVING", "WITH", "FOR",
];
pub const GROUP_BY_END: &[&str] = &["HAVING", "ORDER BY", "LIMIT", "OFFSET", "WITH", "FOR"];
pub const ORDER_BY_END: &[&str] = &["LIMIT", "OFFSET", "FOR"];
pub const LIMIT_END: &[&str] = &["OFFSET", "FOR"];
pub const OFFSET_END: &[&str] = &["LIMIT", "FOR"];

const AGGREGATE_FUNCTIONS: &[&str] = &["COUNT", "COUNT_DISTINCT", "SUM", "AVG", "MIN", "MAX"];

/// Structured view of a query's clauses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryModel {
    pub object_name: Option<String>,
    /// Select items verbatim: fields, relationship paths, aggregate calls,
    /// `FIELDS(...)` macros and `(SELECT ...)` subqueries
    pub select_fields: Vec<String>,
    pub group_by_fields: Vec<String>,
    pub has_group_by: bool,
    pub has_having: bool,
    pub has_order_by: bool,
    /// ORDER BY items with ASC/DESC and NULLS FIRST/LAST removed
    pub order_by_fields: Vec<String>,
    pub filters: Vec<Filter>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// LIMIT body as written, present whenever the keyword is
    pub raw_limit: Option<String>,
    pub raw_offset: Option<String>,
}

/// One `field operator value` condition of a WHERE clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    /// Right-hand side exactly as written
    pub raw_value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: Operator, raw_value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            raw_value: raw_value.into(),
        }
    }
}

/// Shape of a single select item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectItemKind {
    /// `Name`
    Field,
    /// `Owner.Name`
    Lookup,
    /// `(SELECT Id FROM Contacts)`
    Subquery,
    /// `COUNT(Id)`, `MAX(Amount) maxAmount`
    Aggregate,
    /// `FIELDS(ALL)`
    FieldsMacro,
    /// Anything else: other functions, aliased fields, TYPEOF
    Expression,
}

impl SelectItemKind {
    pub fn of(item: &str) -> Self {
        if subquery_body(item).is_some() {
            return SelectItemKind::Subquery;
        }
        let scanner = Scanner::new(item);
        let tokens = scanner.tokens();
        let Some(first) = tokens.first() else {
            return SelectItemKind::Expression;
        };
        let calls = tokens.get(1).map(|t| t.kind) == Some(TokenKind::LParen);
        if first.kind.is_word() && calls {
            let name = scanner.text(first);
            if name.eq_ignore_ascii_case("FIELDS") {
                return SelectItemKind::FieldsMacro;
            }
            if AGGREGATE_FUNCTIONS.iter().any(|f| name.eq_ignore_ascii_case(f)) {
                return SelectItemKind::Aggregate;
            }
            return SelectItemKind::Expression;
        }
        match path_len(&scanner) {
            Some(1) if tokens.len() == 1 => SelectItemKind::Field,
            Some(n) if n == tokens.len() => SelectItemKind::Lookup,
            _ => SelectItemKind::Expression,
        }
    }

    /// Items that count as plain, groupable columns
    pub fn is_column(&self) -> bool {
        matches!(
            self,
            SelectItemKind::Field | SelectItemKind::Lookup | SelectItemKind::Expression
        )
    }
}

/// Number of tokens in the identifier path (`a.b.c`) at the scanner's
/// position, if one starts there
fn path_len(scanner: &Scanner<'_>) -> Option<usize> {
    let first = scanner.peek()?;
    if !first.kind.is_word() {
        return None;
    }
    let mut len = 1;
    while scanner.peek_nth(len).map(|t| t.kind) == Some(TokenKind::Dot)
        && scanner.peek_nth(len + 1).is_some_and(|t| t.kind.is_word())
    {
        len += 2;
    }
    Some(len)
}

/// Parse query text into its clauses. Never fails.
pub fn parse_query_parts(query: &str) -> QueryModel {
    let mut scanner = Scanner::new(query);
    let mut model = QueryModel {
        object_name: scanner.object_name().map(str::to_string),
        ..QueryModel::default()
    };

    if let Some(select) = scanner.clause("SELECT", SELECT_END) {
        model.select_fields = split_items(select);
    }

    if let Some(where_clause) = scanner.clause("WHERE", WHERE_END) {
        debug!(target: "soqlkit::parser", "WHERE clause: {}", where_clause);
        model.filters = split_conditions(where_clause)
            .into_iter()
            .filter_map(parse_filter)
            .collect();
    }

    if let Some(group_by) = scanner.clause("GROUP BY", GROUP_BY_END) {
        model.has_group_by = true;
        model.group_by_fields = split_csv_respecting_parens(group_by)
            .into_iter()
            .flat_map(expand_grouping)
            .collect();
    }

    model.has_having = scanner.find_keyword("HAVING").is_some();

    if let Some(order_by) = scanner.clause("ORDER BY", ORDER_BY_END) {
        model.has_order_by = true;
        model.order_by_fields = split_csv_respecting_parens(order_by)
            .into_iter()
            .map(|item| strip_order_direction(item).to_string())
            .filter(|item| !item.is_empty())
            .collect();
    }

    if let Some(limit) = scanner.clause("LIMIT", LIMIT_END) {
        model.limit = parse_count(limit);
        model.raw_limit = Some(limit.to_string());
    }

    if let Some(offset) = scanner.clause("OFFSET", OFFSET_END) {
        model.offset = parse_count(offset);
        model.raw_offset = Some(offset.to_string());
    }

    debug!(
        target: "soqlkit::parser",
        object = ?model.object_name,
        select = model.select_fields.len(),
        filters = model.filters.len(),
        "parsed query"
    );
    model
}

/// A LIMIT/OFFSET count: ASCII digits only, so `+5` and `-1` are rejected
fn parse_count(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn split_items(list: &str) -> Vec<String> {
    split_csv_respecting_parens(list)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// `ROLLUP(a, b)` and `CUBE(a, b)` group by each of their arguments
fn expand_grouping(item: &str) -> Vec<String> {
    let scanner = Scanner::new(item);
    let is_grouping_fn = (scanner.at_keyword(&["ROLLUP"]) || scanner.at_keyword(&["CUBE"]))
        && scanner.peek_nth(1).map(|t| t.kind) == Some(TokenKind::LParen);
    if is_grouping_fn {
        let inner = scanner
            .peek_nth(1)
            .and_then(|open| strip_outer_parens(&item[open.span.start..]));
        if let Some(inner) = inner {
            return split_items(inner);
        }
    }
    vec![item.to_string()]
}

/// Parse one condition fragment into a filter
///
/// The field is an identifier path, optionally wrapped in a function call
/// (`CALENDAR_YEAR(CreatedDate)`). Fragments that start any other way,
/// such as parenthesized groups or `NOT`, yield `None`.
pub fn parse_filter(fragment: &str) -> Option<Filter> {
    let mut scanner = Scanner::new(fragment);
    let first = scanner.peek()?;
    if !first.kind.is_word() || first.kind == TokenKind::Not {
        return None;
    }
    let len = path_len(&scanner)?;
    scanner.skip(len);
    if scanner.peek().map(|t| t.kind) == Some(TokenKind::LParen) {
        scanner.skip_group();
    }
    let field_end = scanner.offset();

    let (operator, op_len) = Operator::match_at(&scanner)?;
    scanner.skip(op_len);
    let value_start = scanner.offset();

    Some(Filter {
        field: fragment[..field_end].trim().to_string(),
        operator,
        raw_value: fragment[value_start..].trim().to_string(),
    })
}

/// Drop a trailing `ASC`/`DESC` and `NULLS FIRST`/`NULLS LAST`
pub fn strip_order_direction(item: &str) -> &str {
    let mut scanner = Scanner::new(item);
    while let Some(token) = scanner.peek().copied() {
        if scanner.at_top_level()
            && matches!(token.kind, TokenKind::Asc | TokenKind::Desc | TokenKind::Nulls)
        {
            return item[..token.span.start].trim();
        }
        scanner.advance();
    }
    item.trim()
}

/// Select item without a trailing alias: `Name n` → `Name`
pub fn strip_alias(item: &str) -> &str {
    let scanner = Scanner::new(item);
    let tokens = scanner.tokens();
    if let Some(len) = path_len(&scanner) {
        let alias_follows = tokens.len() == len + 1
            && tokens[len].kind == TokenKind::Identifier;
        if alias_follows {
            return item[..tokens[len - 1].span.end].trim();
        }
    }
    item.trim()
}
