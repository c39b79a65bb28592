//! Builder state from free-typed query text
//!
//! The importer is the inverse of the composer. It sorts select items into
//! buckets by shape (`Name` → fields, `Owner.Name` → lookups,
//! `(SELECT …)` → subqueries) and re-derives filters, ordering and paging.
//! Text that is not a query yet (no top-level FROM, open parens or quotes)
//! is rejected so the caller keeps its last good state.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::builder::{BuilderState, FilterState, OrderBy, SortDirection, SubqueryState};
use crate::composer::quote_value;
use crate::lexer::TokenKind;
use crate::operator::Operator;
use crate::parser::{
    parse_filter, parse_query_parts, strip_order_direction, SelectItemKind, ORDER_BY_END,
    SELECT_END, WHERE_END,
};
use crate::scanner::{
    split_conditions, split_csv_respecting_parens, strip_outer_parens, subquery_body,
    trim_quotes, unquote_literal, Scanner,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Query has no SELECT clause")]
    MissingSelect,
    #[error("Query has no top-level FROM with an object name")]
    MissingFrom,
    #[error("Parentheses are not balanced")]
    UnbalancedParentheses,
    #[error("String literal is not terminated")]
    UnterminatedString,
}

/// Parts of the query the builder cannot represent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Select items that are neither fields, lookups nor subqueries
    pub unsupported_items: Vec<String>,
    /// WHERE fragments that are not a plain `field op value`
    pub unsupported_filters: Vec<String>,
    /// ORDER BY items after the first
    pub dropped_order_by: Vec<String>,
    /// LIMIT or OFFSET clauses that are not a count the builder can hold
    pub dropped_paging: Vec<String>,
    /// The WHERE clause used `OR`; the builder joins everything with `AND`
    pub uses_or: bool,
}

impl ImportReport {
    /// True when composing the imported state reproduces the query's meaning
    pub fn is_lossless(&self) -> bool {
        self.unsupported_items.is_empty()
            && self.unsupported_filters.is_empty()
            && self.dropped_order_by.is_empty()
            && self.dropped_paging.is_empty()
            && !self.uses_or
    }
}

/// Build a new state from `text`, carrying over what the text cannot say
/// (`enabled`, `after`, subquery ids and child objects) from `previous`
pub fn import_query(
    text: &str,
    previous: &BuilderState,
) -> Result<(BuilderState, ImportReport), ImportError> {
    let mut scanner = Scanner::new(text);
    if scanner.has_unterminated_string() {
        return Err(ImportError::UnterminatedString);
    }
    if !scanner.is_balanced() {
        return Err(ImportError::UnbalancedParentheses);
    }
    if scanner.clause("SELECT", SELECT_END).is_none() {
        return Err(ImportError::MissingSelect);
    }
    let object = scanner
        .object_name()
        .ok_or(ImportError::MissingFrom)?
        .to_string();

    let model = parse_query_parts(text);
    let mut report = ImportReport::default();

    let mut state = BuilderState {
        enabled: previous.enabled,
        object,
        fields: Vec::new(),
        lookups: Vec::new(),
        subqueries: Vec::new(),
        filters: Vec::new(),
        order_by: None,
        limit: import_count("LIMIT", model.limit, &model.raw_limit, &mut report),
        offset: import_count("OFFSET", model.offset, &model.raw_offset, &mut report),
        after: previous.after.clone(),
    };

    for item in &model.select_fields {
        match SelectItemKind::of(item) {
            SelectItemKind::Field => state.fields.push(item.clone()),
            SelectItemKind::Lookup => state.lookups.push(item.clone()),
            SelectItemKind::Subquery => {
                match import_subquery(item, state.subqueries.len(), previous) {
                    Some(subquery) => state.subqueries.push(subquery),
                    None => report.unsupported_items.push(item.clone()),
                }
            }
            _ => report.unsupported_items.push(item.clone()),
        }
    }

    if let Some(where_clause) = scanner.clause("WHERE", WHERE_END) {
        report.uses_or = Scanner::new(where_clause)
            .tokens()
            .iter()
            .any(|t| t.kind == TokenKind::Or);
        for fragment in split_conditions(where_clause) {
            match parse_filter(fragment) {
                Some(filter) => {
                    let id = format!("f{}", state.filters.len() + 1);
                    let value = import_value(filter.operator, &filter.raw_value);
                    state
                        .filters
                        .push(FilterState::new(id, filter.field, filter.operator, value));
                }
                None => report.unsupported_filters.push(fragment.to_string()),
            }
        }
    }

    if let Some(order_by) = scanner.clause("ORDER BY", ORDER_BY_END) {
        let mut items = split_csv_respecting_parens(order_by).into_iter();
        if let Some(first) = items.next() {
            state.order_by = Some(import_order_by(first));
        }
        report.dropped_order_by = items.map(str::to_string).collect();
    }

    debug!(
        target: "soqlkit::importer",
        object = %state.object,
        fields = state.fields.len(),
        lookups = state.lookups.len(),
        subqueries = state.subqueries.len(),
        filters = state.filters.len(),
        lossless = report.is_lossless(),
        "imported query"
    );
    Ok((state, report))
}

/// LIMIT/OFFSET count; zero (no clause) when absent, and reported when
/// present but not a `u32`
fn import_count(
    keyword: &str,
    parsed: Option<u64>,
    raw: &Option<String>,
    report: &mut ImportReport,
) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    match parsed.and_then(|n| u32::try_from(n).ok()) {
        Some(n) => n,
        None => {
            report.dropped_paging.push(format!("{} {}", keyword, raw));
            0
        }
    }
}

fn import_subquery(item: &str, index: usize, previous: &BuilderState) -> Option<SubqueryState> {
    let body = subquery_body(item)?;
    let inner = parse_query_parts(body);
    let relationship = inner.object_name?;
    let known = previous
        .subqueries
        .iter()
        .find(|s| s.relationship.eq_ignore_ascii_case(&relationship));

    Some(SubqueryState {
        id: known.map_or_else(|| format!("sq{}", index + 1), |s| s.id.clone()),
        child_object: known.map(|s| s.child_object.clone()).unwrap_or_default(),
        fields: inner.select_fields.join(", "),
        clauses: clauses_after_from(body).to_string(),
        relationship,
    })
}

/// Text following `FROM <object>` in a query body
fn clauses_after_from(body: &str) -> &str {
    let mut scanner = Scanner::new(body);
    if scanner.find_keyword("FROM").is_none() {
        return "";
    }
    match scanner.peek_nth(1) {
        Some(object) => body[object.span.end..].trim(),
        None => "",
    }
}

/// Builder value for a filter: literals decoded, lists flattened to
/// `a, b`, subqueries kept whole
fn import_value(op: Operator, raw: &str) -> String {
    if op.takes_list() {
        if subquery_body(raw).is_some() {
            return raw.trim().to_string();
        }
        if let Some(inner) = strip_outer_parens(raw) {
            return split_csv_respecting_parens(inner)
                .into_iter()
                .map(|item| import_literal(item, true))
                .collect::<Vec<_>>()
                .join(", ");
        }
    }
    import_literal(raw, false)
}

/// Decoded literal, re-quoted when the plain text would not compose back
/// to the same value: it looks quoted itself, has edge whitespace, or (in
/// a list) would split apart on a comma or quote
fn import_literal(raw: &str, in_list: bool) -> String {
    let value = unquote_literal(raw);
    let reads_back = trim_quotes(&value).len() == value.len() && value.trim() == value;
    let splits_back = !value.is_empty()
        && !value.starts_with('(')
        && !value.contains([',', '\'', '"']);
    if reads_back && (!in_list || splits_back) {
        value
    } else {
        quote_value(Some(&value))
    }
}

fn import_order_by(item: &str) -> OrderBy {
    let descending = Scanner::new(item)
        .tokens()
        .iter()
        .any(|t| t.kind == TokenKind::Desc);
    OrderBy {
        field: strip_order_direction(item).to_string(),
        dir: if descending {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    }
}

impl BuilderState {
    /// Replace this state with one imported from `text`
    ///
    /// On error the state is left untouched, so a half-typed query never
    /// wipes out the last structure that parsed.
    pub fn apply_query(&mut self, text: &str) -> Result<ImportReport, ImportError> {
        let (state, report) = import_query(text, self)?;
        *self = state;
        Ok(report)
    }
}
