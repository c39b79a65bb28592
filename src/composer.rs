//! Query text from builder state
//!
//! Output is canonical: clauses in SOQL order, single spaces, empty clauses
//! left out. SELECT items are always emitted as simple fields, then lookups,
//! then subqueries; the importer relies on that order to sort items back
//! into the same buckets.

use tracing::debug;

use crate::builder::{BuilderState, FilterState, SubqueryState};
use crate::scanner::{split_csv_respecting_parens, unquote_literal};
use crate::schema::is_date_literal;

/// Render a literal for a WHERE clause
///
/// `None` is `null`, `true`/`false` (any case) stay bare booleans, and a
/// number is passed through only when it reads back identically. Anything
/// else becomes a JSON string literal.
pub fn quote_value(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "null".to_string();
    };
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return value.to_ascii_lowercase();
    }
    if is_canonical_number(value) {
        return value.to_string();
    }
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
}

/// True when `value` is exactly how the number it denotes would be printed
/// (`"42"`, `"1.5"`, but not `"1.50"`, `"+1"` or `"1e3"`)
fn is_canonical_number(value: &str) -> bool {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => format_number(n).is_some_and(|s| s == value),
        _ => false,
    }
}

/// Shortest decimal form, as JavaScript prints numbers outside exponent range
fn format_number(n: f64) -> Option<String> {
    if n == 0.0 {
        return Some("0".to_string());
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        return None;
    }
    Some(format!("{}", n))
}

pub(crate) fn is_bind_variable(value: &str) -> bool {
    value.strip_prefix(':').is_some_and(|name| {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
    })
}

/// Value as it should appear on the right-hand side of a comparison. A
/// value already written as a string literal is decoded first.
fn render_value(value: &str) -> String {
    let value = unquote_literal(value);
    if value.eq_ignore_ascii_case("null") {
        return "null".to_string();
    }
    if is_date_literal(&value) || is_bind_variable(&value) {
        return value;
    }
    quote_value(Some(&value))
}

/// `( … )` list from a comma-separated value; a value already wrapped in
/// parentheses (a subquery or hand-written list) is kept verbatim
fn render_list(value: &str) -> String {
    let value = value.trim();
    if value.starts_with('(') {
        return value.to_string();
    }
    let items: Vec<String> = split_csv_respecting_parens(value)
        .into_iter()
        .map(render_value)
        .collect();
    format!("({})", items.join(", "))
}

fn render_filter(filter: &FilterState) -> String {
    let rhs = if filter.op.takes_list() {
        render_list(&filter.value)
    } else {
        render_value(&filter.value)
    };
    format!("{} {} {}", filter.field.trim(), filter.op, rhs)
}

/// WHERE body: every filter with a field, joined with `AND` in order
pub fn compose_where(filters: &[FilterState]) -> String {
    filters
        .iter()
        .filter(|f| !f.field.trim().is_empty())
        .map(render_filter)
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn render_subquery(subquery: &SubqueryState) -> String {
    let fields = subquery.fields.trim();
    let fields = if fields.is_empty() { "Id" } else { fields };
    let relationship = subquery.relationship.trim();
    match subquery.clauses.trim() {
        "" => format!("(SELECT {} FROM {})", fields, relationship),
        clauses => format!("(SELECT {} FROM {} {})", fields, relationship, clauses),
    }
}

/// SELECT list: fields, then lookups, then subqueries. Falls back to `Id`.
pub fn compose_selection(state: &BuilderState) -> String {
    let fields = state.fields.iter().chain(&state.lookups).map(|f| f.trim());
    let subqueries = state
        .subqueries
        .iter()
        .filter(|s| !s.relationship.trim().is_empty())
        .map(render_subquery);

    let mut items: Vec<String> = fields
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .chain(subqueries)
        .collect();
    if items.is_empty() {
        items.push("Id".to_string());
    }
    items.join(", ")
}

/// Everything after `FROM <object>`: WHERE, ORDER BY, LIMIT, OFFSET
pub fn compose_args(state: &BuilderState) -> String {
    let mut clauses = Vec::new();

    let where_clause = compose_where(&state.filters);
    if !where_clause.is_empty() {
        clauses.push(format!("WHERE {}", where_clause));
    }

    if let Some(order_by) = &state.order_by {
        let field = order_by.field.trim();
        if !field.is_empty() {
            clauses.push(format!("ORDER BY {} {}", field, order_by.dir));
        }
    }

    if state.limit > 0 {
        clauses.push(format!("LIMIT {}", state.limit));
    }
    if state.offset > 0 {
        clauses.push(format!("OFFSET {}", state.offset));
    }

    clauses.join(" ")
}

/// Full query text, or an empty string while no object is chosen
pub fn compose_query(state: &BuilderState) -> String {
    let object = state.object.trim();
    if object.is_empty() {
        return String::new();
    }
    let mut query = format!("SELECT {} FROM {}", compose_selection(state), object);
    let args = compose_args(state);
    if !args.is_empty() {
        query.push(' ');
        query.push_str(&args);
    }
    debug!(target: "soqlkit::composer", query = %query, "composed query");
    query
}
