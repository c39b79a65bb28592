//! The validation rules, in reporting order
//!
//! Each rule is a pure function over the parsed query and the optional
//! describe. Rules never depend on one another; the table order only fixes
//! the order of messages.

use crate::composer::is_bind_variable;
use crate::operator::Operator;
use crate::parser::{parse_query_parts, strip_alias, Filter, QueryModel, SelectItemKind};
use crate::scanner::{
    split_csv_respecting_parens, strip_outer_parens, subquery_body, trim_quotes, Scanner,
};
use crate::schema::{
    is_date_literal, is_iso_date, is_iso_datetime, FieldDescribe, SObjectDescribe,
    SalesforceFieldType,
};

use super::diagnostic::Diagnostic;
use super::ValidatorConfig;

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub model: &'a QueryModel,
    pub describe: Option<&'a SObjectDescribe>,
    pub config: &'a ValidatorConfig,
}

pub type Rule = fn(&RuleContext<'_>) -> Vec<Diagnostic>;

/// All rules, in the order their messages are reported
pub const RULES: &[(&str, Rule)] = &[
    ("select_not_empty", select_not_empty),
    ("object_present", object_present),
    ("describe_available", describe_available),
    ("describe_matches_object", describe_matches_object),
    ("fields_macro_alone", fields_macro_alone),
    ("order_by_has_fields", order_by_has_fields),
    ("limit_and_offset", limit_and_offset),
    ("aggregates_need_group_by", aggregates_need_group_by),
    ("grouped_fields", grouped_fields),
    ("having_needs_group_by", having_needs_group_by),
    ("no_order_by_in_subquery", no_order_by_in_subquery),
    ("semi_join_shape", semi_join_shape),
    ("list_operator_rhs", list_operator_rhs),
    ("value_types", value_types),
    ("null_equality", null_equality),
];

fn kinds(model: &QueryModel) -> impl Iterator<Item = (&String, SelectItemKind)> {
    model
        .select_fields
        .iter()
        .map(|item| (item, SelectItemKind::of(item)))
}

pub fn select_not_empty(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    if ctx.model.select_fields.is_empty() {
        vec![Diagnostic::EmptySelect]
    } else {
        vec![]
    }
}

pub fn object_present(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    if ctx.model.object_name.is_none() {
        vec![Diagnostic::MissingObject]
    } else {
        vec![]
    }
}

pub fn describe_available(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    match (&ctx.model.object_name, ctx.describe) {
        (Some(object), None) if ctx.config.require_describe => {
            vec![Diagnostic::DescribeUnavailable(object.clone())]
        }
        _ => vec![],
    }
}

pub fn describe_matches_object(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    match (&ctx.model.object_name, ctx.describe) {
        (Some(object), Some(describe))
            if !describe.is_demo && !describe.name.eq_ignore_ascii_case(object) =>
        {
            vec![Diagnostic::ObjectMismatch {
                query_object: object.clone(),
                describe_object: describe.name.clone(),
            }]
        }
        _ => vec![],
    }
}

pub fn fields_macro_alone(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let items: Vec<SelectItemKind> = kinds(ctx.model).map(|(_, kind)| kind).collect();
    if !items.contains(&SelectItemKind::FieldsMacro) {
        return vec![];
    }
    let mut found = Vec::new();
    if items.iter().any(SelectItemKind::is_column) {
        found.push(Diagnostic::FieldsMacroWithFields);
    }
    if items.contains(&SelectItemKind::Aggregate) {
        found.push(Diagnostic::FieldsMacroWithAggregate);
    }
    found
}

pub fn order_by_has_fields(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    if ctx.model.has_order_by && ctx.model.order_by_fields.is_empty() {
        vec![Diagnostic::EmptyOrderBy]
    } else {
        vec![]
    }
}

pub fn limit_and_offset(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let model = ctx.model;
    let mut found = Vec::new();
    if let (Some(raw), None) = (&model.raw_limit, model.limit) {
        found.push(Diagnostic::InvalidLimit(raw.clone()));
    }
    if let (Some(raw), None) = (&model.raw_offset, model.offset) {
        found.push(Diagnostic::InvalidOffset(raw.clone()));
    }
    if model.raw_offset.is_some() && model.raw_limit.is_none() {
        found.push(Diagnostic::OffsetWithoutLimit);
    }
    found
}

pub fn aggregates_need_group_by(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    if ctx.model.has_group_by {
        return vec![];
    }
    let has_aggregate = kinds(ctx.model).any(|(_, k)| k == SelectItemKind::Aggregate);
    let has_column = kinds(ctx.model).any(|(_, k)| k.is_column());
    if has_aggregate && has_column {
        vec![Diagnostic::AggregateWithoutGroupBy]
    } else {
        vec![]
    }
}

pub fn grouped_fields(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    if !ctx.model.has_group_by {
        return vec![];
    }
    kinds(ctx.model)
        .filter(|(_, kind)| kind.is_column())
        .map(|(item, _)| strip_alias(item))
        .filter(|field| {
            !ctx.model
                .group_by_fields
                .iter()
                .any(|g| g.eq_ignore_ascii_case(field))
        })
        .map(|field| Diagnostic::FieldNotGrouped(field.to_string()))
        .collect()
}

pub fn having_needs_group_by(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    if ctx.model.has_having && !ctx.model.has_group_by {
        vec![Diagnostic::HavingWithoutGroupBy]
    } else {
        vec![]
    }
}

/// Subqueries in the select list and on the right of list operators
fn subqueries(model: &QueryModel) -> impl Iterator<Item = &str> {
    let in_select = model.select_fields.iter().filter_map(|i| subquery_body(i));
    let in_where = model
        .filters
        .iter()
        .filter(|f| f.operator.takes_list())
        .filter_map(|f| subquery_body(&f.raw_value));
    in_select.chain(in_where)
}

pub fn no_order_by_in_subquery(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    subqueries(ctx.model)
        .filter(|body| Scanner::new(body).find_keyword("ORDER BY").is_some())
        .map(|body| Diagnostic::OrderByInSubquery(format!("({})", body)))
        .collect()
}

pub fn semi_join_shape(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let mut found = Vec::new();
    for filter in &ctx.model.filters {
        if !filter.operator.is_membership() {
            continue;
        }
        let Some(body) = subquery_body(&filter.raw_value) else {
            continue;
        };
        let inner = parse_query_parts(body);
        if inner.select_fields.len() != 1 {
            found.push(Diagnostic::SemiJoinFieldCount {
                field: filter.field.clone(),
                count: inner.select_fields.len(),
            });
            continue;
        }
        if !ctx.config.warn_id_semi_join || !inner.select_fields[0].eq_ignore_ascii_case("Id") {
            continue;
        }
        if let (Some(outer), Some(sub)) = (&ctx.model.object_name, &inner.object_name) {
            if !outer.eq_ignore_ascii_case(sub) {
                found.push(Diagnostic::SemiJoinSelectsId {
                    field: filter.field.clone(),
                    subquery_object: sub.clone(),
                    outer_object: outer.clone(),
                });
            }
        }
    }
    found
}

pub fn list_operator_rhs(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let mut found = Vec::new();
    for filter in ctx.model.filters.iter().filter(|f| f.operator.takes_list()) {
        let field = filter.field.clone();
        let operator = filter.operator.to_string();
        let scanner = Scanner::new(&filter.raw_value);
        if scanner.peek().is_some_and(|t| t.kind.is_comparison()) {
            found.push(Diagnostic::ComparisonAfterListOperator { field, operator });
        } else if strip_outer_parens(&filter.raw_value).is_none() {
            found.push(Diagnostic::ListOperatorRequiresList { field, operator });
        }
    }
    found
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2 && trim_quotes(value).len() == value.len() - 2
}

fn is_numeric_literal(value: &str) -> bool {
    let digits = value.strip_prefix(['-', '+']).unwrap_or(value);
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && fraction.map_or(true, all_digits)
}

fn is_record_id(value: &str) -> bool {
    matches!(value.len(), 15 | 18) && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Values a filter compares against, or nothing when the right-hand side
/// is a subquery or not a usable list
fn filter_values(filter: &Filter) -> Vec<&str> {
    if !filter.operator.takes_list() {
        return vec![filter.raw_value.trim()];
    }
    if subquery_body(&filter.raw_value).is_some() {
        return vec![];
    }
    strip_outer_parens(&filter.raw_value)
        .map(split_csv_respecting_parens)
        .unwrap_or_default()
}

fn check_value(field: &FieldDescribe, op: Operator, value: &str) -> Option<Diagnostic> {
    let name = || field.name.clone();
    let found = || value.to_string();
    let ty = field.field_type;

    if ty == SalesforceFieldType::Boolean {
        let bare = value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false");
        return (!bare).then(|| Diagnostic::BooleanValue {
            field: name(),
            value: found(),
        });
    }
    if ty.is_numeric() {
        return (!is_numeric_literal(value)).then(|| Diagnostic::NumericValue {
            field: name(),
            value: found(),
        });
    }
    if ty.is_date() {
        if is_quoted(value) {
            return Some(Diagnostic::DateValueQuoted {
                field: name(),
                value: found(),
            });
        }
        let valid = is_date_literal(value)
            || is_iso_date(value)
            || (ty == SalesforceFieldType::DateTime && is_iso_datetime(value));
        return (!valid).then(|| Diagnostic::DateValue {
            field: name(),
            value: found(),
        });
    }
    if ty.is_id() {
        return (!is_record_id(trim_quotes(value))).then(|| Diagnostic::IdValue {
            field: name(),
            value: found(),
        });
    }
    if ty.is_string_like() {
        let needs_quotes = op.is_like() || matches!(op, Operator::Eq | Operator::NotEq);
        return (needs_quotes && !is_quoted(value)).then(|| Diagnostic::StringValueUnquoted {
            field: name(),
            operator: op.to_string(),
            value: found(),
        });
    }
    None
}

pub fn value_types(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let Some(describe) = ctx.describe else {
        return vec![];
    };
    if !ctx.config.check_value_types {
        return vec![];
    }
    let mut found = Vec::new();
    for filter in &ctx.model.filters {
        if SelectItemKind::of(&filter.field) != SelectItemKind::Field {
            continue;
        }
        let Some(field) = describe.get_field(&filter.field) else {
            continue;
        };
        for value in filter_values(filter) {
            if value.eq_ignore_ascii_case("null") || is_bind_variable(value) {
                continue;
            }
            found.extend(check_value(field, filter.operator, value));
        }
    }
    found
}

pub fn null_equality(ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    ctx.model
        .filters
        .iter()
        .filter(|f| f.operator == Operator::Eq && f.raw_value.eq_ignore_ascii_case("null"))
        .map(|f| Diagnostic::NullEquality(f.field.clone()))
        .collect()
}
