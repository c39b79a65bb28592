//! Structured, UI-editable query state
//!
//! A [`BuilderState`] is what the visual query builder edits. The composer
//! turns it into query text and the importer turns text back into it. The
//! state is plain data (serde, camelCase) so the UI can persist it as is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::operator::Operator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderState {
    pub enabled: bool,
    /// SObject API name
    pub object: String,
    /// Simple field names
    pub fields: Vec<String>,
    /// Dotted relationship paths (`Owner.Name`)
    pub lookups: Vec<String>,
    pub subqueries: Vec<SubqueryState>,
    pub filters: Vec<FilterState>,
    pub order_by: Option<OrderBy>,
    /// Zero leaves out the LIMIT clause
    pub limit: u32,
    /// Zero leaves out the OFFSET clause
    pub offset: u32,
    /// Pagination cursor owned by the UI
    pub after: String,
}

impl Default for BuilderState {
    fn default() -> Self {
        Self {
            enabled: true,
            object: String::new(),
            fields: vec!["Id".to_string()],
            lookups: Vec::new(),
            subqueries: Vec::new(),
            filters: Vec::new(),
            order_by: None,
            limit: 0,
            offset: 0,
            after: String::new(),
        }
    }
}

impl BuilderState {
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            ..Self::default()
        }
    }
}

/// Child relationship subquery in the SELECT list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubqueryState {
    pub id: String,
    /// Relationship name used after FROM (`Contacts`)
    pub relationship: String,
    /// Child SObject behind the relationship (`Contact`), if known
    #[serde(default)]
    pub child_object: String,
    /// Comma-separated field list
    #[serde(default)]
    pub fields: String,
    /// Everything after `FROM <relationship>`, e.g. `WHERE … ORDER BY … LIMIT 5`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub clauses: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub id: String,
    pub field: String,
    pub op: Operator,
    /// Unquoted value; a comma-separated list for list operators
    #[serde(default)]
    pub value: String,
}

impl FilterState {
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        op: Operator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBy {
    pub field: String,
    #[serde(default)]
    pub dir: SortDirection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let state = BuilderState::default();
        assert!(state.enabled);
        assert_eq!(state.fields, vec!["Id"]);
        assert_eq!(state.limit, 0);
        assert!(state.order_by.is_none());
    }

    #[test]
    fn test_persisted_json_shape() {
        let mut state = BuilderState::new("Account");
        state.filters.push(FilterState::new("f1", "Type", Operator::NotIn, "a, b"));
        state.order_by = Some(OrderBy {
            field: "Name".to_string(),
            dir: SortDirection::Desc,
        });

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["object"], "Account");
        assert_eq!(json["filters"][0]["op"], "NOT IN");
        assert_eq!(json["orderBy"]["dir"], "DESC");

        let back: BuilderState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let state: BuilderState = serde_json::from_str(r#"{"object": "Contact"}"#).unwrap();
        assert_eq!(state.object, "Contact");
        assert_eq!(state.fields, vec!["Id"]);
        assert!(state.enabled);
    }
}
