//! Semantic validation of SOQL queries
//!
//! The validator parses the query with [`parse_query_parts`], then runs
//! every rule in [`RULES`] against the result and an optional object
//! describe. It never fails: a query it cannot make sense of simply
//! produces messages.
//!
//! ```
//! use soqlkit::schema::{FieldDescribe, SObjectDescribe, SalesforceFieldType};
//! use soqlkit::validator::validate_soql;
//!
//! let account = SObjectDescribe::new("Account")
//!     .with_field(FieldDescribe::new("Name", SalesforceFieldType::String));
//!
//! let result = validate_soql("SELECT Name, COUNT(Id) FROM Account", Some(&account));
//! assert!(!result.ok);
//!
//! let result = validate_soql("SELECT Name, COUNT(Id) FROM Account GROUP BY Name", Some(&account));
//! assert!(result.ok);
//! ```

mod diagnostic;
pub mod rules;

pub use diagnostic::{Diagnostic, Severity};
pub use rules::{Rule, RuleContext, RULES};

use serde::Serialize;
use tracing::debug;

use crate::parser::{parse_query_parts, QueryModel};
use crate::schema::SObjectDescribe;

/// Switches for the rules that depend on context the caller may lack
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Report a query whose object has no describe
    pub require_describe: bool,
    /// Check filter values against field types from the describe
    pub check_value_types: bool,
    /// Warn when a semi-join selects bare `Id` from another object
    pub warn_id_semi_join: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            require_describe: true,
            check_value_types: true,
            warn_id_semi_join: true,
        }
    }
}

/// Outcome of validating one query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when no rule reported anything
    pub ok: bool,
    /// One message per finding, in rule order
    pub messages: Vec<String>,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
    pub parts: QueryModel,
}

impl ValidationResult {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SoqlValidator {
    config: ValidatorConfig,
}

impl SoqlValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn validate(&self, query: &str, describe: Option<&SObjectDescribe>) -> ValidationResult {
        self.validate_model(parse_query_parts(query), describe)
    }

    /// Run all rules over an already parsed query
    pub fn validate_model(
        &self,
        model: QueryModel,
        describe: Option<&SObjectDescribe>,
    ) -> ValidationResult {
        let ctx = RuleContext {
            model: &model,
            describe,
            config: &self.config,
        };

        let mut diagnostics = Vec::new();
        for (name, rule) in RULES {
            let found = rule(&ctx);
            if !found.is_empty() {
                debug!(
                    target: "soqlkit::validator",
                    rule = *name,
                    count = found.len(),
                    "rule reported"
                );
            }
            diagnostics.extend(found);
        }

        let messages = diagnostics.iter().map(ToString::to_string).collect();
        ValidationResult {
            ok: diagnostics.is_empty(),
            messages,
            diagnostics,
            parts: model,
        }
    }
}

/// Validate with the default configuration
pub fn validate_soql(query: &str, describe: Option<&SObjectDescribe>) -> ValidationResult {
    SoqlValidator::default().validate(query, describe)
}

pub fn validate_soql_with_config(
    query: &str,
    describe: Option<&SObjectDescribe>,
    config: ValidatorConfig,
) -> ValidationResult {
    SoqlValidator::new(config).validate(query, describe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::demo_describe;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_query_is_ok() {
        let account = demo_describe("Account").unwrap();
        let result = validate_soql(
            "SELECT Id, Name FROM Account WHERE Name LIKE 'Ac%' ORDER BY Name LIMIT 10",
            Some(&account),
        );
        assert!(result.ok, "{:?}", result.messages);
        assert_eq!(result.parts.object_name.as_deref(), Some("Account"));
    }

    #[test]
    fn test_missing_describe() {
        let result = validate_soql("SELECT Id FROM Widget__c", None);
        assert!(!result.ok);
        assert_eq!(result.messages, vec!["Failed to retrieve describe for Widget__c"]);

        let relaxed = ValidatorConfig {
            require_describe: false,
            ..ValidatorConfig::default()
        };
        assert!(validate_soql_with_config("SELECT Id FROM Widget__c", None, relaxed).ok);
    }

    #[test]
    fn test_messages_follow_rule_order() {
        let result = validate_soql("SELECT FROM Account HAVING COUNT(Id) > 1 OFFSET 5", None);
        assert_eq!(
            result.diagnostics,
            vec![
                Diagnostic::EmptySelect,
                Diagnostic::DescribeUnavailable("Account".into()),
                Diagnostic::OffsetWithoutLimit,
                Diagnostic::HavingWithoutGroupBy,
            ]
        );
        assert_eq!(result.messages.len(), result.diagnostics.len());
    }

    #[test]
    fn test_warnings_still_fail_validation() {
        let account = demo_describe("Account").unwrap();
        let result = validate_soql(
            "SELECT Id FROM Account WHERE Id IN (SELECT Id FROM Contact)",
            Some(&account),
        );
        assert!(!result.ok);
        assert_eq!(result.warnings().count(), 1);
        assert_eq!(result.errors().count(), 0);

        let quiet = ValidatorConfig {
            warn_id_semi_join: false,
            ..ValidatorConfig::default()
        };
        let result = SoqlValidator::new(quiet).validate(
            "SELECT Id FROM Account WHERE Id IN (SELECT Id FROM Contact)",
            Some(&account),
        );
        assert!(result.ok);
    }

    #[test]
    fn test_type_checks_can_be_disabled() {
        let account = demo_describe("Account").unwrap();
        let config = ValidatorConfig {
            check_value_types: false,
            ..ValidatorConfig::default()
        };
        let result = validate_soql_with_config(
            "SELECT Id FROM Account WHERE CreatedDate = 'TODAY'",
            Some(&account),
            config,
        );
        assert!(result.ok);
    }

    #[test]
    fn test_result_serializes_without_diagnostics() {
        let result = validate_soql("SELECT Id FROM Account", None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["parts"]["objectName"], "Account");
        assert!(json.get("diagnostics").is_none());
    }
}
