//! End-to-end validation against describes

use pretty_assertions::assert_eq;
use soqlkit::schema::{demo_describe, DescribeCache};
use soqlkit::{
    validate_soql, Diagnostic, FieldDescribe, SObjectDescribe, SalesforceFieldType, Severity,
};
use std::time::Duration;

fn account() -> SObjectDescribe {
    SObjectDescribe::new("Account")
        .with_field(FieldDescribe::new("Id", SalesforceFieldType::Id))
        .with_field(FieldDescribe::new("Name", SalesforceFieldType::String))
        .with_field(FieldDescribe::new("Industry", SalesforceFieldType::Picklist))
        .with_field(FieldDescribe::new("CreatedDate", SalesforceFieldType::DateTime))
        .with_field(
            FieldDescribe::new("ParentId", SalesforceFieldType::Reference)
                .with_reference("Account"),
        )
}

fn contact() -> SObjectDescribe {
    SObjectDescribe::new("Contact")
        .with_field(FieldDescribe::new("Id", SalesforceFieldType::Id))
        .with_field(
            FieldDescribe::new("AccountId", SalesforceFieldType::Reference)
                .with_reference("Account"),
        )
}

#[test]
fn test_aggregate_requires_group_by() {
    let describe = account();
    let result = validate_soql("SELECT Name, COUNT(Id) FROM Account", Some(&describe));
    assert!(!result.ok);
    assert_eq!(result.diagnostics, vec![Diagnostic::AggregateWithoutGroupBy]);

    let grouped = "SELECT Name, COUNT(Id) FROM Account GROUP BY Name";
    let result = validate_soql(grouped, Some(&describe));
    assert!(result.ok, "{:?}", result.messages);
}

#[test]
fn test_date_literal_on_datetime_field() {
    let describe = account();
    let accepts = |condition: &str| {
        let query = format!("SELECT Id FROM Account WHERE {}", condition);
        validate_soql(&query, Some(&describe)).ok
    };
    assert!(!accepts("CreatedDate = 'TODAY'"));
    assert!(accepts("CreatedDate = TODAY"));
    assert!(accepts("CreatedDate = NEXT_N_WEEKS:2"));
}

#[test]
fn test_limit_and_offset() {
    let describe = account();
    assert!(validate_soql("SELECT Id FROM Account LIMIT 10 OFFSET 5", Some(&describe)).ok);
    let result = validate_soql("SELECT Id FROM Account OFFSET 5", Some(&describe));
    assert_eq!(result.diagnostics, vec![Diagnostic::OffsetWithoutLimit]);
}

#[test]
fn test_reference_ids() {
    let describe = contact();
    for id in ["'001000000000001'", "'001000000000001AAA'"] {
        let query = format!("SELECT Id FROM Contact WHERE AccountId = {}", id);
        assert!(validate_soql(&query, Some(&describe)).ok, "{}", query);
    }
    let result = validate_soql("SELECT Id FROM Contact WHERE AccountId = '12345'", Some(&describe));
    assert!(!result.ok);
    assert!(matches!(result.diagnostics[0], Diagnostic::IdValue { .. }));
}

#[test]
fn test_semi_join_on_demo_objects() {
    let describe = demo_describe("Account").unwrap();
    let result = validate_soql(
        "SELECT Id FROM Account WHERE Id IN (SELECT AccountId FROM Contact)",
        Some(&describe),
    );
    assert!(result.ok, "{:?}", result.messages);

    let result = validate_soql(
        "SELECT Id FROM Account WHERE Id IN (SELECT Id FROM Contact)",
        Some(&describe),
    );
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].severity(), Severity::Warning);
    assert!(result.messages[0].contains("AccountId"));
}

#[test]
fn test_demo_describe_tolerates_other_objects() {
    let describe = demo_describe("Account").unwrap();
    let result = validate_soql("SELECT Id FROM Opportunity", Some(&describe));
    assert!(result.ok);

    let result = validate_soql("SELECT Id FROM Opportunity", Some(&account()));
    assert!(matches!(result.diagnostics[0], Diagnostic::ObjectMismatch { .. }));
}

#[test]
fn test_several_findings_in_one_query() {
    let describe = account();
    let result = validate_soql(
        "SELECT Name, Industry, COUNT(Id) FROM Account \
         WHERE Name = Acme AND ParentId = null AND Industry IN 'Tech' \
         GROUP BY Name",
        Some(&describe),
    );
    assert_eq!(
        result.messages,
        vec![
            "Field 'Industry' must be aggregated or appear in GROUP BY",
            "IN on 'Industry' requires a parenthesized list or subquery",
            "Text field 'Name' expects a quoted value for = (found Acme)",
            "'ParentId = null' should be written as ParentId IS NULL",
        ]
    );
}

#[test]
fn test_cached_describe_drives_validation() {
    let mut cache = DescribeCache::new(Duration::from_secs(300));
    let start = Duration::from_secs(1_000);
    cache.insert(account(), start);

    let describe = cache.get("account", start + Duration::from_secs(10));
    assert!(validate_soql("SELECT Id FROM Account", describe).ok);

    let expired = cache.get("Account", start + Duration::from_secs(300));
    assert!(expired.is_none());
    let result = validate_soql("SELECT Id FROM Account", expired);
    assert_eq!(result.messages, vec!["Failed to retrieve describe for Account"]);
}
