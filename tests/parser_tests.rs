//! Clause extraction and query parsing on realistic queries

use pretty_assertions::assert_eq;
use soqlkit::parser::{ORDER_BY_END, WHERE_END};
use soqlkit::{extract_clause, parse_query_parts, split_csv_respecting_parens, Filter, Operator};

#[test]
fn test_clause_keywords_need_word_boundaries() {
    let query = "SELECT Id FROM Account WHERE Name = 'Fromage' ORDER BY Name";
    assert_eq!(extract_clause(query, "WHERE", WHERE_END), Some("Name = 'Fromage'"));
    assert_eq!(parse_query_parts(query).object_name.as_deref(), Some("Account"));

    let query = "SELECT Id, Selected__c, OrderByDate__c FROM Limits__c WHERE Wherever__c = 1";
    let model = parse_query_parts(query);
    assert_eq!(model.object_name.as_deref(), Some("Limits__c"));
    assert_eq!(model.select_fields, vec!["Id", "Selected__c", "OrderByDate__c"]);
    assert!(!model.has_order_by);
    assert_eq!(model.limit, None);
}

#[test]
fn test_keywords_inside_strings_are_ignored() {
    let query = "SELECT Id FROM Case WHERE Subject = 'ORDER BY LIMIT 5' LIMIT 10";
    assert_eq!(extract_clause(query, "ORDER BY", ORDER_BY_END), None);
    let model = parse_query_parts(query);
    assert_eq!(model.limit, Some(10));
    assert_eq!(
        model.filters,
        vec![Filter::new("Subject", Operator::Eq, "'ORDER BY LIMIT 5'")]
    );
}

#[test]
fn test_csv_split_respects_nesting_and_quotes() {
    assert_eq!(
        split_csv_respecting_parens("Id, (SELECT Id, Name FROM Contacts), 'a,b', COUNT(Id)"),
        vec!["Id", "(SELECT Id, Name FROM Contacts)", "'a,b'", "COUNT(Id)"]
    );
}

#[test]
fn test_full_query_model() {
    let model = parse_query_parts(
        "select Industry, count(Id) total from Account \
         where AnnualRevenue >= 1000000 and Name not like 'Test%' and Type in ('A', 'B') \
         group by Industry having count(Id) > 2 order by Industry desc nulls last \
         limit 50 offset 100",
    );
    assert_eq!(model.object_name.as_deref(), Some("Account"));
    assert_eq!(model.select_fields, vec!["Industry", "count(Id) total"]);
    assert_eq!(
        model.filters,
        vec![
            Filter::new("AnnualRevenue", Operator::Ge, "1000000"),
            Filter::new("Name", Operator::NotLike, "'Test%'"),
            Filter::new("Type", Operator::In, "('A', 'B')"),
        ]
    );
    assert!(model.has_group_by);
    assert_eq!(model.group_by_fields, vec!["Industry"]);
    assert!(model.has_having);
    assert_eq!(model.order_by_fields, vec!["Industry"]);
    assert_eq!(model.limit, Some(50));
    assert_eq!(model.offset, Some(100));
}

#[test]
fn test_parser_never_fails() {
    for text in [
        "",
        "SELECT",
        "SELECT Id FROM",
        "WHERE = = =",
        "SELECT (((",
        "SELECT Id FROM Account WHERE Name = 'unterminated",
        "))) FROM (",
        "SELECT Ünïcödé FROM Àccount",
    ] {
        let _ = parse_query_parts(text);
    }
    assert_eq!(parse_query_parts("SELECT Id FROM").object_name, None);
}
