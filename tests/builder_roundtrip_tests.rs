//! Composer and importer working against each other

use pretty_assertions::assert_eq;
use soqlkit::{
    compose_query, import_query, parse_query_parts, BuilderState, FilterState, ImportError,
    Operator, OrderBy, SortDirection, SubqueryState,
};

fn sample_state() -> BuilderState {
    let mut state = BuilderState::new("Account");
    state.fields = vec!["Id".into(), "Name".into(), "Industry".into()];
    state.lookups = vec!["Owner.Name".into(), "Parent.Owner.Email".into()];
    state.subqueries = vec![SubqueryState {
        id: "sq1".into(),
        relationship: "Opportunities".into(),
        child_object: "Opportunity".into(),
        fields: "Id, Amount".into(),
        clauses: "WHERE StageName != 'Closed Lost' ORDER BY CloseDate LIMIT 3".into(),
    }];
    state.filters = vec![
        FilterState::new("f1", "Industry", Operator::Eq, "Technology"),
        FilterState::new("f2", "Type", Operator::NotIn, "Prospect, Other"),
        FilterState::new("f3", "CreatedDate", Operator::Ge, "LAST_N_DAYS:90"),
    ];
    state.order_by = Some(OrderBy {
        field: "Name".into(),
        dir: SortDirection::Desc,
    });
    state.limit = 25;
    state.offset = 50;
    state
}

#[test]
fn test_composed_query_parses_back() {
    let state = sample_state();
    let query = compose_query(&state);
    let model = parse_query_parts(&query);

    assert_eq!(model.object_name.as_deref(), Some("Account"));
    assert_eq!(
        model.select_fields,
        vec![
            "Id",
            "Name",
            "Industry",
            "Owner.Name",
            "Parent.Owner.Email",
            "(SELECT Id, Amount FROM Opportunities \
             WHERE StageName != 'Closed Lost' ORDER BY CloseDate LIMIT 3)",
        ]
    );
    assert_eq!(model.filters.len(), 3);
    assert_eq!(model.filters[1].operator, Operator::NotIn);
    assert_eq!(model.order_by_fields, vec!["Name"]);
    assert_eq!(model.limit, Some(25));
    assert_eq!(model.offset, Some(50));
}

#[test]
fn test_compose_import_compose_is_stable() {
    let state = sample_state();
    let first = compose_query(&state);
    let (imported, report) = import_query(&first, &state).unwrap();
    assert!(report.is_lossless(), "{:?}", report);
    assert_eq!(compose_query(&imported), first);

    assert_eq!(imported.fields, state.fields);
    assert_eq!(imported.lookups, state.lookups);
    assert_eq!(imported.subqueries, state.subqueries);
    assert_eq!(imported.order_by, state.order_by);
    assert_eq!((imported.limit, imported.offset), (25, 50));
}

#[test]
fn test_half_typed_text_is_rejected() {
    let state = sample_state();
    let query = compose_query(&state);
    for cut in [10, query.len() / 2, query.len() - 3] {
        let partial = &query[..cut];
        if let Err(e) = import_query(partial, &state) {
            assert!(matches!(
                e,
                ImportError::MissingFrom
                    | ImportError::UnbalancedParentheses
                    | ImportError::UnterminatedString
            ));
        }
    }
}

#[test]
fn test_escaped_values_survive_round_trips() {
    let mut state = BuilderState::new("Contact");
    state.filters = vec![
        FilterState::new("f1", "Name", Operator::Eq, r#"say "hi""#),
        FilterState::new("f2", "Path__c", Operator::Eq, r"C:\temp"),
        FilterState::new("f3", "LastName", Operator::Eq, "O'Brien"),
        FilterState::new("f4", "Title", Operator::Like, r"100\%"),
        FilterState::new(
            "f5",
            "Department",
            Operator::In,
            r#""Smith, Jones", "O'Brien", plain"#,
        ),
    ];

    let first = compose_query(&state);
    assert!(first.contains(r#"Name = "say \"hi\"""#), "{}", first);
    assert!(first.contains(r#"Path__c = "C:\\temp""#), "{}", first);
    assert!(first.contains(r#"IN ("Smith, Jones", "O'Brien", "plain")"#), "{}", first);

    let (imported, report) = import_query(&first, &state).unwrap();
    assert!(report.is_lossless(), "{:?}", report);
    assert_eq!(imported.filters, state.filters);
    assert_eq!(compose_query(&imported), first);

    let (again, _) = import_query(&compose_query(&imported), &imported).unwrap();
    assert_eq!(again, imported);
}

#[test]
fn test_single_quoted_text_imports_to_plain_values() {
    let text = r"SELECT Id FROM Contact WHERE LastName = 'O\'Brien' AND Notes__c = 'a\\b'";
    let (state, report) = import_query(text, &BuilderState::default()).unwrap();
    assert!(report.is_lossless());
    assert_eq!(state.filters[0].value, "O'Brien");
    assert_eq!(state.filters[1].value, r"a\b");
    assert_eq!(
        compose_query(&state),
        r#"SELECT Id FROM Contact WHERE LastName = "O'Brien" AND Notes__c = "a\\b""#
    );
}

#[test]
fn test_subquery_clauses_round_trip() {
    let text = "SELECT Id, (SELECT Id FROM Contacts WHERE Email != null ORDER BY Name LIMIT 5) \
                FROM Account";
    let (state, report) = import_query(text, &BuilderState::default()).unwrap();
    assert!(report.is_lossless(), "{:?}", report);
    assert_eq!(
        compose_query(&state),
        "SELECT Id, (SELECT Id FROM Contacts WHERE Email != null ORDER BY Name LIMIT 5) \
         FROM Account"
    );
}

#[test]
fn test_unrepresentable_paging_is_not_lossless() {
    let (state, report) =
        import_query("SELECT Id FROM Account LIMIT 5000000000", &BuilderState::default())
            .unwrap();
    assert_eq!(state.limit, 0);
    assert_eq!(report.dropped_paging, vec!["LIMIT 5000000000"]);
    assert!(!report.is_lossless());
}
