use soqlkit::schema::demo_describe;
use soqlkit::{
    compose_query, import_query, parse_query_parts, tokenize, validate_soql, BuilderState,
};

const DEFAULT_QUERY: &str = "SELECT Id, Name, Owner.Name, (SELECT Id, Email FROM Contacts) \
    FROM Account WHERE Industry = 'Technology' AND CreatedDate = LAST_N_DAYS:30 \
    ORDER BY Name DESC LIMIT 20";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let query = if args.is_empty() {
        DEFAULT_QUERY.to_string()
    } else {
        args.join(" ")
    };

    println!("=== SOQL Query Demo ===\n");
    println!("{}\n", query);

    println!("--- Tokenizing ---");
    let tokens = tokenize(&query);
    println!("Found {} tokens\n", tokens.len());

    println!("--- Parsing ---");
    let parts = parse_query_parts(&query);
    println!("Object: {}", parts.object_name.as_deref().unwrap_or("<none>"));
    for item in &parts.select_fields {
        println!("  select: {}", item);
    }
    for filter in &parts.filters {
        println!("  where:  {} {} {}", filter.field, filter.operator, filter.raw_value);
    }
    if !parts.order_by_fields.is_empty() {
        println!("  order:  {}", parts.order_by_fields.join(", "));
    }
    if let Some(limit) = &parts.raw_limit {
        println!("  limit:  {}", limit);
    }
    println!();

    println!("--- Validating ---");
    let describe = parts.object_name.as_deref().and_then(demo_describe);
    if describe.is_none() {
        println!("(no demo describe for this object)");
    }
    let result = validate_soql(&query, describe.as_ref());
    if result.ok {
        println!("Query is valid\n");
    } else {
        for diagnostic in &result.diagnostics {
            println!("  {:?}: {}", diagnostic.severity(), diagnostic);
        }
        println!();
    }

    println!("--- Builder round trip ---");
    match import_query(&query, &BuilderState::default()) {
        Ok((state, report)) => {
            println!("Composed: {}", compose_query(&state));
            if !report.is_lossless() {
                println!("Not representable in the builder:");
                for item in report.unsupported_items.iter().chain(&report.unsupported_filters) {
                    println!("  {}", item);
                }
                for item in &report.dropped_order_by {
                    println!("  ORDER BY {}", item);
                }
                for item in &report.dropped_paging {
                    println!("  {}", item);
                }
                if report.uses_or {
                    println!("  OR conditions (builder joins with AND)");
                }
            }
        }
        Err(e) => println!("Import failed: {}", e),
    }
}
