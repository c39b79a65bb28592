//! Sample describes for standard objects
//!
//! Used when no org is connected. Every describe built here carries the
//! demo marker, so the validator does not complain when the sample object
//! differs from the one being queried.

use super::describe::{FieldDescribe, SObjectDescribe, SalesforceFieldType};

/// Names of the objects [`demo_describe`] knows about
pub const DEMO_OBJECTS: &[&str] = &["Account", "Contact", "Opportunity", "Case", "User"];

/// Sample describe for a standard object (case-insensitive name)
pub fn demo_describe(name: &str) -> Option<SObjectDescribe> {
    let describe = match name.to_ascii_lowercase().as_str() {
        "account" => create_account(),
        "contact" => create_contact(),
        "opportunity" => create_opportunity(),
        "case" => create_case(),
        "user" => create_user(),
        _ => return None,
    };
    Some(describe.with_demo(true))
}

/// Add standard system fields to an object
fn add_system_fields(obj: &mut SObjectDescribe) {
    // Primary key
    obj.add_field(FieldDescribe::new("Id", SalesforceFieldType::Id).with_nillable(false));

    // Audit fields
    obj.add_field(
        FieldDescribe::new("CreatedById", SalesforceFieldType::Reference)
            .with_reference("User")
            .with_relationship_name("CreatedBy"),
    );
    obj.add_field(FieldDescribe::new("CreatedDate", SalesforceFieldType::DateTime));
    obj.add_field(
        FieldDescribe::new("LastModifiedById", SalesforceFieldType::Reference)
            .with_reference("User")
            .with_relationship_name("LastModifiedBy"),
    );
    obj.add_field(FieldDescribe::new("LastModifiedDate", SalesforceFieldType::DateTime));
    obj.add_field(FieldDescribe::new("SystemModstamp", SalesforceFieldType::DateTime));
    obj.add_field(FieldDescribe::new("IsDeleted", SalesforceFieldType::Boolean));
}

fn add_owner(obj: &mut SObjectDescribe) {
    obj.add_field(
        FieldDescribe::new("OwnerId", SalesforceFieldType::Reference)
            .with_reference("User")
            .with_relationship_name("Owner"),
    );
}

/// Account object - companies and organizations
fn create_account() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Account");
    add_system_fields(&mut obj);
    add_owner(&mut obj);

    obj.add_field(FieldDescribe::new("Name", SalesforceFieldType::String).with_nillable(false));
    obj.add_field(FieldDescribe::new("AccountNumber", SalesforceFieldType::String));
    obj.add_field(FieldDescribe::new("Type", SalesforceFieldType::Picklist));
    obj.add_field(FieldDescribe::new("Industry", SalesforceFieldType::Picklist));
    obj.add_field(FieldDescribe::new("Rating", SalesforceFieldType::Picklist));

    // Financials
    obj.add_field(FieldDescribe::new("AnnualRevenue", SalesforceFieldType::Currency));
    obj.add_field(FieldDescribe::new("NumberOfEmployees", SalesforceFieldType::Int));

    obj.add_field(FieldDescribe::new("Phone", SalesforceFieldType::Phone));
    obj.add_field(FieldDescribe::new("Website", SalesforceFieldType::Url));
    obj.add_field(FieldDescribe::new("BillingCity", SalesforceFieldType::String));
    obj.add_field(FieldDescribe::new("BillingCountry", SalesforceFieldType::String));
    obj.add_field(
        FieldDescribe::new("ParentId", SalesforceFieldType::Reference)
            .with_reference("Account")
            .with_relationship_name("Parent"),
    );
    obj
}

/// Contact object - people at accounts
fn create_contact() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Contact");
    add_system_fields(&mut obj);
    add_owner(&mut obj);

    obj.add_field(
        FieldDescribe::new("AccountId", SalesforceFieldType::Reference)
            .with_reference("Account")
            .with_relationship_name("Account"),
    );
    obj.add_field(FieldDescribe::new("FirstName", SalesforceFieldType::String));
    obj.add_field(FieldDescribe::new("LastName", SalesforceFieldType::String).with_nillable(false));
    obj.add_field(FieldDescribe::new("Name", SalesforceFieldType::String).with_nillable(false));
    obj.add_field(FieldDescribe::new("Email", SalesforceFieldType::Email));
    obj.add_field(FieldDescribe::new("Phone", SalesforceFieldType::Phone));
    obj.add_field(FieldDescribe::new("Title", SalesforceFieldType::String));
    obj.add_field(FieldDescribe::new("Birthdate", SalesforceFieldType::Date));
    obj.add_field(FieldDescribe::new("HasOptedOutOfEmail", SalesforceFieldType::Boolean));
    obj
}

/// Opportunity object - deals in progress
fn create_opportunity() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Opportunity");
    add_system_fields(&mut obj);
    add_owner(&mut obj);

    obj.add_field(
        FieldDescribe::new("AccountId", SalesforceFieldType::Reference)
            .with_reference("Account")
            .with_relationship_name("Account"),
    );
    obj.add_field(FieldDescribe::new("Name", SalesforceFieldType::String).with_nillable(false));
    obj.add_field(FieldDescribe::new("StageName", SalesforceFieldType::Picklist));
    obj.add_field(FieldDescribe::new("Amount", SalesforceFieldType::Currency));
    obj.add_field(FieldDescribe::new("Probability", SalesforceFieldType::Percent));
    obj.add_field(FieldDescribe::new("CloseDate", SalesforceFieldType::Date).with_nillable(false));
    obj.add_field(FieldDescribe::new("IsClosed", SalesforceFieldType::Boolean));
    obj.add_field(FieldDescribe::new("IsWon", SalesforceFieldType::Boolean));
    obj
}

/// Case object - customer issues
fn create_case() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("Case");
    add_system_fields(&mut obj);
    add_owner(&mut obj);

    obj.add_field(
        FieldDescribe::new("AccountId", SalesforceFieldType::Reference)
            .with_reference("Account")
            .with_relationship_name("Account"),
    );
    obj.add_field(
        FieldDescribe::new("ContactId", SalesforceFieldType::Reference)
            .with_reference("Contact")
            .with_relationship_name("Contact"),
    );
    obj.add_field(FieldDescribe::new("CaseNumber", SalesforceFieldType::String));
    obj.add_field(FieldDescribe::new("Subject", SalesforceFieldType::String));
    obj.add_field(FieldDescribe::new("Status", SalesforceFieldType::Picklist));
    obj.add_field(FieldDescribe::new("Priority", SalesforceFieldType::Picklist));
    obj.add_field(FieldDescribe::new("IsEscalated", SalesforceFieldType::Boolean));
    obj.add_field(FieldDescribe::new("ClosedDate", SalesforceFieldType::DateTime));
    obj
}

/// User object
fn create_user() -> SObjectDescribe {
    let mut obj = SObjectDescribe::new("User");
    add_system_fields(&mut obj);

    obj.add_field(FieldDescribe::new("Username", SalesforceFieldType::String).with_nillable(false));
    obj.add_field(FieldDescribe::new("Name", SalesforceFieldType::String));
    obj.add_field(FieldDescribe::new("Email", SalesforceFieldType::Email));
    obj.add_field(FieldDescribe::new("IsActive", SalesforceFieldType::Boolean));
    obj.add_field(
        FieldDescribe::new("ProfileId", SalesforceFieldType::Reference)
            .with_reference("Profile")
            .with_relationship_name("Profile"),
    );
    obj
}
