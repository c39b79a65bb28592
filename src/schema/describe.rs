//! SObject describe metadata consumed by the validator

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::{DescribeError, DescribeResult};

/// Description of a Salesforce SObject, as returned by a describe call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawDescribe", into = "RawDescribe")]
pub struct SObjectDescribe {
    /// API name (e.g., "Account", "Custom_Object__c")
    pub name: String,
    /// Label for display
    pub label: String,
    /// Map from field API name (case-insensitive) to field description
    fields: HashMap<String, FieldDescribe>,
    /// Built-in sample metadata rather than a real org's describe
    pub is_demo: bool,
}

impl SObjectDescribe {
    /// Create a new SObject description
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            fields: HashMap::new(),
            is_demo: false,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Mark this describe as sample metadata
    pub fn with_demo(mut self, is_demo: bool) -> Self {
        self.is_demo = is_demo;
        self
    }

    /// Add a field, builder style
    pub fn with_field(mut self, field: FieldDescribe) -> Self {
        self.add_field(field);
        self
    }

    /// Add a field to the object
    pub fn add_field(&mut self, field: FieldDescribe) {
        self.fields.insert(field.name.to_lowercase(), field);
    }

    /// Get a field by API name (case-insensitive)
    pub fn get_field(&self, name: &str) -> Option<&FieldDescribe> {
        self.fields.get(&name.to_lowercase())
    }

    /// Get all fields
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescribe> {
        self.fields.values()
    }

    /// Check if a field exists
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_lowercase())
    }

    /// Decode Salesforce describe JSON (`/sobjects/{name}/describe`)
    pub fn from_json(json: &str) -> DescribeResult<Self> {
        let describe: SObjectDescribe = serde_json::from_str(json)?;
        if describe.name.trim().is_empty() {
            return Err(DescribeError::MissingName);
        }
        Ok(describe)
    }
}

/// Description of a Salesforce field
#[derive(Debug, Clone)]
pub struct FieldDescribe {
    /// API name (e.g., "AccountId", "Custom_Field__c")
    pub name: String,
    /// Salesforce field type
    pub field_type: SalesforceFieldType,
    /// Whether the field can be null
    pub nillable: bool,
    /// For reference fields: object(s) this references
    pub reference_to: Vec<String>,
    /// Relationship name for parent traversal (e.g., "Account" for AccountId)
    pub relationship_name: Option<String>,
}

impl FieldDescribe {
    /// Create a new field description
    pub fn new(name: impl Into<String>, field_type: SalesforceFieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nillable: true,
            reference_to: Vec::new(),
            relationship_name: None,
        }
    }

    /// Set this as a lookup to `reference_to`
    pub fn with_reference(mut self, reference_to: impl Into<String>) -> Self {
        self.reference_to.push(reference_to.into());
        self
    }

    /// Set the relationship name
    pub fn with_relationship_name(mut self, name: impl Into<String>) -> Self {
        self.relationship_name = Some(name.into());
        self
    }

    /// Set whether the field is nillable
    pub fn with_nillable(mut self, nillable: bool) -> Self {
        self.nillable = nillable;
        self
    }

    /// Check if this is a relationship field
    pub fn is_relationship(&self) -> bool {
        !self.reference_to.is_empty()
    }
}

/// Salesforce field types, as named by the describe API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesforceFieldType {
    Id,
    Reference,
    String,
    TextArea,
    Picklist,
    MultiPicklist,
    Combobox,
    Email,
    Phone,
    Url,
    EncryptedString,
    Boolean,
    Int,
    Double,
    Currency,
    Percent,
    Date,
    DateTime,
    Time,
    Base64,
    Address,
    Location,
    AnyType,
    Other,
}

impl SalesforceFieldType {
    /// Describe `type` string for this type
    pub fn as_describe_type(&self) -> &'static str {
        match self {
            SalesforceFieldType::Id => "id",
            SalesforceFieldType::Reference => "reference",
            SalesforceFieldType::String => "string",
            SalesforceFieldType::TextArea => "textarea",
            SalesforceFieldType::Picklist => "picklist",
            SalesforceFieldType::MultiPicklist => "multipicklist",
            SalesforceFieldType::Combobox => "combobox",
            SalesforceFieldType::Email => "email",
            SalesforceFieldType::Phone => "phone",
            SalesforceFieldType::Url => "url",
            SalesforceFieldType::EncryptedString => "encryptedstring",
            SalesforceFieldType::Boolean => "boolean",
            SalesforceFieldType::Int => "int",
            SalesforceFieldType::Double => "double",
            SalesforceFieldType::Currency => "currency",
            SalesforceFieldType::Percent => "percent",
            SalesforceFieldType::Date => "date",
            SalesforceFieldType::DateTime => "datetime",
            SalesforceFieldType::Time => "time",
            SalesforceFieldType::Base64 => "base64",
            SalesforceFieldType::Address => "address",
            SalesforceFieldType::Location => "location",
            SalesforceFieldType::AnyType => "anytype",
            SalesforceFieldType::Other => "other",
        }
    }

    /// Map a describe `type` string; unrecognized types become `Other`
    pub fn from_describe_type(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "id" => SalesforceFieldType::Id,
            "reference" => SalesforceFieldType::Reference,
            "string" => SalesforceFieldType::String,
            "textarea" => SalesforceFieldType::TextArea,
            "picklist" => SalesforceFieldType::Picklist,
            "multipicklist" => SalesforceFieldType::MultiPicklist,
            "combobox" => SalesforceFieldType::Combobox,
            "email" => SalesforceFieldType::Email,
            "phone" => SalesforceFieldType::Phone,
            "url" => SalesforceFieldType::Url,
            "encryptedstring" => SalesforceFieldType::EncryptedString,
            "boolean" => SalesforceFieldType::Boolean,
            "int" | "integer" | "long" => SalesforceFieldType::Int,
            "double" | "number" => SalesforceFieldType::Double,
            "currency" => SalesforceFieldType::Currency,
            "percent" => SalesforceFieldType::Percent,
            "date" => SalesforceFieldType::Date,
            "datetime" => SalesforceFieldType::DateTime,
            "time" => SalesforceFieldType::Time,
            "base64" => SalesforceFieldType::Base64,
            "address" => SalesforceFieldType::Address,
            "location" => SalesforceFieldType::Location,
            "anytype" => SalesforceFieldType::AnyType,
            _ => SalesforceFieldType::Other,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SalesforceFieldType::Int
                | SalesforceFieldType::Double
                | SalesforceFieldType::Currency
                | SalesforceFieldType::Percent
        )
    }

    pub fn is_date(&self) -> bool {
        matches!(self, SalesforceFieldType::Date | SalesforceFieldType::DateTime)
    }

    pub fn is_id(&self) -> bool {
        matches!(self, SalesforceFieldType::Id | SalesforceFieldType::Reference)
    }

    /// Types compared against quoted string literals
    pub fn is_string_like(&self) -> bool {
        matches!(
            self,
            SalesforceFieldType::String
                | SalesforceFieldType::TextArea
                | SalesforceFieldType::Picklist
                | SalesforceFieldType::MultiPicklist
                | SalesforceFieldType::Combobox
                | SalesforceFieldType::Email
                | SalesforceFieldType::Phone
                | SalesforceFieldType::Url
                | SalesforceFieldType::EncryptedString
        )
    }
}

fn default_nillable() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDescribe {
    name: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    demo: bool,
    #[serde(default, skip_serializing)]
    mock: bool,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    name: String,
    #[serde(rename = "type", default)]
    field_type: String,
    #[serde(default = "default_nillable")]
    nillable: bool,
    #[serde(default)]
    reference_to: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relationship_name: Option<String>,
}

impl From<RawDescribe> for SObjectDescribe {
    fn from(raw: RawDescribe) -> Self {
        let mut describe = SObjectDescribe::new(raw.name).with_demo(raw.demo || raw.mock);
        if let Some(label) = raw.label {
            describe.label = label;
        }
        for field in raw.fields {
            describe.add_field(FieldDescribe {
                field_type: SalesforceFieldType::from_describe_type(&field.field_type),
                name: field.name,
                nillable: field.nillable,
                reference_to: field.reference_to,
                relationship_name: field.relationship_name,
            });
        }
        describe
    }
}

impl From<SObjectDescribe> for RawDescribe {
    fn from(describe: SObjectDescribe) -> Self {
        let mut fields: Vec<RawField> = describe
            .fields
            .into_values()
            .map(|field| RawField {
                name: field.name,
                field_type: field.field_type.as_describe_type().to_string(),
                nillable: field.nillable,
                reference_to: field.reference_to,
                relationship_name: field.relationship_name,
            })
            .collect();
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        RawDescribe {
            name: describe.name,
            label: Some(describe.label),
            fields,
            demo: describe.is_demo,
            mock: false,
        }
    }
}
