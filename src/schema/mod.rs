//! Describe metadata for schema-aware validation
//!
//! The validator never fetches metadata itself. Callers resolve an
//! [`SObjectDescribe`] (from a describe call, a [`DescribeCache`] or the
//! sample [`demo_describe`] set) and pass it in.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use soqlkit::schema::{DescribeCache, FieldDescribe, SObjectDescribe, SalesforceFieldType};
//!
//! let account = SObjectDescribe::new("Account")
//!     .with_field(FieldDescribe::new("Id", SalesforceFieldType::Id))
//!     .with_field(FieldDescribe::new("Name", SalesforceFieldType::String));
//!
//! let mut cache = DescribeCache::new(Duration::from_secs(600));
//! cache.insert(account, Duration::ZERO);
//! assert!(cache.get("account", Duration::from_secs(60)).is_some());
//! ```

pub mod cache;
pub mod date_literals;
pub mod demo;
pub mod describe;
pub mod error;

pub use cache::DescribeCache;
pub use date_literals::{is_date_literal, is_iso_date, is_iso_datetime};
pub use demo::{demo_describe, DEMO_OBJECTS};
pub use describe::{FieldDescribe, SObjectDescribe, SalesforceFieldType};
pub use error::{DescribeError, DescribeResult};
