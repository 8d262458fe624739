//! Filter engine for recordbook
//!
//! A two-form query language over in-memory records:
//!
//! - `field:substring` restricts the search to one declared field
//! - anything else searches every declared field
//!
//! Matching is a case-insensitive substring test against each field's
//! display string. Absent values never match. Results are indices into the
//! record sequence, in stored order.

mod query;

pub use query::{filter_records, FilterQuery};
