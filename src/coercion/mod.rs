//! Field coercion
//!
//! Turns untyped form input into typed field values according to a
//! validated schema. Pure and side-effect free.
//!
//! | Type    | Blank + required | Blank + optional | Other failure          |
//! |---------|------------------|------------------|------------------------|
//! | boolean | never fails      | `false`          | never fails            |
//! | choice  | error            | omitted          | not a declared option  |
//! | number  | error            | omitted          | not a finite number    |
//! | date    | error            | omitted          | not a real YYYY-MM-DD  |
//! | time    | error            | omitted          | not HH:MM[:SS] in range|
//! | text    | error            | omitted          | never fails            |

mod errors;
mod form;
mod parse;

pub use errors::{ValidationError, ValidationKind};
pub use form::{build_record_from_form, coerce_field, FormOutcome, FormValues};
