//! Observability for recordbook
//!
//! Structured, synchronous JSON-lines logging. Logging is read-only with
//! respect to the store: it never changes the outcome of an operation.
//!
//! ```ignore
//! use recordbook::observability::{Event, Logger};
//!
//! Logger::info(Event::DatabaseSaved, &[("records", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
