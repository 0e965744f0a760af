#![deny(missing_docs)]
#![doc = "Core error types and uncertain-number arithmetic shared by the CCC lab tools."]

pub mod errors;
pub mod format;
pub mod uncertain;

pub use errors::{CccError, ErrorInfo};
pub use format::{format_concise, format_general};
pub use uncertain::{Component, InputId, UReal, UncertainReal};
