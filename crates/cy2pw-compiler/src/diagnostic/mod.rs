//! Diagnostic types for error reporting.

mod error;
mod span;

pub use error::{ConverterError, RuleError};
pub use span::Span;
