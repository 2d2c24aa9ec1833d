//! Shared value and signature types for call sites and invoke-by-name dispatch.

/// Call signatures and argument checking.
pub mod method_type;
/// Dynamic values and their type tags.
pub mod value;

#[cfg(test)]
mod tests;

pub use method_type::{ArgumentError, MethodType};
pub use value::{TypeTag, Value};
