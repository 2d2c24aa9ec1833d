//! Error types for call site binding and invocation.

use std::sync::Arc;

use switchpoint_primitives::MethodType;
use thiserror::Error;

/// Errors raised by [`crate::CallSite`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallSiteError {
	/// A binding's shape does not fit the site's declared signature.
	///
	/// Raised when a site is constructed, given a placeholder, or rebound; never
	/// from an invoke.
	#[error("call site '{site}' declared {expected}, binding has {found}")]
	SignatureMismatch {
		/// Name of the call site.
		site: Arc<str>,
		/// Signature declared by the site.
		expected: MethodType,
		/// Signature of the rejected binding.
		found: MethodType,
	},

	/// The constant is absent from the store and the site is configured to fail.
	#[error("constant '{name}' not found")]
	NotFound {
		/// Name looked up in the store.
		name: Arc<str>,
	},
}

/// Result type for call site operations.
pub type Result<T> = std::result::Result<T, CallSiteError>;
