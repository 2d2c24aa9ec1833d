use std::sync::Arc;

use switchpoint_primitives::{ArgumentError, MethodType, TypeTag};
use thiserror::Error;

/// Errors raised while resolving or invoking a method by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
	/// No method with this name and shape exists on the class.
	///
	/// Setup-time failure; never retried.
	#[error("no method {class}.{name}{method_type}")]
	LookupFailure {
		/// Class searched.
		class: Arc<str>,
		/// Method name requested.
		name: Arc<str>,
		/// Shape requested.
		method_type: MethodType,
	},

	/// Arguments do not match the method's parameters.
	#[error("bad arguments for {method}: {source}")]
	SignatureMismatch {
		/// Method being invoked.
		method: Arc<str>,
		/// What was wrong with the arguments.
		#[source]
		source: ArgumentError,
	},

	/// A method returned a value its signature does not allow.
	#[error("{method} returned {found}, declared {expected}")]
	BadReturn {
		/// Method being invoked.
		method: Arc<str>,
		/// Declared return type.
		expected: TypeTag,
		/// Type actually returned.
		found: TypeTag,
	},

	/// The receiver is not an instance of the method's declaring class.
	#[error("{method} cannot be invoked on an instance of {receiver}")]
	ReceiverMismatch {
		/// Method being invoked.
		method: Arc<str>,
		/// Class of the supplied receiver.
		receiver: Arc<str>,
	},
}

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
