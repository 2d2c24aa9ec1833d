//! Fallback resolution for call sites whose cached path is missing or revoked.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use switchpoint_primitives::{MethodType, TypeTag, Value};
use tracing::trace;

use crate::guard::GuardToken;
use crate::store::ConstantStore;

/// Outcome of a fallback resolution.
#[derive(Debug, Clone)]
pub enum Resolution {
	/// The name is bound. `guard` was issued for this resolution alone.
	Found {
		/// Value read from the store.
		value: Value,
		/// Fresh token that will be revoked when the name changes.
		guard: GuardToken,
	},
	/// The name is not bound in the store.
	NotFound,
}

/// Slow path invoked when a call site has no valid cached target.
///
/// Implementations must return a fresh [`GuardToken`] on every successful
/// resolution, and must obtain it before reading the value it guards. A found
/// value should be accepted by the return type of [`Resolver::method_type`];
/// call sites treat one that is not as missing.
pub trait Resolver: fmt::Debug + Send + Sync + 'static {
	/// Shape of the targets this resolver produces.
	fn method_type(&self) -> &MethodType;

	/// Resolves `name` against the current contents of `store`.
	fn resolve(&self, name: &str, store: &ConstantStore) -> Resolution;
}

/// Resolves constants by name and counts how often it runs.
///
/// A stored value whose type the return slot does not accept resolves as
/// [`Resolution::NotFound`].
#[derive(Debug)]
pub struct ConstantResolver {
	ty: MethodType,
	calls: AtomicU64,
}

impl ConstantResolver {
	/// Creates a resolver producing `()any` targets.
	pub fn new() -> Self {
		Self::with_type(MethodType::nullary(TypeTag::Any))
	}

	/// Creates a resolver producing targets of type `ty`.
	pub fn with_type(ty: MethodType) -> Self {
		Self {
			ty,
			calls: AtomicU64::new(0),
		}
	}

	/// Number of times [`Resolver::resolve`] has run.
	pub fn calls(&self) -> u64 {
		self.calls.load(Ordering::Relaxed)
	}
}

impl Default for ConstantResolver {
	fn default() -> Self {
		Self::new()
	}
}

impl Resolver for ConstantResolver {
	fn method_type(&self) -> &MethodType {
		&self.ty
	}

	fn resolve(&self, name: &str, store: &ConstantStore) -> Resolution {
		self.calls.fetch_add(1, Ordering::Relaxed);
		// Issued before the read: a concurrent set() after this point revokes it.
		let guard = store.invalidator().issue(name);
		match store.get(name) {
			Some(value) if self.ty.ret().accepts(value.type_tag()) => Resolution::Found { value, guard },
			Some(value) => {
				trace!(name, found = %value.type_tag(), expected = %self.ty.ret(), "constant has wrong type");
				Resolution::NotFound
			}
			None => Resolution::NotFound,
		}
	}
}
