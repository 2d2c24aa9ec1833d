//! Immutable targets installed on a call site.

use std::sync::Arc;

use switchpoint_primitives::{MethodType, Value};

use crate::guard::GuardToken;
use crate::resolver::Resolver;

/// A cached constant guarded by a token, with the resolver to fall back to.
#[derive(Debug, Clone)]
pub struct FastPath {
	value: Value,
	guard: GuardToken,
	fallback: Arc<dyn Resolver>,
}

impl FastPath {
	/// The cached value.
	pub fn value(&self) -> &Value {
		&self.value
	}

	/// The token gating this path.
	pub fn guard(&self) -> &GuardToken {
		&self.guard
	}

	/// The resolver used once the guard is revoked.
	pub fn fallback(&self) -> &Arc<dyn Resolver> {
		&self.fallback
	}
}

/// The implementation currently installed on a call site.
///
/// Bindings are never mutated after construction; a site replaces the whole
/// binding when it rewrites itself.
#[derive(Debug, Clone)]
pub enum Binding {
	/// Return the cached value while its guard is valid.
	Fast(FastPath),
	/// Resolve on every call until a fast path is installed.
	Slow(Arc<dyn Resolver>),
}

impl Binding {
	/// Creates a slow binding that resolves through `resolver`.
	pub fn slow(resolver: Arc<dyn Resolver>) -> Self {
		Self::Slow(resolver)
	}

	/// Creates a fast binding returning `value` while `guard` is valid.
	pub fn fast(value: Value, guard: GuardToken, fallback: Arc<dyn Resolver>) -> Self {
		Self::Fast(FastPath {
			value,
			guard,
			fallback,
		})
	}

	/// Shape of this binding's target.
	///
	/// A fast path returns exactly its cached value's type.
	pub fn method_type(&self) -> MethodType {
		match self {
			Self::Fast(fast) => fast.fallback.method_type().change_return(fast.value.type_tag()),
			Self::Slow(resolver) => resolver.method_type().clone(),
		}
	}

	/// The resolver this binding falls back to.
	pub fn resolver(&self) -> &Arc<dyn Resolver> {
		match self {
			Self::Fast(fast) => &fast.fallback,
			Self::Slow(resolver) => resolver,
		}
	}

	/// The guard, for fast bindings.
	pub fn guard(&self) -> Option<&GuardToken> {
		match self {
			Self::Fast(fast) => Some(&fast.guard),
			Self::Slow(_) => None,
		}
	}

	/// Returns the cached value if this is a fast path whose guard is still valid.
	#[inline]
	pub fn cached(&self) -> Option<&Value> {
		match self {
			Self::Fast(fast) if fast.guard.is_valid() => Some(&fast.value),
			_ => None,
		}
	}
}
