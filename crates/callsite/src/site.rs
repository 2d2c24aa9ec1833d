//! Self-rewriting call site with atomic binding publication.
//!
//! # Purpose
//!
//! Serve a named constant from a cached fast path, and re-resolve it through a
//! fallback resolver only after the cache has been explicitly invalidated.
//!
//! # Mental model
//!
//! * The active binding is an immutable [`Binding`] behind an `ArcSwap`.
//! * Invokers load the binding without locking. A fast binding whose guard is
//!   valid answers the call directly.
//! * Otherwise the invoker resolves, builds a new fast binding, and publishes it
//!   with CAS against the binding it observed.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints | Constructed / mutated in |
//! |---|---|---|---|
//! | [`CallSite`] | Named call site | Binding replaced whole, never mutated | [`CallSite::new`], [`CallSite::rebind`] |
//! | [`Binding`] | Installed target | Immutable after publish | [`CallSite::invoke`] slow path |
//! | [`MissingPolicy`] | What an unbound name yields | Placeholder must fit the return type | [`CallSite::with_missing_policy`] |
//! | [`SiteStats`] | Slow-path counters | Monotonic | [`CallSite::stats`] |
//!
//! # Invariants
//!
//! * A call answered by a fast binding returns the value that was in the store
//!   when that binding was installed (see `invariants::test_cache_matches_store_at_install`).
//! * A revoked guard is never honoured again (see `invariants::test_revoked_guard_forces_resolution`).
//! * A token and a value from different bindings are never observed together
//!   (see `invariants::test_concurrent_invokers_see_consistent_pairs`).
//! * Signature mismatches are reported at construction, policy change, or
//!   rebind, never from [`CallSite::invoke`].
//!
//! # Concurrency & ordering
//!
//! * Readers are wait-free (`ArcSwap` load + immutable binding reads).
//! * Concurrent slow paths may all resolve; the first CAS wins and the others
//!   return their own freshly resolved value, which was current when read.
//! * [`CallSite::rebind`] is an unconditional store; [`CallSite::reset`] swaps
//!   via RCU so a concurrent rebind's resolver is kept.
//!
//! # Failure modes & recovery
//!
//! * Missing names follow [`MissingPolicy`]; no fast path is installed, so the
//!   next call resolves again.
//! * A resolved value whose type the site cannot return counts as missing and
//!   the binding is left untouched.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::{ArcSwap, Guard};
use switchpoint_primitives::{MethodType, Value};
use tracing::{debug, trace};

use crate::binding::Binding;
use crate::error::{CallSiteError, Result};
use crate::resolver::{Resolution, Resolver};
use crate::store::ConstantStore;

/// What a site returns when its name is not bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MissingPolicy {
	/// Return [`CallSiteError::NotFound`].
	#[default]
	Fail,
	/// Return this value instead.
	Placeholder(Value),
}

/// Slow-path counters for a call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteStats {
	/// Fallback resolutions performed.
	pub resolutions: u64,
	/// Resolutions that found nothing.
	pub misses: u64,
	/// Resolved bindings discarded because another caller published first.
	pub lost_races: u64,
	/// Explicit rebinds.
	pub rebinds: u64,
}

#[derive(Debug, Default)]
struct Counters {
	resolutions: AtomicU64,
	misses: AtomicU64,
	lost_races: AtomicU64,
	rebinds: AtomicU64,
}

/// A named call site whose target rewrites itself from slow to fast.
#[derive(Debug)]
pub struct CallSite {
	name: Arc<str>,
	ty: MethodType,
	missing: MissingPolicy,
	active: ArcSwap<Binding>,
	counters: Counters,
}

impl CallSite {
	/// Creates a site of type `ty` initially bound to `fallback`'s slow path.
	pub fn new(name: impl Into<Arc<str>>, ty: MethodType, fallback: Arc<dyn Resolver>) -> Result<Self> {
		let name = name.into();
		let initial = Binding::slow(fallback);
		check_fit(&name, &ty, &initial.method_type())?;
		Ok(Self {
			name,
			ty,
			missing: MissingPolicy::default(),
			active: ArcSwap::from_pointee(initial),
			counters: Counters::default(),
		})
	}

	/// Sets the policy for unbound names.
	///
	/// A placeholder must be returnable from this site.
	pub fn with_missing_policy(mut self, policy: MissingPolicy) -> Result<Self> {
		if let MissingPolicy::Placeholder(value) = &policy {
			check_fit(&self.name, &self.ty, &self.ty.change_return(value.type_tag()))?;
		}
		self.missing = policy;
		Ok(self)
	}

	/// Name looked up in the store.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared signature.
	pub fn method_type(&self) -> &MethodType {
		&self.ty
	}

	/// Policy for unbound names.
	pub fn missing_policy(&self) -> &MissingPolicy {
		&self.missing
	}

	/// Invokes the site.
	///
	/// Returns the cached value without touching `store` while the active
	/// binding's guard is valid; otherwise resolves, installs, and returns the
	/// freshly resolved value.
	#[inline]
	pub fn invoke(&self, store: &ConstantStore) -> Result<Value> {
		let current = self.active.load();
		if let Some(value) = current.cached() {
			return Ok(value.clone());
		}
		self.invoke_slow(Guard::into_inner(current), store)
	}

	#[cold]
	fn invoke_slow(&self, observed: Arc<Binding>, store: &ConstantStore) -> Result<Value> {
		let resolver = Arc::clone(observed.resolver());
		self.counters.resolutions.fetch_add(1, Ordering::Relaxed);

		let (value, guard) = match resolver.resolve(&self.name, store) {
			Resolution::Found { value, guard } if self.ty.ret().accepts(value.type_tag()) => (value, guard),
			Resolution::Found { value, .. } => {
				debug!(site = %self.name, found = %value.type_tag(), "resolved constant does not fit, treating as missing");
				return self.miss();
			}
			Resolution::NotFound => {
				debug!(site = %self.name, "constant not found");
				return self.miss();
			}
		};

		let next = Arc::new(Binding::fast(value.clone(), guard.clone(), resolver));
		let previous = self.active.compare_and_swap(&observed, next);
		if Arc::ptr_eq(&*previous, &observed) {
			debug!(site = %self.name, guard = guard.id(), %value, "bound constant directly");
		} else {
			self.counters.lost_races.fetch_add(1, Ordering::Relaxed);
			trace!(site = %self.name, guard = guard.id(), "binding published concurrently, discarding");
		}
		Ok(value)
	}

	fn miss(&self) -> Result<Value> {
		self.counters.misses.fetch_add(1, Ordering::Relaxed);
		match &self.missing {
			MissingPolicy::Fail => Err(CallSiteError::NotFound {
				name: Arc::clone(&self.name),
			}),
			MissingPolicy::Placeholder(placeholder) => Ok(placeholder.clone()),
		}
	}

	/// Replaces the active binding.
	///
	/// The binding must fit the site's signature; on mismatch the active
	/// binding is left in place.
	pub fn rebind(&self, binding: Binding) -> Result<()> {
		check_fit(&self.name, &self.ty, &binding.method_type())?;
		debug!(
			site = %self.name,
			guard = binding.guard().map(|g| g.id()),
			"rebinding call site"
		);
		self.active.store(Arc::new(binding));
		self.counters.rebinds.fetch_add(1, Ordering::Relaxed);
		Ok(())
	}

	/// Drops any cached path, returning to the slow path of the current resolver.
	pub fn reset(&self) {
		self.active.rcu(|current| Binding::slow(Arc::clone(current.resolver())));
	}

	/// Snapshot of the active binding.
	pub fn binding(&self) -> Arc<Binding> {
		self.active.load_full()
	}

	/// Returns true if a fast path with a valid guard is installed.
	pub fn is_bound(&self) -> bool {
		self.active.load().cached().is_some()
	}

	/// Slow-path counters.
	pub fn stats(&self) -> SiteStats {
		SiteStats {
			resolutions: self.counters.resolutions.load(Ordering::Relaxed),
			misses: self.counters.misses.load(Ordering::Relaxed),
			lost_races: self.counters.lost_races.load(Ordering::Relaxed),
			rebinds: self.counters.rebinds.load(Ordering::Relaxed),
		}
	}
}

/// A target fits when parameters match exactly and the declared return slot
/// accepts the target's return.
fn check_fit(site: &Arc<str>, declared: &MethodType, found: &MethodType) -> Result<()> {
	if declared.params() == found.params() && declared.ret().accepts(found.ret()) {
		return Ok(());
	}
	Err(CallSiteError::SignatureMismatch {
		site: Arc::clone(site),
		expected: declared.clone(),
		found: found.clone(),
	})
}
