//! Invariant checks for call site caching and invalidation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use switchpoint_primitives::{MethodType, TypeTag, Value};

use crate::{Binding, CallSite, ConstantResolver, ConstantStore, Resolution, Resolver};

fn any_site(name: &str, resolver: Arc<dyn Resolver>) -> CallSite {
	CallSite::new(name, MethodType::nullary(TypeTag::Any), resolver).unwrap()
}

/// Resolver that records which value each issued guard was paired with.
#[derive(Debug, Default)]
struct RecordingResolver {
	inner: ConstantResolver,
	issued: Mutex<FxHashMap<u64, Value>>,
}

impl Resolver for RecordingResolver {
	fn method_type(&self) -> &MethodType {
		self.inner.method_type()
	}

	fn resolve(&self, name: &str, store: &ConstantStore) -> Resolution {
		let resolution = self.inner.resolve(name, store);
		if let Resolution::Found { value, guard } = &resolution {
			self.issued.lock().insert(guard.id(), value.clone());
		}
		resolution
	}
}

/// Invariant: a fast path returns the store's value as of its installation,
/// no matter how often it is invoked.
pub(crate) fn inv_cache_matches_store_at_install() {
	let store = ConstantStore::new();
	store.set("k", 1);
	let resolver = Arc::new(ConstantResolver::new());
	let site = any_site("k", resolver.clone());

	for _ in 0..100 {
		assert_eq!(site.invoke(&store).unwrap(), Value::from(1));
	}
	assert_eq!(resolver.calls(), 1, "only the first call may resolve");

	let binding = site.binding();
	let Binding::Fast(fast) = &*binding else {
		panic!("expected a fast path after the first call");
	};
	assert_eq!(fast.value(), &Value::from(1));
	assert!(fast.guard().is_valid());
}

#[cfg_attr(test, test)]
pub(crate) fn test_cache_matches_store_at_install() {
	inv_cache_matches_store_at_install()
}

/// Invariant: once the active guard is revoked it is never honoured again;
/// the next call resolves exactly once.
pub(crate) fn inv_revoked_guard_forces_resolution() {
	let store = ConstantStore::new();
	store.set("k", "old");
	let resolver = Arc::new(ConstantResolver::new());
	let site = any_site("k", resolver.clone());
	site.invoke(&store).unwrap();

	let stale = site.binding();
	let guard = stale.guard().cloned().unwrap();
	assert!(guard.revoke());
	assert!(!site.is_bound());

	// Still "old": revocation without a write re-resolves to the same value.
	assert_eq!(site.invoke(&store).unwrap(), Value::from("old"));
	assert_eq!(resolver.calls(), 2);

	let fresh = site.binding();
	let fresh_guard = fresh.guard().unwrap();
	assert!(!fresh_guard.ptr_eq(&guard), "a revoked token must never be reused");
	assert!(fresh_guard.is_valid());
	assert!(!guard.is_valid());
}

#[cfg_attr(test, test)]
pub(crate) fn test_revoked_guard_forces_resolution() {
	inv_revoked_guard_forces_resolution()
}

/// Invariant: concurrent invokers never see a cached value paired with a
/// guard issued for a different value, and converge once writes stop.
pub(crate) fn inv_concurrent_invokers_see_consistent_pairs() {
	const WRITES: i64 = 200;
	const READERS: usize = 4;

	let store = ConstantStore::new();
	store.set("k", 0);
	let resolver = Arc::new(RecordingResolver::default());
	let site = any_site("k", resolver.clone());
	let done = AtomicBool::new(false);

	thread::scope(|s| {
		for _ in 0..READERS {
			s.spawn(|| {
				while !done.load(Ordering::Acquire) {
					let value = site.invoke(&store).unwrap();
					let n = value.as_int().unwrap();
					assert!((0..=WRITES).contains(&n));

					let binding = site.binding();
					if let Binding::Fast(fast) = &*binding {
						let paired = resolver.issued.lock().get(&fast.guard().id()).cloned();
						assert_eq!(paired.as_ref(), Some(fast.value()));
					}
				}
			});
		}

		s.spawn(|| {
			for i in 1..=WRITES {
				store.set("k", i);
			}
			done.store(true, Ordering::Release);
		});
	});

	assert_eq!(site.invoke(&store).unwrap(), Value::from(WRITES));
	let calls = resolver.inner.calls();
	assert_eq!(site.invoke(&store).unwrap(), Value::from(WRITES));
	assert_eq!(resolver.inner.calls(), calls, "converged site must stay cached");
}

#[cfg_attr(test, test)]
pub(crate) fn test_concurrent_invokers_see_consistent_pairs() {
	inv_concurrent_invokers_see_consistent_pairs()
}

/// Invariant: a rejected rebind leaves the active binding in place.
pub(crate) fn inv_rejected_rebind_keeps_binding() {
	let store = ConstantStore::new();
	store.set("k", "text");
	let resolver = Arc::new(ConstantResolver::with_type(MethodType::nullary(TypeTag::Str)));
	let site = CallSite::new("k", MethodType::nullary(TypeTag::Str), resolver.clone()).unwrap();
	site.invoke(&store).unwrap();
	let before = site.binding();

	let guard = store.invalidator().issue("k");
	let err = site.rebind(Binding::fast(Value::from(7), guard, resolver)).unwrap_err();
	assert!(matches!(err, crate::CallSiteError::SignatureMismatch { .. }));
	assert!(Arc::ptr_eq(&before, &site.binding()));
	assert_eq!(site.invoke(&store).unwrap(), Value::from("text"));
}

#[cfg_attr(test, test)]
pub(crate) fn test_rejected_rebind_keeps_binding() {
	inv_rejected_rebind_keeps_binding()
}
