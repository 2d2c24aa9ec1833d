//! Revocable guard tokens and the per-key issuer that revokes them.
//!
//! A [`GuardToken`] starts valid and can be revoked exactly once. Revocation is
//! visible to every clone of the token. The [`Invalidator`] hands out a fresh
//! token per resolution and remembers every live token issued for a key, so
//! invalidating a key revokes all bindings that were built from it.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

static NEXT_GUARD_ID: AtomicU64 = AtomicU64::new(1);

/// Observable state of a [`GuardToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
	/// The cached path guarded by this token may still be used.
	Valid,
	/// Terminal. The cached path must be re-resolved.
	Revoked,
}

impl fmt::Display for GuardState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Valid => f.write_str("valid"),
			Self::Revoked => f.write_str("revoked"),
		}
	}
}

#[derive(Debug)]
struct GuardCell {
	id: u64,
	revoked: AtomicBool,
}

/// A one-way invalidation switch.
///
/// Clones share state: revoking any clone revokes them all.
#[derive(Debug, Clone)]
pub struct GuardToken {
	cell: Arc<GuardCell>,
}

impl GuardToken {
	/// Creates a new, valid token with a process-unique id.
	pub fn new() -> Self {
		Self {
			cell: Arc::new(GuardCell {
				id: NEXT_GUARD_ID.fetch_add(1, Ordering::Relaxed),
				revoked: AtomicBool::new(false),
			}),
		}
	}

	/// Returns true until the token is revoked.
	#[inline]
	pub fn is_valid(&self) -> bool {
		!self.cell.revoked.load(Ordering::Acquire)
	}

	/// Returns the current state.
	pub fn state(&self) -> GuardState {
		if self.is_valid() { GuardState::Valid } else { GuardState::Revoked }
	}

	/// Revokes the token.
	///
	/// Returns true if this call performed the transition, false if the token
	/// was already revoked.
	pub fn revoke(&self) -> bool {
		!self.cell.revoked.swap(true, Ordering::AcqRel)
	}

	/// Revokes every token in `tokens`, returning how many transitioned.
	pub fn revoke_all<'a>(tokens: impl IntoIterator<Item = &'a GuardToken>) -> usize {
		tokens.into_iter().filter(|t| t.revoke()).count()
	}

	/// Process-unique id, for logging.
	pub fn id(&self) -> u64 {
		self.cell.id
	}

	/// Returns true if both handles refer to the same token.
	pub fn ptr_eq(&self, other: &GuardToken) -> bool {
		Arc::ptr_eq(&self.cell, &other.cell)
	}

	fn downgrade(&self) -> Weak<GuardCell> {
		Arc::downgrade(&self.cell)
	}
}

impl Default for GuardToken {
	fn default() -> Self {
		Self::new()
	}
}

/// Issues guard tokens per key and revokes them on demand.
///
/// Tokens are tracked weakly: once every binding holding a token is dropped,
/// its entry is pruned on the next issue for that key.
#[derive(Debug, Default)]
pub struct Invalidator {
	issued: Mutex<FxHashMap<Box<str>, Vec<Weak<GuardCell>>>>,
}

impl Invalidator {
	/// Creates an invalidator with no outstanding tokens.
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues a fresh token associated with `key`.
	pub fn issue(&self, key: &str) -> GuardToken {
		let token = GuardToken::new();
		let mut issued = self.issued.lock();
		let slot = issued.entry(Box::from(key)).or_default();
		slot.retain(|weak| weak.upgrade().is_some_and(|cell| !cell.revoked.load(Ordering::Acquire)));
		slot.push(token.downgrade());
		token
	}

	/// Revokes every live token issued for `key`. Returns the number revoked.
	pub fn invalidate(&self, key: &str) -> usize {
		let Some(slot) = self.issued.lock().remove(key) else {
			return 0;
		};
		revoke_weak(slot)
	}

	/// Revokes every live token for every key. Returns the number revoked.
	pub fn invalidate_all(&self) -> usize {
		let drained: Vec<_> = self.issued.lock().drain().collect();
		drained.into_iter().map(|(_, slot)| revoke_weak(slot)).sum()
	}

	/// Number of live, valid tokens issued for `key`.
	pub fn outstanding(&self, key: &str) -> usize {
		self.issued.lock().get(key).map_or(0, |slot| {
			slot.iter()
				.filter_map(Weak::upgrade)
				.filter(|cell| !cell.revoked.load(Ordering::Acquire))
				.count()
		})
	}
}

fn revoke_weak(slot: Vec<Weak<GuardCell>>) -> usize {
	slot.into_iter()
		.filter_map(|weak| weak.upgrade())
		.filter(|cell| !cell.revoked.swap(true, Ordering::AcqRel))
		.count()
}
