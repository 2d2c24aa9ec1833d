//! External constant table and the mutator operations that keep it coherent
//! with outstanding guards.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use switchpoint_primitives::Value;
use tracing::debug;

use crate::guard::Invalidator;

/// Name-to-value table read by resolvers and written by mutators.
///
/// Every write revokes the guards issued for the written name *after* the
/// table has been updated, so a re-resolving call site always reads the new
/// value.
#[derive(Debug, Default)]
pub struct ConstantStore {
	values: RwLock<FxHashMap<Box<str>, Value>>,
	invalidator: Invalidator,
}

impl ConstantStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a clone of the value bound to `name`.
	pub fn get(&self, name: &str) -> Option<Value> {
		self.values.read().get(name).cloned()
	}

	/// Returns true if `name` is bound.
	pub fn contains(&self, name: &str) -> bool {
		self.values.read().contains_key(name)
	}

	/// Number of bound names.
	pub fn len(&self) -> usize {
		self.values.read().len()
	}

	/// Returns true if no names are bound.
	pub fn is_empty(&self) -> bool {
		self.values.read().is_empty()
	}

	/// Binds `name` to `value` and revokes every guard issued for `name`.
	///
	/// Returns the previous value.
	pub fn set(&self, name: &str, value: impl Into<Value>) -> Option<Value> {
		let previous = self.values.write().insert(Box::from(name), value.into());
		let revoked = self.invalidator.invalidate(name);
		debug!(name, revoked, "constant updated");
		previous
	}

	/// Unbinds `name` and revokes every guard issued for it.
	pub fn remove(&self, name: &str) -> Option<Value> {
		let previous = self.values.write().remove(name);
		let revoked = self.invalidator.invalidate(name);
		debug!(name, revoked, "constant removed");
		previous
	}

	/// The issuer of guards for this store.
	pub fn invalidator(&self) -> &Invalidator {
		&self.invalidator
	}
}
