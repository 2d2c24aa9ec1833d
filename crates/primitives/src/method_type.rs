use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::value::{TypeTag, Value};

/// Mismatch between supplied arguments and a [`MethodType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
	/// Wrong number of arguments.
	#[error("expected {expected} arguments, found {found}")]
	Arity {
		/// Declared parameter count.
		expected: usize,
		/// Supplied argument count.
		found: usize,
	},
	/// An argument's type is not accepted by its parameter slot.
	#[error("argument {index}: expected {expected}, found {found}")]
	Type {
		/// Zero-based argument position.
		index: usize,
		/// Declared parameter type.
		expected: TypeTag,
		/// Type of the supplied value.
		found: TypeTag,
	},
}

/// Shape of a callable: parameter types and a return type.
///
/// Displayed as `(int,int)str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodType {
	ret: TypeTag,
	params: Arc<[TypeTag]>,
}

impl MethodType {
	/// Creates a method type from a return type and parameter types.
	pub fn new(ret: TypeTag, params: impl IntoIterator<Item = TypeTag>) -> Self {
		Self {
			ret,
			params: params.into_iter().collect(),
		}
	}

	/// Creates a method type with no parameters.
	pub fn nullary(ret: TypeTag) -> Self {
		Self::new(ret, [])
	}

	/// Return type.
	pub const fn ret(&self) -> TypeTag {
		self.ret
	}

	/// Parameter types.
	pub fn params(&self) -> &[TypeTag] {
		&self.params
	}

	/// Number of parameters.
	pub fn arity(&self) -> usize {
		self.params.len()
	}

	/// Returns a copy with `tags` inserted before parameter `pos`.
	///
	/// `pos` is clamped to the current arity.
	pub fn insert_params(&self, pos: usize, tags: impl IntoIterator<Item = TypeTag>) -> Self {
		let pos = pos.min(self.params.len());
		let mut params = self.params[..pos].to_vec();
		params.extend(tags);
		params.extend_from_slice(&self.params[pos..]);
		Self {
			ret: self.ret,
			params: params.into(),
		}
	}

	/// Returns a copy with `count` parameters removed starting at `pos`.
	pub fn drop_params(&self, pos: usize, count: usize) -> Self {
		let start = pos.min(self.params.len());
		let end = start.saturating_add(count).min(self.params.len());
		let params: Vec<TypeTag> = self.params[..start]
			.iter()
			.chain(&self.params[end..])
			.copied()
			.collect();
		Self {
			ret: self.ret,
			params: params.into(),
		}
	}

	/// Returns a copy with a different return type.
	pub fn change_return(&self, ret: TypeTag) -> Self {
		Self {
			ret,
			params: self.params.clone(),
		}
	}

	/// Returns true if a target of type `other` can be installed where `self` is declared.
	///
	/// Parameters must match exactly; the declared return slot must accept the
	/// target's return type.
	pub fn accepts(&self, other: &MethodType) -> bool {
		self.params == other.params && self.ret.accepts(other.ret)
	}

	/// Checks `args` against the parameter list.
	pub fn check_args(&self, args: &[Value]) -> Result<(), ArgumentError> {
		if args.len() != self.params.len() {
			return Err(ArgumentError::Arity {
				expected: self.params.len(),
				found: args.len(),
			});
		}
		for (index, (param, arg)) in self.params.iter().zip(args).enumerate() {
			let found = arg.type_tag();
			if !param.accepts(found) {
				return Err(ArgumentError::Type {
					index,
					expected: *param,
					found,
				});
			}
		}
		Ok(())
	}
}

impl fmt::Display for MethodType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("(")?;
		for (i, p) in self.params.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}
			f.write_str(p.name())?;
		}
		write!(f, "){}", self.ret)
	}
}
