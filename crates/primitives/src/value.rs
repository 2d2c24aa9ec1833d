use std::fmt;
use std::sync::Arc;

/// Runtime type tag of a [`Value`], used in call signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
	/// Matches any value. Used for "object" returns and untyped parameters.
	Any,
	/// The nil value.
	Nil,
	/// Booleans.
	Bool,
	/// 64-bit signed integers.
	Int,
	/// Immutable strings.
	Str,
}

impl TypeTag {
	/// Returns true if a slot declared as `self` can hold a value tagged `other`.
	#[inline]
	pub const fn accepts(self, other: TypeTag) -> bool {
		matches!(self, TypeTag::Any) || self as u8 == other as u8
	}

	/// Lowercase name used in signature descriptors.
	pub const fn name(self) -> &'static str {
		match self {
			TypeTag::Any => "any",
			TypeTag::Nil => "nil",
			TypeTag::Bool => "bool",
			TypeTag::Int => "int",
			TypeTag::Str => "str",
		}
	}
}

impl fmt::Display for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// An opaque dynamic value stored in constant tables and passed through dispatch.
///
/// Cloning is cheap: strings are reference counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Value {
	/// Absence of a value.
	#[default]
	Nil,
	/// A boolean.
	Bool(bool),
	/// A 64-bit signed integer.
	Int(i64),
	/// An immutable string.
	Str(Arc<str>),
}

impl Value {
	/// Creates a string value.
	pub fn str(s: impl Into<Arc<str>>) -> Self {
		Self::Str(s.into())
	}

	/// Returns the type tag of this value. Never [`TypeTag::Any`].
	pub const fn type_tag(&self) -> TypeTag {
		match self {
			Value::Nil => TypeTag::Nil,
			Value::Bool(_) => TypeTag::Bool,
			Value::Int(_) => TypeTag::Int,
			Value::Str(_) => TypeTag::Str,
		}
	}

	/// Returns the integer payload, if any.
	pub const fn as_int(&self) -> Option<i64> {
		match self {
			Value::Int(i) => Some(*i),
			_ => None,
		}
	}

	/// Returns the string payload, if any.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(s) => Some(&**s),
			_ => None,
		}
	}

	/// Returns true for [`Value::Nil`].
	pub const fn is_nil(&self) -> bool {
		matches!(self, Value::Nil)
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Nil => f.write_str("nil"),
			Value::Bool(b) => write!(f, "{b}"),
			Value::Int(i) => write!(f, "{i}"),
			Value::Str(s) => f.write_str(s),
		}
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::Str(Arc::from(s))
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::Str(Arc::from(s))
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Self::Int(i)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}
