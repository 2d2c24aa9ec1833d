//! Classes with native method tables, and the two ways of reaching a method.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use switchpoint_primitives::{ArgumentError, MethodType, TypeTag, Value};
use tracing::trace;

use crate::error::{DispatchError, Result};

/// Native implementation of a method.
///
/// Implementations receive arguments that passed at least an arity check and
/// report type errors through [`arg_int`] / [`arg_str`].
pub type NativeFn = fn(&Instance, &[Value]) -> Result<Value>;

/// A method found by reflective lookup.
///
/// Every [`Method::invoke`] re-validates the receiver, copies the arguments,
/// checks each against the signature, and checks the return value.
#[derive(Clone)]
pub struct Method {
	declaring: Arc<str>,
	name: Arc<str>,
	ty: MethodType,
	imp: NativeFn,
}

impl fmt::Debug for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Method")
			.field("declaring", &self.declaring)
			.field("name", &self.name)
			.field("type", &self.ty.to_string())
			.finish()
	}
}

impl Method {
	/// Method name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Method signature.
	pub fn method_type(&self) -> &MethodType {
		&self.ty
	}

	/// Invokes the method with full dynamic checking.
	pub fn invoke(&self, receiver: &Instance, args: &[Value]) -> Result<Value> {
		self.check_receiver(receiver)?;
		let boxed: Vec<Value> = args.to_vec();
		self.ty.check_args(&boxed).map_err(|source| DispatchError::SignatureMismatch {
			method: self.qualified(),
			source,
		})?;
		let result = (self.imp)(receiver, &boxed)?;
		let found = result.type_tag();
		if !self.ty.ret().accepts(found) {
			return Err(DispatchError::BadReturn {
				method: self.qualified(),
				expected: self.ty.ret(),
				found,
			});
		}
		Ok(result)
	}

	fn check_receiver(&self, receiver: &Instance) -> Result<()> {
		if receiver.class.name == self.declaring {
			return Ok(());
		}
		Err(DispatchError::ReceiverMismatch {
			method: self.qualified(),
			receiver: Arc::clone(&receiver.class.name),
		})
	}

	fn qualified(&self) -> Arc<str> {
		Arc::from(format!("{}.{}", self.declaring, self.name))
	}
}

/// A pre-resolved, exactly typed reference to a method.
///
/// The shape was fixed at lookup time, so [`MethodHandle::invoke_exact`] only
/// checks the receiver class and arity before calling straight into the
/// implementation.
#[derive(Debug, Clone)]
pub struct MethodHandle {
	method: Method,
}

impl MethodHandle {
	/// Exact signature of the handle.
	pub fn method_type(&self) -> &MethodType {
		&self.method.ty
	}

	/// Invokes the target directly.
	#[inline]
	pub fn invoke_exact(&self, receiver: &Instance, args: &[Value]) -> Result<Value> {
		self.method.check_receiver(receiver)?;
		let expected = self.method.ty.arity();
		if args.len() != expected {
			return Err(DispatchError::SignatureMismatch {
				method: self.method.qualified(),
				source: ArgumentError::Arity {
					expected,
					found: args.len(),
				},
			});
		}
		(self.method.imp)(receiver, args)
	}
}

/// A named class with a table of native methods, overloadable by parameter types.
#[derive(Debug)]
pub struct Class {
	name: Arc<str>,
	methods: FxHashMap<Arc<str>, Vec<Method>>,
}

impl Class {
	/// Starts building a class.
	pub fn builder(name: impl Into<Arc<str>>) -> ClassBuilder {
		ClassBuilder {
			name: name.into(),
			methods: FxHashMap::default(),
		}
	}

	/// Class name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Reflective lookup by name and parameter types, ignoring the return type.
	pub fn declared_method(&self, name: &str, params: &[TypeTag]) -> Result<&Method> {
		self.overloads(name)
			.find(|m| m.ty.params() == params)
			.ok_or_else(|| {
				self.lookup_failure(name, MethodType::new(TypeTag::Any, params.iter().copied()))
			})
	}

	/// Handle lookup: parameters and return type must match exactly.
	pub fn find_virtual(&self, name: &str, ty: &MethodType) -> Result<MethodHandle> {
		self.overloads(name)
			.find(|m| &m.ty == ty)
			.map(|m| MethodHandle { method: m.clone() })
			.ok_or_else(|| self.lookup_failure(name, ty.clone()))
	}

	/// Names of all declared methods, sorted.
	pub fn method_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.methods.keys().map(|k| &**k).collect();
		names.sort_unstable();
		names
	}

	fn overloads<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Method> + 'a {
		self.methods.get(name).into_iter().flatten()
	}

	fn lookup_failure(&self, name: &str, method_type: MethodType) -> DispatchError {
		trace!(class = %self.name, name, %method_type, "method lookup failed");
		DispatchError::LookupFailure {
			class: Arc::clone(&self.name),
			name: Arc::from(name),
			method_type,
		}
	}
}

/// Builder for [`Class`].
#[derive(Debug)]
pub struct ClassBuilder {
	name: Arc<str>,
	methods: FxHashMap<Arc<str>, Vec<Method>>,
}

impl ClassBuilder {
	/// Declares a method. A later declaration with identical parameters replaces
	/// the earlier one.
	pub fn method(mut self, name: &str, ty: MethodType, imp: NativeFn) -> Self {
		let name: Arc<str> = Arc::from(name);
		let overloads = self.methods.entry(Arc::clone(&name)).or_default();
		overloads.retain(|m| m.ty.params() != ty.params());
		overloads.push(Method {
			declaring: Arc::clone(&self.name),
			name,
			ty,
			imp,
		});
		self
	}

	/// Finishes the class.
	pub fn build(self) -> Arc<Class> {
		Arc::new(Class {
			name: self.name,
			methods: self.methods,
		})
	}
}

/// An object whose methods are dispatched through its class.
#[derive(Debug, Clone)]
pub struct Instance {
	class: Arc<Class>,
}

impl Instance {
	/// Creates an instance of `class`.
	pub fn new(class: Arc<Class>) -> Self {
		Self { class }
	}

	/// The instance's class.
	pub fn class(&self) -> &Arc<Class> {
		&self.class
	}
}

/// Reads argument `index` as an integer.
pub fn arg_int(method: &str, args: &[Value], index: usize) -> Result<i64> {
	match args.get(index) {
		Some(Value::Int(i)) => Ok(*i),
		other => Err(arg_error(method, args.len(), index, TypeTag::Int, other)),
	}
}

/// Reads argument `index` as a string.
pub fn arg_str<'a>(method: &str, args: &'a [Value], index: usize) -> Result<&'a str> {
	match args.get(index) {
		Some(Value::Str(s)) => Ok(&**s),
		other => Err(arg_error(method, args.len(), index, TypeTag::Str, other)),
	}
}

fn arg_error(method: &str, len: usize, index: usize, expected: TypeTag, found: Option<&Value>) -> DispatchError {
	let source = match found {
		Some(value) => ArgumentError::Type {
			index,
			expected,
			found: value.type_tag(),
		},
		None => ArgumentError::Arity {
			expected: index + 1,
			found: len,
		},
	};
	DispatchError::SignatureMismatch {
		method: Arc::from(method),
		source,
	}
}
