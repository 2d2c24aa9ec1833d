//! Interchangeable invoke-by-name strategies, chosen once at setup.

use std::fmt;
use std::str::FromStr;

use switchpoint_primitives::{MethodType, Value};
use tracing::debug;

use crate::class::{Class, Instance, Method, MethodHandle};
use crate::error::Result;

/// How a method named at setup time is reached on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
	/// Look the method up reflectively, then check every call dynamically.
	Reflection,
	/// Resolve an exactly typed handle once, then call straight through it.
	MethodHandle,
}

impl Strategy {
	/// Every strategy, in benchmark order.
	pub const ALL: [Strategy; 2] = [Strategy::MethodHandle, Strategy::Reflection];

	/// Label used in benchmark reports.
	pub const fn title(self) -> &'static str {
		match self {
			Strategy::Reflection => "reflection ",
			Strategy::MethodHandle => "methodhandle",
		}
	}
}

impl fmt::Display for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Strategy::Reflection => "reflection",
			Strategy::MethodHandle => "method-handle",
		})
	}
}

impl FromStr for Strategy {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"reflection" => Ok(Strategy::Reflection),
			"method-handle" | "methodhandle" => Ok(Strategy::MethodHandle),
			other => Err(format!("unknown strategy '{other}'")),
		}
	}
}

/// A prepared invoke-by-name capability.
pub trait Invoker: fmt::Debug + Send + Sync {
	/// Strategy this invoker implements.
	fn strategy(&self) -> Strategy;

	/// Signature the method was prepared with.
	fn method_type(&self) -> &MethodType;

	/// Calls the prepared method on `receiver`.
	fn call(&self, receiver: &Instance, args: &[Value]) -> Result<Value>;
}

#[derive(Debug)]
struct ReflectiveInvoker {
	method: Method,
}

impl Invoker for ReflectiveInvoker {
	fn strategy(&self) -> Strategy {
		Strategy::Reflection
	}

	fn method_type(&self) -> &MethodType {
		self.method.method_type()
	}

	fn call(&self, receiver: &Instance, args: &[Value]) -> Result<Value> {
		self.method.invoke(receiver, args)
	}
}

#[derive(Debug)]
struct HandleInvoker {
	handle: MethodHandle,
}

impl Invoker for HandleInvoker {
	fn strategy(&self) -> Strategy {
		Strategy::MethodHandle
	}

	fn method_type(&self) -> &MethodType {
		self.handle.method_type()
	}

	#[inline]
	fn call(&self, receiver: &Instance, args: &[Value]) -> Result<Value> {
		self.handle.invoke_exact(receiver, args)
	}
}

/// Resolves `name` on `class` with the given strategy.
///
/// Lookup failures are returned to the caller and never retried.
pub fn prepare(strategy: Strategy, class: &Class, name: &str, ty: &MethodType) -> Result<Box<dyn Invoker>> {
	let invoker: Box<dyn Invoker> = match strategy {
		Strategy::Reflection => Box::new(ReflectiveInvoker {
			method: class.declared_method(name, ty.params())?.clone(),
		}),
		Strategy::MethodHandle => Box::new(HandleInvoker {
			handle: class.find_virtual(name, ty)?,
		}),
	};
	debug!(%strategy, class = class.name(), name, method_type = %ty, "prepared invoker");
	Ok(invoker)
}
