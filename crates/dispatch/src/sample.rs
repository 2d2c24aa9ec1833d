//! The receiver class exercised by the dispatch benchmark.

use std::sync::Arc;

use switchpoint_primitives::{MethodType, TypeTag, Value};

use crate::class::{Class, Instance, arg_int, arg_str};
use crate::error::Result;

/// Name of the sample class.
pub const CLASS_NAME: &str = "MethodHandleTest";
/// One-string greeting method.
pub const TARGET: &str = "target";
/// Ten-integer summing method.
pub const TARGET_INTS: &str = "targetInts";
/// Parameter count of [`TARGET_INTS`].
pub const TARGET_INTS_ARITY: usize = 10;

/// `(str)str`
pub fn target_type() -> MethodType {
	MethodType::new(TypeTag::Str, [TypeTag::Str])
}

/// `(int,int,int,int,int,int,int,int,int,int)str`
pub fn target_ints_type() -> MethodType {
	MethodType::new(TypeTag::Str, [TypeTag::Int; TARGET_INTS_ARITY])
}

/// Builds the sample class.
pub fn sample_class() -> Arc<Class> {
	Class::builder(CLASS_NAME)
		.method(TARGET, target_type(), target)
		.method(TARGET_INTS, target_ints_type(), target_ints)
		.build()
}

fn target(_receiver: &Instance, args: &[Value]) -> Result<Value> {
	let name = arg_str(TARGET, args, 0)?;
	Ok(Value::from(format!("Hello {name}")))
}

fn target_ints(_receiver: &Instance, args: &[Value]) -> Result<Value> {
	let mut sum = 0i64;
	for index in 0..TARGET_INTS_ARITY {
		sum = sum.wrapping_add(arg_int(TARGET_INTS, args, index)?);
	}
	Ok(Value::from(sum.to_string()))
}
