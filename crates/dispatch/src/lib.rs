//! Invoke-by-name dispatch with two interchangeable strategies.
//!
//! A method named at setup time can be reached either through reflective
//! lookup ([`Class::declared_method`] + [`Method::invoke`], which checks every
//! call dynamically) or through a pre-resolved [`MethodHandle`]
//! ([`Class::find_virtual`] + [`MethodHandle::invoke_exact`], which fixes the
//! shape once). [`prepare`] selects one behind the [`Invoker`] trait, and
//! [`bench::run`] times it.

pub mod bench;
pub mod class;
pub mod error;
pub mod sample;
pub mod strategy;


pub use class::{Class, ClassBuilder, Instance, Method, MethodHandle, NativeFn};
pub use error::{DispatchError, Result};
pub use strategy::{Invoker, Strategy, prepare};
