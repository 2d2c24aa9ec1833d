//! Inline-cached call sites with explicit invalidation.
//!
//! A [`CallSite`] starts on a slow path that asks a [`Resolver`] for the value
//! of a named constant. The resolver pairs the value with a fresh
//! [`GuardToken`], and the site rewrites itself into a fast path that returns
//! the value directly until that token is revoked. [`ConstantStore::set`]
//! revokes every token issued for the name it writes, so the next call
//! re-resolves.
//!
//! ```
//! use std::sync::Arc;
//!
//! use switchpoint_callsite::{CallSite, ConstantResolver, ConstantStore};
//! use switchpoint_primitives::{MethodType, TypeTag, Value};
//!
//! let store = ConstantStore::new();
//! store.set("site1", "Foo");
//!
//! let resolver = Arc::new(ConstantResolver::new());
//! let site = CallSite::new("site1", MethodType::nullary(TypeTag::Any), resolver.clone()).unwrap();
//!
//! assert_eq!(site.invoke(&store).unwrap(), Value::from("Foo"));
//! assert_eq!(site.invoke(&store).unwrap(), Value::from("Foo"));
//! assert_eq!(resolver.calls(), 1);
//!
//! store.set("site1", "Bar");
//! assert_eq!(site.invoke(&store).unwrap(), Value::from("Bar"));
//! assert_eq!(resolver.calls(), 2);
//! ```

pub mod binding;
pub mod error;
pub mod guard;
pub mod resolver;
pub mod site;
pub mod store;

#[cfg(test)]
mod invariants;

pub use binding::{Binding, FastPath};
pub use error::{CallSiteError, Result};
pub use guard::{GuardState, GuardToken, Invalidator};
pub use resolver::{ConstantResolver, Resolution, Resolver};
pub use site::{CallSite, MissingPolicy, SiteStats};
pub use store::ConstantStore;
