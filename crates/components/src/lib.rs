//! `components` crate — the component catalog's typed surface and the
//! `ComponentInvoker` capability trait.
//!
//! A component is a reusable typed unit (input / process / output /
//! decision) with a configuration schema every instance must conform to.
//! The engine crate dispatches node execution through [`ComponentInvoker`]
//! trait objects, resolved once per node from an [`InvokerRegistry`] keyed
//! by component kind.

pub mod builtin;
pub mod error;
pub mod kind;
pub mod mock;
pub mod registry;
pub mod schema;
pub mod traits;

pub use error::ConfigError;
pub use kind::ComponentKind;
pub use registry::InvokerRegistry;
pub use schema::ConfigSchema;
pub use traits::{ComponentInvoker, InvocationContext, NoSecrets, Outcome, SecretResolver};
