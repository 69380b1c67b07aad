//! `ngx-catalog` - Directive schema registry and resolver for nginx configuration.
//!
//! The catalog describes every known directive: its parameters, the module
//! that owns it, and the set of contexts (enclosing block directives) it may
//! appear in. Names are not unique; the same token can mean different things
//! inside `http`, `mail` and `stream` blocks.
//!
//! - **Model**: [`Module`], [`Directive`], [`Parameter`] and [`ContextRef`]
//! - **Builder**: two-pass construction from TOML module sources
//! - **Resolver**: `(name, context path)` queries over the immutable catalog
//!
//! # Example
//!
//! ```
//! use ngx_catalog::builtin;
//!
//! let catalog = builtin();
//! let listen = catalog.resolve("listen", &["mail", "server"]);
//! assert_eq!(catalog.module_of(listen[0]).name(), "ngx_mail_core_module");
//! assert!(catalog.has_container_overload("server"));
//! assert!(!catalog.has_container_overload("listen"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod builder;
mod builtin;
mod catalog;
mod error;
mod model;
mod resolve;
mod source;

pub use builder::CatalogBuilder;
pub use builtin::{builtin, builtin_arc, BUILTIN_SOURCES};
pub use catalog::Catalog;
pub use error::CatalogError;
pub use model::{
    BodyKind, ContextRef, Directive, DirectiveId, Module, ModuleId, Parameter, ValueType,
    ROOT_CONTEXT_NAME, SELF_CONTEXT_NAME,
};
