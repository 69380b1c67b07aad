//! Catalog construction errors.
//!
//! Every error is fatal for the catalog being built: a partially resolved
//! context graph is never handed out.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors raised while building a [`crate::Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog source is not valid TOML or does not fit the schema.
    #[error("{origin}: {source}")]
    Parse {
        /// Label of the offending source.
        origin: SmolStr,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// Two sources declare the same module name.
    #[error("{origin}: module '{module}' is already defined")]
    DuplicateModule {
        /// Label of the second source.
        origin: SmolStr,
        /// The duplicated module name.
        module: SmolStr,
    },

    /// A module imports a module that was never loaded.
    #[error("module '{module}' imports unknown module '{import}'")]
    UnknownModule {
        /// The importing module.
        module: SmolStr,
        /// The missing module name.
        import: SmolStr,
    },

    /// A directive declares no contexts at all.
    #[error("directive '{directive}' in module '{module}' declares no contexts")]
    EmptyContexts {
        /// Owning module.
        module: SmolStr,
        /// Directive name.
        directive: SmolStr,
    },

    /// A directive may only nest inside itself and so can never be used.
    #[error("directive '{directive}' in module '{module}' only declares 'self' as context")]
    SelfOnly {
        /// Owning module.
        module: SmolStr,
        /// Directive name.
        directive: SmolStr,
    },

    /// A context name does not refer to any directive.
    #[error("directive '{directive}' in module '{module}' references unknown context '{context}'")]
    UnknownContext {
        /// Owning module.
        module: SmolStr,
        /// Directive name.
        directive: SmolStr,
        /// The unresolved context name.
        context: SmolStr,
    },

    /// A context name refers to several directives; it must be qualified
    /// as `module/name`.
    #[error(
        "directive '{directive}' in module '{module}' references ambiguous context '{context}' (declared in {})",
        .candidates.join(", ")
    )]
    AmbiguousContext {
        /// Owning module.
        module: SmolStr,
        /// Directive name.
        directive: SmolStr,
        /// The ambiguous context name.
        context: SmolStr,
        /// Modules declaring a directive with that name.
        candidates: Vec<SmolStr>,
    },

    /// A parameter declaration is inconsistent.
    #[error("parameter {index} of directive '{directive}' in module '{module}': {reason}")]
    InvalidParameter {
        /// Owning module.
        module: SmolStr,
        /// Directive name.
        directive: SmolStr,
        /// Zero-based parameter position.
        index: usize,
        /// What is wrong with it.
        reason: &'static str,
    },
}
