//! The immutable schema registry.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use crate::model::{Directive, DirectiveId, Module, ModuleId};

/// Immutable collection of modules and directive records.
///
/// Built once by [`crate::CatalogBuilder`]; every query is a pure read, so a
/// catalog can be shared between threads without locking.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub(crate) modules: Vec<Module>,
    pub(crate) directives: Vec<Directive>,
    /// Overloads per name, in catalog order.
    pub(crate) by_name: IndexMap<SmolStr, Vec<DirectiveId>>,
    pub(crate) module_by_name: FxHashMap<SmolStr, ModuleId>,
    /// Names with at least one overload that can host children.
    pub(crate) containers: FxHashSet<SmolStr>,
}

impl Catalog {
    /// All modules, in load order.
    #[must_use]
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Looks up a module by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another catalog.
    #[must_use]
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.module_by_name.get(name).map(|id| self.module(*id))
    }

    /// The module owning `directive`.
    #[must_use]
    pub fn module_of(&self, directive: &Directive) -> &Module {
        self.module(directive.module)
    }

    /// Looks up a directive by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to another catalog.
    #[must_use]
    pub fn directive(&self, id: DirectiveId) -> &Directive {
        &self.directives[id.index()]
    }

    /// The full catalog, in declaration order.
    #[must_use]
    pub fn all_directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Every overload named `name`, in declaration order.
    #[must_use]
    pub fn all_directives_named(&self, name: &str) -> Vec<&Directive> {
        self.by_name
            .get(name)
            .map(|ids| ids.iter().map(|id| self.directive(*id)).collect())
            .unwrap_or_default()
    }

    /// Returns `true` if any directive is named `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Distinct directive names, in order of first declaration.
    pub fn directive_names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(SmolStr::as_str)
    }

    /// Number of directive records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns `true` if the catalog holds no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}
