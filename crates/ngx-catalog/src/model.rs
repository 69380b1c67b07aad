//! Schema records: modules, directives, parameters and context references.
//!
//! Records are created once by [`crate::CatalogBuilder`] and never mutated
//! afterwards. Directives refer to each other through [`DirectiveId`]s, so the
//! context graph may contain cycles without any shared ownership.

use serde::Deserialize;
use smol_str::SmolStr;

/// Index of a module inside its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(pub(crate) u32);

impl ModuleId {
    /// Position of the module in catalog order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a directive inside its catalog.
///
/// Directive identity is by id, never by name: several records may share a
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirectiveId(pub(crate) u32);

impl DirectiveId {
    /// Position of the directive in catalog order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One entry of a directive's context set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextRef {
    /// Top level of the configuration file.
    Root,
    /// Inside a block of the same directive record.
    SelfRef,
    /// Inside the block of another directive record.
    Directive(DirectiveId),
}

/// Display name used for [`ContextRef::Root`].
pub const ROOT_CONTEXT_NAME: &str = "main";

/// Display name used for [`ContextRef::SelfRef`].
pub const SELF_CONTEXT_NAME: &str = "self";

/// Semantic type of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free-form string.
    #[default]
    String,
    /// Whole number.
    Integer,
    /// Number that may carry a fraction.
    Number,
    /// `on` or `off`.
    Boolean,
    /// One of a declared set of strings.
    Enum,
    /// Byte size such as `512k` or `10m`.
    Size,
    /// Time interval such as `30s` or `1h`.
    Time,
    /// Rate such as `10r/s`.
    Rate,
    /// File system path.
    Path,
    /// Byte offset such as `1g`.
    Offset,
    /// Several strings.
    StringList,
    /// Free list of values.
    List,
}

impl ValueType {
    /// Lowercase name used in catalog files and documentation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Size => "size",
            Self::Time => "time",
            Self::Rate => "rate",
            Self::Path => "path",
            Self::Offset => "offset",
            Self::StringList => "string_list",
            Self::List => "list",
        }
    }

    /// Returns `true` for types that accept a `[min, max]` range.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Number)
    }
}

/// Shape of a block body that is not a list of directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    /// Key/value table, as in `map` or `types`.
    Entries,
    /// Raw Lua source.
    Lua,
}

/// A named group of directives.
#[derive(Debug, Clone)]
pub struct Module {
    pub(crate) id: ModuleId,
    pub(crate) name: SmolStr,
    pub(crate) description: String,
    pub(crate) origin: SmolStr,
    pub(crate) directives: Vec<DirectiveId>,
}

impl Module {
    /// The module id.
    #[must_use]
    pub fn id(&self) -> ModuleId {
        self.id
    }

    /// Unique module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Label of the catalog source the module was loaded from.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Directives owned by this module, in declaration order.
    #[must_use]
    pub fn directives(&self) -> &[DirectiveId] {
        &self.directives
    }
}

/// One declared parameter of a directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub(crate) name: Option<SmolStr>,
    pub(crate) description: String,
    pub(crate) value_type: ValueType,
    pub(crate) required: bool,
    pub(crate) multiple: bool,
    pub(crate) default: Option<SmolStr>,
    pub(crate) allowed_values: Vec<SmolStr>,
    pub(crate) min: Option<i64>,
    pub(crate) max: Option<i64>,
}

impl Parameter {
    /// Parameter name, if the catalog gives one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Semantic value type.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Whether the parameter must be given.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the parameter accepts several values.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Allowed values for enum parameters.
    #[must_use]
    pub fn allowed_values(&self) -> &[SmolStr] {
        &self.allowed_values
    }

    /// Inclusive lower bound for numeric parameters.
    #[must_use]
    pub fn min(&self) -> Option<i64> {
        self.min
    }

    /// Inclusive upper bound for numeric parameters.
    #[must_use]
    pub fn max(&self) -> Option<i64> {
        self.max
    }
}

/// One directive record.
#[derive(Debug, Clone)]
pub struct Directive {
    pub(crate) id: DirectiveId,
    pub(crate) name: SmolStr,
    pub(crate) description: String,
    pub(crate) syntax: Vec<String>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) contexts: Vec<ContextRef>,
    pub(crate) context_names: Vec<SmolStr>,
    pub(crate) module: ModuleId,
    pub(crate) body: Option<BodyKind>,
    pub(crate) hosts_children: bool,
}

impl Directive {
    /// The directive id.
    #[must_use]
    pub fn id(&self) -> DirectiveId {
        self.id
    }

    /// Directive name. Not unique across the catalog.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Usage strings for display.
    #[must_use]
    pub fn syntax(&self) -> &[String] {
        &self.syntax
    }

    /// Declared parameters, in positional order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Resolved context set.
    #[must_use]
    pub fn contexts(&self) -> &[ContextRef] {
        &self.contexts
    }

    /// Context names for display, aligned with [`Directive::contexts`].
    ///
    /// `main` stands for the top level and `self` for the directive's own
    /// block.
    #[must_use]
    pub fn context_names(&self) -> &[SmolStr] {
        &self.context_names
    }

    /// Owning module.
    #[must_use]
    pub fn module(&self) -> ModuleId {
        self.module
    }

    /// Declared non-directive body, if any.
    #[must_use]
    pub fn body(&self) -> Option<BodyKind> {
        self.body
    }

    /// Whether the directive may open a block that holds other directives
    /// or a declared raw body.
    #[must_use]
    pub fn can_host_children(&self) -> bool {
        self.hosts_children
    }

    /// Whether `ROOT` is part of the context set.
    #[must_use]
    pub fn allows_root(&self) -> bool {
        self.contexts.contains(&ContextRef::Root)
    }

    /// Context membership test against a context path.
    ///
    /// An empty path matches iff the directive allows the top level.
    /// Otherwise only the innermost frame is inspected: it matches when a
    /// referenced context directive carries that name, or when the directive
    /// may nest in itself and the frame is its own name.
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, path: &[S]) -> bool {
        let Some(innermost) = path.last() else {
            return self.allows_root();
        };
        let innermost = innermost.as_ref();

        self.contexts
            .iter()
            .zip(&self.context_names)
            .any(|(context, name)| match context {
                ContextRef::Root => false,
                ContextRef::SelfRef => self.name.as_str() == innermost,
                ContextRef::Directive(_) => name.as_str() == innermost,
            })
    }

    /// Number of arguments that must be present.
    #[must_use]
    pub fn required_arguments(&self) -> usize {
        self.parameters.iter().filter(|p| p.required).count()
    }

    /// Maximum number of arguments, `None` when unbounded or undeclared.
    #[must_use]
    pub fn max_arguments(&self) -> Option<usize> {
        if self.parameters.is_empty() || self.parameters.iter().any(|p| p.multiple) {
            None
        } else {
            Some(self.parameters.len())
        }
    }
}
