//! Two-pass catalog construction.
//!
//! The first pass allocates every module and directive record with its
//! context names still unresolved. The second pass turns each name into a
//! [`ContextRef`], which is only possible once every record exists because
//! contexts may point forward, across modules, or back at the directive
//! itself. A final pass inverts the context graph to find the directives
//! that can host children.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::model::{
    ContextRef, Directive, DirectiveId, Module, ModuleId, Parameter, ValueType,
    ROOT_CONTEXT_NAME, SELF_CONTEXT_NAME,
};
use crate::source::{parse_module_file, RawDirective, RawParameter};

#[derive(Debug, Clone)]
struct CatalogSource {
    origin: SmolStr,
    text: String,
}

/// Collects catalog sources and builds an immutable [`Catalog`].
///
/// Declaration order across sources is the order in which they were added;
/// resolution results follow that order.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    sources: Vec<CatalogSource>,
}

impl CatalogBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every compiled-in module source.
    #[must_use]
    pub fn with_builtin_sources(mut self) -> Self {
        for (origin, text) in crate::builtin::BUILTIN_SOURCES {
            self.add_source(*origin, *text);
        }
        self
    }

    /// Adds one TOML module source.
    #[must_use]
    pub fn with_source(mut self, origin: impl Into<SmolStr>, text: impl Into<String>) -> Self {
        self.add_source(origin, text);
        self
    }

    /// Adds one TOML module source.
    pub fn add_source(&mut self, origin: impl Into<SmolStr>, text: impl Into<String>) -> &mut Self {
        self.sources.push(CatalogSource {
            origin: origin.into(),
            text: text.into(),
        });
        self
    }

    /// Number of sources added so far.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Builds the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found; no partial catalog is
    /// produced.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog {
            modules: Vec::new(),
            directives: Vec::new(),
            by_name: IndexMap::new(),
            module_by_name: FxHashMap::default(),
            containers: FxHashSet::default(),
        };
        let mut imports: Vec<Vec<SmolStr>> = Vec::new();
        let mut pending: Vec<Vec<SmolStr>> = Vec::new();

        // Pass 1: allocate records.
        for source in self.sources {
            let file = parse_module_file(&source.text).map_err(|error| CatalogError::Parse {
                origin: source.origin.clone(),
                source: error,
            })?;

            let module_name = SmolStr::new(&file.module.name);
            if catalog.module_by_name.contains_key(&module_name) {
                return Err(CatalogError::DuplicateModule {
                    origin: source.origin,
                    module: module_name,
                });
            }

            let module_id = ModuleId(catalog.modules.len() as u32);
            let mut module = Module {
                id: module_id,
                name: module_name.clone(),
                description: file.module.description,
                origin: source.origin,
                directives: Vec::new(),
            };

            for raw in file.directives {
                let id = DirectiveId(catalog.directives.len() as u32);
                let (directive, contexts) = lower_directive(raw, &module_name, module_id, id)?;
                catalog
                    .by_name
                    .entry(directive.name.clone())
                    .or_default()
                    .push(id);
                module.directives.push(id);
                catalog.directives.push(directive);
                pending.push(contexts);
            }

            catalog.module_by_name.insert(module_name, module_id);
            imports.push(file.module.imports.iter().map(SmolStr::new).collect());
            catalog.modules.push(module);
        }

        let imports = resolve_imports(&catalog, &imports)?;

        // Pass 2: resolve context names against the complete record set.
        let mut resolved = Vec::with_capacity(pending.len());
        for (directive, names) in catalog.directives.iter().zip(&pending) {
            let mut contexts = Vec::with_capacity(names.len());
            let mut display = Vec::with_capacity(names.len());
            for name in names {
                let context = resolve_context(&catalog, &imports, directive, name)?;
                display.push(match context {
                    ContextRef::Root => SmolStr::new_inline(ROOT_CONTEXT_NAME),
                    ContextRef::SelfRef => SmolStr::new_inline(SELF_CONTEXT_NAME),
                    ContextRef::Directive(id) => catalog.directive(id).name.clone(),
                });
                contexts.push(context);
            }
            resolved.push((contexts, display));
        }
        for (directive, (contexts, display)) in catalog.directives.iter_mut().zip(resolved) {
            directive.contexts = contexts;
            directive.context_names = display;
        }

        // Pass 3: invert the context graph.
        let mut hosts = vec![false; catalog.directives.len()];
        for directive in &catalog.directives {
            if directive.body.is_some() {
                hosts[directive.id.index()] = true;
            }
            for context in &directive.contexts {
                match context {
                    ContextRef::Root => {}
                    ContextRef::SelfRef => hosts[directive.id.index()] = true,
                    ContextRef::Directive(parent) => hosts[parent.index()] = true,
                }
            }
        }
        for (directive, hosts_children) in catalog.directives.iter_mut().zip(hosts) {
            directive.hosts_children = hosts_children;
            if hosts_children {
                catalog.containers.insert(directive.name.clone());
            }
        }

        debug!(
            modules = catalog.modules.len(),
            directives = catalog.directives.len(),
            names = catalog.by_name.len(),
            "built directive catalog"
        );

        Ok(catalog)
    }
}

fn lower_directive(
    raw: RawDirective,
    module_name: &SmolStr,
    module: ModuleId,
    id: DirectiveId,
) -> Result<(Directive, Vec<SmolStr>), CatalogError> {
    let name = SmolStr::new(&raw.name);

    if raw.context.is_empty() {
        return Err(CatalogError::EmptyContexts {
            module: module_name.clone(),
            directive: name,
        });
    }
    if raw.context.iter().all(|context| context == SELF_CONTEXT_NAME) {
        return Err(CatalogError::SelfOnly {
            module: module_name.clone(),
            directive: name,
        });
    }

    let invalid = |index: usize, reason: &'static str| CatalogError::InvalidParameter {
        module: module_name.clone(),
        directive: name.clone(),
        index,
        reason,
    };

    let mut syntax = raw.syntax;
    let parameters = match raw.toggle {
        Some(_) if !raw.parameters.is_empty() => {
            return Err(invalid(0, "toggle directives cannot declare parameters"));
        }
        Some(enabled) => {
            if syntax.is_empty() {
                syntax.push(format!("{name} on | off;"));
            }
            vec![toggle_parameter(enabled)]
        }
        None => raw
            .parameters
            .into_iter()
            .enumerate()
            .map(|(index, parameter)| {
                lower_parameter(parameter).map_err(|reason| invalid(index, reason))
            })
            .collect::<Result<Vec<_>, _>>()?,
    };

    let directive = Directive {
        id,
        name,
        description: raw.description,
        syntax,
        parameters,
        contexts: Vec::new(),
        context_names: Vec::new(),
        module,
        body: raw.block,
        hosts_children: false,
    };
    let contexts = raw.context.iter().map(SmolStr::new).collect();

    Ok((directive, contexts))
}

fn lower_parameter(raw: RawParameter) -> Result<Parameter, &'static str> {
    if let (Some(min), Some(max)) = (raw.min, raw.max) {
        if min > max {
            return Err("minimum is greater than maximum");
        }
    }
    if (raw.min.is_some() || raw.max.is_some()) && !raw.value_type.is_numeric() {
        return Err("a range is only allowed on numeric parameters");
    }
    match (raw.value_type, raw.values.is_empty()) {
        (ValueType::Enum, true) => return Err("enum parameters need allowed values"),
        (other, false) if other != ValueType::Enum => {
            return Err("allowed values are only valid for enum parameters");
        }
        _ => {}
    }

    Ok(Parameter {
        name: raw.name.map(SmolStr::from),
        description: raw.description,
        value_type: raw.value_type,
        required: raw.required,
        multiple: raw.multiple,
        default: raw.default.map(SmolStr::from),
        allowed_values: raw.values.into_iter().map(SmolStr::from).collect(),
        min: raw.min,
        max: raw.max,
    })
}

fn toggle_parameter(enabled: bool) -> Parameter {
    Parameter {
        name: Some(SmolStr::new_inline("state")),
        description: String::from("Enables or disables the feature."),
        value_type: ValueType::Boolean,
        required: true,
        multiple: false,
        default: Some(SmolStr::new_inline(if enabled { "on" } else { "off" })),
        allowed_values: vec![SmolStr::new_inline("on"), SmolStr::new_inline("off")],
        min: None,
        max: None,
    }
}

fn resolve_imports(
    catalog: &Catalog,
    imports: &[Vec<SmolStr>],
) -> Result<Vec<Vec<ModuleId>>, CatalogError> {
    catalog
        .modules
        .iter()
        .zip(imports)
        .map(|(module, names)| {
            names
                .iter()
                .map(|import| {
                    catalog.module_by_name.get(import).copied().ok_or_else(|| {
                        CatalogError::UnknownModule {
                            module: module.name.clone(),
                            import: import.clone(),
                        }
                    })
                })
                .collect()
        })
        .collect()
}

/// Resolves one context name of `directive`.
///
/// `main` and `self` are the sentinels. `module/name` picks a directive of a
/// specific module. A bare name is looked up in the directive's own module,
/// then in the module's imports in order, then across the whole catalog,
/// where it must be unique.
fn resolve_context(
    catalog: &Catalog,
    imports: &[Vec<ModuleId>],
    directive: &Directive,
    context: &str,
) -> Result<ContextRef, CatalogError> {
    let module = catalog.module(directive.module);
    let unknown = || CatalogError::UnknownContext {
        module: module.name.clone(),
        directive: directive.name.clone(),
        context: SmolStr::new(context),
    };
    let ambiguous = |candidates: Vec<SmolStr>| CatalogError::AmbiguousContext {
        module: module.name.clone(),
        directive: directive.name.clone(),
        context: SmolStr::new(context),
        candidates,
    };

    match context {
        ROOT_CONTEXT_NAME => return Ok(ContextRef::Root),
        SELF_CONTEXT_NAME => return Ok(ContextRef::SelfRef),
        _ => {}
    }

    if let Some((module_name, name)) = context.split_once('/') {
        let target = catalog
            .module_by_name
            .get(module_name)
            .copied()
            .ok_or_else(unknown)?;
        return match find_in_module(catalog, target, name) {
            Lookup::One(id) => Ok(ContextRef::Directive(id)),
            Lookup::None => Err(unknown()),
            Lookup::Many => Err(ambiguous(vec![SmolStr::new(module_name)])),
        };
    }

    let search = std::iter::once(directive.module)
        .chain(imports[directive.module.index()].iter().copied());
    for candidate in search {
        match find_in_module(catalog, candidate, context) {
            Lookup::One(id) => return Ok(ContextRef::Directive(id)),
            Lookup::None => {}
            Lookup::Many => return Err(ambiguous(vec![catalog.module(candidate).name.clone()])),
        }
    }

    match catalog.by_name.get(context).map(Vec::as_slice) {
        Some([id]) => Ok(ContextRef::Directive(*id)),
        Some(ids) if ids.len() > 1 => {
            let mut candidates: Vec<SmolStr> = Vec::new();
            for id in ids {
                let name = &catalog.module(catalog.directive(*id).module).name;
                if !candidates.contains(name) {
                    candidates.push(name.clone());
                }
            }
            Err(ambiguous(candidates))
        }
        _ => Err(unknown()),
    }
}

enum Lookup {
    None,
    One(DirectiveId),
    Many,
}

fn find_in_module(catalog: &Catalog, module: ModuleId, name: &str) -> Lookup {
    let mut found = catalog
        .module(module)
        .directives
        .iter()
        .copied()
        .filter(|id| catalog.directive(*id).name == name);
    match (found.next(), found.next()) {
        (None, _) => Lookup::None,
        (Some(id), None) => Lookup::One(id),
        (Some(_), Some(_)) => Lookup::Many,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTTP: &str = r#"
[module]
name = "http_core"

[[directive]]
name = "http"
context = ["main"]

[[directive]]
name = "server"
context = ["http"]

[[directive]]
name = "location"
context = ["server", "self"]
"#;

    #[test]
    fn resolves_forward_and_self_references() {
        let catalog = CatalogBuilder::new()
            .with_source("http.toml", HTTP)
            .build()
            .expect("catalog builds");

        let location = catalog.all_directives_named("location")[0];
        assert_eq!(location.context_names(), ["server", "self"]);
        assert_eq!(location.contexts()[1], ContextRef::SelfRef);
        assert!(location.can_host_children());

        let http = catalog.all_directives_named("http")[0];
        assert_eq!(http.contexts(), [ContextRef::Root]);
        assert!(http.can_host_children());
    }

    #[test]
    fn toggle_expands_into_boolean_parameter() {
        let source = r#"
[module]
name = "gzip"

[[directive]]
name = "gzip"
context = ["main"]
toggle = false
"#;
        let catalog = CatalogBuilder::new()
            .with_source("gzip.toml", source)
            .build()
            .expect("catalog builds");
        let gzip = catalog.all_directives_named("gzip")[0];
        assert_eq!(gzip.syntax(), ["gzip on | off;"]);
        let parameter = &gzip.parameters()[0];
        assert_eq!(parameter.value_type(), ValueType::Boolean);
        assert_eq!(parameter.default_value(), Some("off"));
        assert!(parameter.is_required());
    }

    #[test]
    fn imports_break_ties_between_overloads() {
        let mail = r#"
[module]
name = "mail_core"

[[directive]]
name = "mail"
context = ["main"]

[[directive]]
name = "server"
context = ["mail"]
"#;
        let mail_ssl = r#"
[module]
name = "mail_ssl"
imports = ["mail_core"]

[[directive]]
name = "starttls"
context = ["mail", "server"]
"#;
        let catalog = CatalogBuilder::new()
            .with_source("http.toml", HTTP)
            .with_source("mail.toml", mail)
            .with_source("mail_ssl.toml", mail_ssl)
            .build()
            .expect("catalog builds");

        let starttls = catalog.all_directives_named("starttls")[0];
        let ContextRef::Directive(server) = starttls.contexts()[1] else {
            panic!("server context expected");
        };
        let server = catalog.directive(server);
        assert_eq!(catalog.module(server.module()).name(), "mail_core");
    }
}
