//! Hover documentation for directive names.
//!
//! The record shown is the catalog's best match for the directive's own
//! context path, so `listen` inside `mail { server { ... } }` documents the
//! mail overload rather than the HTTP one.

use std::fmt::Write as _;

use ngx_catalog::{Catalog, ContextRef, Directive, Parameter, ValueType};
use ngx_syntax::parser::parse;
use text_size::{TextRange, TextSize};

use crate::util::range_in_raw_body;

/// Result of a hover request.
#[derive(Debug, Clone)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// The range of the hovered element.
    pub range: Option<TextRange>,
}

impl HoverResult {
    /// Creates a new hover result.
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            range: None,
        }
    }

    /// Sets the range.
    #[must_use]
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = Some(range);
        self
    }
}

/// Computes hover information at the given position.
pub fn hover(catalog: &Catalog, source: &str, position: TextSize) -> Option<HoverResult> {
    let parsed = parse(source);
    let file = parsed.source_file();
    let directive = file.directive_name_at(position)?;
    let name = directive.name()?;
    let name_range = directive.name_range()?;
    // Entries of `map`, `types` and similar bodies are data, not directives.
    if range_in_raw_body(catalog, &file, name_range) {
        return None;
    }
    let record = catalog.best_match(&name, &directive.context_path())?;

    Some(HoverResult::new(directive_documentation(catalog, record)).with_range(name_range))
}

/// Renders the markdown documentation of one directive record.
#[must_use]
pub fn directive_documentation(catalog: &Catalog, directive: &Directive) -> String {
    let mut doc = String::new();
    let module = catalog.module_of(directive);
    let _ = writeln!(doc, "**{}** · `{}`", directive.name(), module.name());

    if !directive.description().is_empty() {
        let _ = write!(doc, "\n{}\n", directive.description().trim());
    }

    if !directive.syntax().is_empty() {
        doc.push_str("\n```nginx\n");
        for line in directive.syntax() {
            doc.push_str(line);
            doc.push('\n');
        }
        doc.push_str("```\n");
    }

    let contexts: Vec<String> = directive
        .contexts()
        .iter()
        .zip(directive.context_names())
        .map(|(context, name)| match context {
            ContextRef::SelfRef => format!("`{}`", directive.name()),
            ContextRef::Root | ContextRef::Directive(_) => format!("`{name}`"),
        })
        .collect();
    let _ = writeln!(doc, "\n**Context:** {}", contexts.join(", "));

    if !directive.parameters().is_empty() {
        doc.push_str("\n**Parameters:**\n");
        for (index, parameter) in directive.parameters().iter().enumerate() {
            doc.push_str(&parameter_line(index, parameter));
            doc.push('\n');
        }
    }

    doc
}

fn parameter_line(index: usize, parameter: &Parameter) -> String {
    let label = parameter
        .name()
        .map_or_else(|| format!("#{}", index + 1), str::to_string);

    let presence = if parameter.is_required() {
        "required"
    } else {
        "optional"
    };
    let mut traits = vec![parameter.value_type().as_str(), presence];
    if parameter.is_multiple() {
        traits.push("multiple");
    }

    let mut line = format!("- `{label}` ({})", traits.join(", "));
    if !parameter.description().is_empty() {
        let _ = write!(line, ": {}", parameter.description());
    }
    if let Some(default) = parameter.default_value() {
        let _ = write!(line, " Default: `{default}`.");
    }
    if parameter.value_type() == ValueType::Enum || parameter.value_type() == ValueType::Boolean {
        let values: Vec<String> = parameter
            .allowed_values()
            .iter()
            .map(|value| format!("`{value}`"))
            .collect();
        if !values.is_empty() {
            let _ = write!(line, " Values: {}.", values.join(" | "));
        }
    }
    match (parameter.min(), parameter.max()) {
        (Some(min), Some(max)) => {
            let _ = write!(line, " Range: {min}..={max}.");
        }
        (Some(min), None) => {
            let _ = write!(line, " Minimum: {min}.");
        }
        (None, Some(max)) => {
            let _ = write!(line, " Maximum: {max}.");
        }
        (None, None) => {}
    }
    line
}
