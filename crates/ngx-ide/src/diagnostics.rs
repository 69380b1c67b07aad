//! Directive inspection.
//!
//! Walks every directive of a file and checks it against the catalog:
//! known name, legal context, block versus `;` shape, argument count and
//! argument values. Bodies declared as entries tables or Lua code are never
//! inspected.

use ngx_catalog::{Catalog, ContextRef, Directive as Record, Parameter, ValueType};
use ngx_syntax::ast::{Arg, AstNode, Directive};
use ngx_syntax::parser::parse;
use smol_str::SmolStr;
use text_size::TextRange;

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticSeverity {
    /// The configuration will be rejected.
    Error,
    /// Likely mistake.
    Warning,
}

impl DiagnosticSeverity {
    /// Lowercase label used in command-line output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// A diagnostic code identifying the type of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// The parser could not make sense of the input.
    SyntaxError,
    /// No directive of that name is known.
    UnknownDirective,
    /// The directive is known but not allowed where it appears.
    InvalidContext,
    /// A block directive is terminated with `;`.
    MissingBlock,
    /// A simple directive is given a `{ ... }` body.
    UnexpectedBlock,
    /// Fewer arguments than required parameters.
    MissingArguments,
    /// More arguments than declared parameters.
    TooManyArguments,
    /// A boolean argument other than `on` or `off`.
    InvalidBoolean,
    /// A value outside the declared set.
    InvalidEnumValue,
    /// A number outside the declared range.
    OutOfRange,
}

impl DiagnosticCode {
    /// Returns the string code (e.g., "N003").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SyntaxError => "N001",
            Self::UnknownDirective => "N002",
            Self::InvalidContext => "N003",
            Self::MissingBlock => "N004",
            Self::UnexpectedBlock => "N005",
            Self::MissingArguments => "N006",
            Self::TooManyArguments => "N007",
            Self::InvalidBoolean => "N008",
            Self::InvalidEnumValue => "N009",
            Self::OutOfRange => "N010",
        }
    }

    /// Returns the default severity for this diagnostic code.
    #[must_use]
    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            Self::SyntaxError
            | Self::InvalidContext
            | Self::MissingBlock
            | Self::UnexpectedBlock
            | Self::InvalidBoolean => DiagnosticSeverity::Error,

            Self::UnknownDirective
            | Self::MissingArguments
            | Self::TooManyArguments
            | Self::InvalidEnumValue
            | Self::OutOfRange => DiagnosticSeverity::Warning,
        }
    }
}

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic code.
    pub code: DiagnosticCode,
    /// The severity level.
    pub severity: DiagnosticSeverity,
    /// The source range where the diagnostic applies.
    pub range: TextRange,
    /// The diagnostic message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            range,
            message: message.into(),
        }
    }

    /// Returns true if this is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}]: {} (at {}..{})",
            self.severity.as_str(),
            self.code.code(),
            self.message,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

/// Which groups of checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticOptions {
    /// Report directives missing from the catalog.
    pub unknown_directive: bool,
    /// Report directives used outside their contexts.
    pub context: bool,
    /// Check argument counts and values.
    pub arguments: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            unknown_directive: true,
            context: true,
            arguments: true,
        }
    }
}

/// Collects all diagnostics for a file.
pub fn collect_diagnostics(catalog: &Catalog, source: &str) -> Vec<Diagnostic> {
    collect_diagnostics_with(catalog, source, &DiagnosticOptions::default())
}

/// Collects diagnostics with some checks switched off.
pub fn collect_diagnostics_with(
    catalog: &Catalog,
    source: &str,
    options: &DiagnosticOptions,
) -> Vec<Diagnostic> {
    let parsed = parse(source);
    let mut inspector = Inspector {
        catalog,
        options,
        diagnostics: parsed
            .errors()
            .iter()
            .map(|err| Diagnostic::new(DiagnosticCode::SyntaxError, err.range, err.message.clone()))
            .collect(),
    };

    let mut path = Vec::new();
    for directive in parsed.source_file().directives() {
        inspector.directive(&directive, &mut path);
    }

    let mut diagnostics = inspector.diagnostics;
    diagnostics.sort_by_key(|diagnostic| diagnostic.range.start());
    tracing::debug!(count = diagnostics.len(), "collected diagnostics");
    diagnostics
}

/// Filters diagnostics by severity.
pub fn filter_by_severity(
    diagnostics: &[Diagnostic],
    min_severity: DiagnosticSeverity,
) -> Vec<&Diagnostic> {
    diagnostics
        .iter()
        .filter(|d| d.severity <= min_severity)
        .collect()
}

/// Returns only error diagnostics.
pub fn errors_only(diagnostics: &[Diagnostic]) -> Vec<&Diagnostic> {
    diagnostics.iter().filter(|d| d.is_error()).collect()
}

/// Returns true if there are any errors.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

struct Inspector<'a> {
    catalog: &'a Catalog,
    options: &'a DiagnosticOptions,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Inspector<'a> {
    fn directive(&mut self, directive: &Directive, path: &mut Vec<SmolStr>) {
        let Some(name) = directive.name() else {
            return;
        };
        let range = directive
            .name_range()
            .unwrap_or_else(|| directive.text_range());

        let overloads = self.catalog.all_directives_named(&name);
        let resolved = self.catalog.resolve(&name, path);
        let record = resolved.first().copied();

        if overloads.is_empty() {
            if self.options.unknown_directive {
                self.push(
                    DiagnosticCode::UnknownDirective,
                    range,
                    format!("unknown directive '{name}'"),
                );
            }
        } else if resolved.is_empty() {
            if self.options.context {
                self.push(
                    DiagnosticCode::InvalidContext,
                    range,
                    format!(
                        "directive '{name}' is not allowed here; allowed in: {}",
                        allowed_contexts(&overloads)
                    ),
                );
            }
        } else {
            self.shape(directive, &name, range, &resolved);
            if let (Some(record), true) = (record, self.options.arguments) {
                self.arguments(directive, &name, range, record);
            }
        }

        // Entries tables look like directives to the parser but are data.
        if record.is_some_and(|record| record.body().is_some()) {
            return;
        }
        if let Some(block) = directive.block() {
            path.push(name);
            for child in block.directives() {
                self.directive(&child, path);
            }
            path.pop();
        }
    }

    fn shape(&mut self, directive: &Directive, name: &str, range: TextRange, resolved: &[&Record]) {
        if directive.semicolon().is_some()
            && !directive.has_body()
            && resolved.iter().all(|record| record.can_host_children())
        {
            self.push(
                DiagnosticCode::MissingBlock,
                range,
                format!("directive '{name}' must be followed by a block"),
            );
        } else if directive.has_body() && !resolved.iter().any(|record| record.can_host_children())
        {
            self.push(
                DiagnosticCode::UnexpectedBlock,
                range,
                format!("directive '{name}' does not take a block"),
            );
        }
    }

    fn arguments(&mut self, directive: &Directive, name: &str, range: TextRange, record: &'a Record) {
        let args: Vec<Arg> = directive.args().collect();
        let required = record.required_arguments();
        if args.len() < required {
            self.push(
                DiagnosticCode::MissingArguments,
                range,
                format!(
                    "directive '{name}' expects at least {required} argument{}, found {}",
                    plural(required),
                    args.len()
                ),
            );
            return;
        }
        if let Some(max) = record.max_arguments() {
            if args.len() > max {
                self.push(
                    DiagnosticCode::TooManyArguments,
                    args[max].text_range(),
                    format!(
                        "directive '{name}' takes at most {max} argument{}, found {}",
                        plural(max),
                        args.len()
                    ),
                );
                return;
            }
        }

        for (arg, parameter) in args.iter().zip(bind_arguments(record.parameters(), args.len())) {
            if let Some(parameter) = parameter {
                self.value(name, arg, parameter);
            }
        }
    }

    fn value(&mut self, name: &str, arg: &Arg, parameter: &Parameter) {
        let value = arg.value();
        // Variables are only known at request time.
        if value.contains('$') {
            return;
        }
        let range = arg.text_range();

        match parameter.value_type() {
            ValueType::Boolean if value != "on" && value != "off" => {
                self.push(
                    DiagnosticCode::InvalidBoolean,
                    range,
                    format!("invalid value '{value}' for '{name}', expected 'on' or 'off'"),
                );
            }
            ValueType::Enum
                if !parameter
                    .allowed_values()
                    .iter()
                    .any(|allowed| allowed.as_str() == value) =>
            {
                let allowed: Vec<&str> = parameter
                    .allowed_values()
                    .iter()
                    .map(SmolStr::as_str)
                    .collect();
                self.push(
                    DiagnosticCode::InvalidEnumValue,
                    range,
                    format!(
                        "invalid value '{value}' for '{name}', expected one of: {}",
                        allowed.join(", ")
                    ),
                );
            }
            ValueType::Integer | ValueType::Number => {
                let Ok(number) = value.parse::<i64>() else {
                    return;
                };
                let below = parameter.min().is_some_and(|min| number < min);
                let above = parameter.max().is_some_and(|max| number > max);
                if below || above {
                    self.push(
                        DiagnosticCode::OutOfRange,
                        range,
                        format!(
                            "value {number} for '{name}' is out of range ({})",
                            describe_range(parameter.min(), parameter.max())
                        ),
                    );
                }
            }
            _ => {}
        }
    }

    fn push(&mut self, code: DiagnosticCode, range: TextRange, message: String) {
        self.diagnostics.push(Diagnostic::new(code, range, message));
    }
}

/// Maps each argument position to the parameter it binds to.
///
/// Parameters before a `multiple` one take one argument each, parameters
/// after it take the trailing arguments, and the `multiple` parameter
/// absorbs whatever is left in between.
fn bind_arguments(parameters: &[Parameter], count: usize) -> Vec<Option<&Parameter>> {
    let Some(multiple) = parameters.iter().position(Parameter::is_multiple) else {
        return (0..count).map(|i| parameters.get(i)).collect();
    };
    let tail = parameters.len() - multiple - 1;

    (0..count)
        .map(|i| {
            if i < multiple {
                parameters.get(i)
            } else if count - i <= tail {
                parameters.get(parameters.len() - (count - i))
            } else {
                parameters.get(multiple)
            }
        })
        .collect()
}

fn allowed_contexts(overloads: &[&Record]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for record in overloads {
        for (context, name) in record.contexts().iter().zip(record.context_names()) {
            let name = match context {
                ContextRef::SelfRef => record.name(),
                ContextRef::Root | ContextRef::Directive(_) => name.as_str(),
            };
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names.join(", ")
}

fn describe_range(min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}..={max}"),
        (Some(min), None) => format!(">= {min}"),
        (None, Some(max)) => format!("<= {max}"),
        (None, None) => String::new(),
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter(multiple: bool) -> Parameter {
        ngx_catalog::CatalogBuilder::new()
            .with_source(
                "t.toml",
                format!(
                    "[module]\nname = \"t\"\n[[directive]]\nname = \"d\"\ncontext = [\"main\"]\n[[directive.parameter]]\nmultiple = {multiple}\n"
                ),
            )
            .build()
            .expect("catalog builds")
            .all_directives()[0]
            .parameters()[0]
            .clone()
    }

    #[test]
    fn multiple_parameter_absorbs_the_middle() {
        let single = parameter(false);
        let many = parameter(true);
        let parameters = vec![single.clone(), many.clone(), single.clone()];
        let bound = bind_arguments(&parameters, 5);
        let multiple: Vec<bool> = bound
            .iter()
            .map(|p| p.is_some_and(Parameter::is_multiple))
            .collect();
        assert_eq!(multiple, [false, true, true, true, false]);
    }

    #[test]
    fn trailing_parameter_binds_last_argument() {
        let many = parameter(true);
        let single = parameter(false);
        let parameters = vec![many, single];
        let bound = bind_arguments(&parameters, 1);
        assert_eq!(bound.len(), 1);
        assert!(!bound[0].is_some_and(Parameter::is_multiple));
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(DiagnosticCode::SyntaxError.code(), "N001");
        assert_eq!(DiagnosticCode::OutOfRange.code(), "N010");
        assert_eq!(
            DiagnosticCode::InvalidContext.severity(),
            DiagnosticSeverity::Error
        );
        assert_eq!(
            DiagnosticCode::UnknownDirective.severity(),
            DiagnosticSeverity::Warning
        );
    }
}
