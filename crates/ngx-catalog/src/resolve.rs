//! Context-sensitive directive resolution.
//!
//! A query is a directive name plus the names of the enclosing block
//! directives, outermost first. Membership is decided by
//! [`Directive::matches`], which looks at the innermost frame only. When
//! several overloads of a name survive that test, the resolver narrows them
//! by walking their context chains up the rest of the path, so `listen`
//! inside `mail { server { } }` resolves to the mail overload only.

use crate::catalog::Catalog;
use crate::model::{ContextRef, Directive};

impl Catalog {
    /// Directive records named `name` that are valid at `path`, in catalog
    /// order. Empty when nothing matches.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, name: &str, path: &[S]) -> Vec<&Directive> {
        let candidates: Vec<&Directive> = self
            .all_directives_named(name)
            .into_iter()
            .filter(|directive| directive.matches(path))
            .collect();

        if candidates.len() < 2 || path.is_empty() {
            return candidates;
        }

        let narrowed: Vec<&Directive> = candidates
            .iter()
            .copied()
            .filter(|directive| self.chain_matches(directive, path))
            .collect();

        if narrowed.is_empty() {
            candidates
        } else {
            narrowed
        }
    }

    /// Every directive valid in the innermost context of `path`, in catalog
    /// order.
    #[must_use]
    pub fn candidates_for_context<S: AsRef<str>>(&self, path: &[S]) -> Vec<&Directive> {
        self.all_directives()
            .iter()
            .filter(|directive| directive.matches(path))
            .collect()
    }

    /// Whether any overload named `name` can open a block: it is used as a
    /// context by another directive, may nest in itself, or declares a raw
    /// body.
    #[must_use]
    pub fn has_container_overload(&self, name: &str) -> bool {
        self.containers.contains(name)
    }

    /// The record to document for a concrete directive instance.
    ///
    /// The first overload valid at `path` wins; if none is valid, the first
    /// overload with that name is used.
    #[must_use]
    pub fn best_match<S: AsRef<str>>(&self, name: &str, path: &[S]) -> Option<&Directive> {
        self.resolve(name, path)
            .first()
            .copied()
            .or_else(|| self.all_directives_named(name).first().copied())
    }

    /// Whether `directive` can sit at `path` with every enclosing frame
    /// itself sitting legally in the frames around it.
    ///
    /// Each step consumes one frame, so cycles in the context graph cannot
    /// make this loop.
    fn chain_matches<S: AsRef<str>>(&self, directive: &Directive, path: &[S]) -> bool {
        let Some((innermost, outer)) = path.split_last() else {
            return directive.allows_root();
        };
        let innermost = innermost.as_ref();

        directive.contexts().iter().any(|context| match *context {
            ContextRef::Root => false,
            ContextRef::SelfRef => {
                directive.name() == innermost && self.chain_matches(directive, outer)
            }
            ContextRef::Directive(id) => {
                let parent = self.directive(id);
                parent.name() == innermost && self.chain_matches(parent, outer)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::CatalogBuilder;

    const SOURCES: &[(&str, &str)] = &[
        (
            "http.toml",
            r#"
[module]
name = "http"

[[directive]]
name = "http"
context = ["main"]

[[directive]]
name = "server"
context = ["http"]

[[directive]]
name = "listen"
context = ["server"]
"#,
        ),
        (
            "mail.toml",
            r#"
[module]
name = "mail"

[[directive]]
name = "mail"
context = ["main"]

[[directive]]
name = "server"
context = ["mail"]

[[directive]]
name = "listen"
context = ["server"]
"#,
        ),
    ];

    fn catalog() -> crate::Catalog {
        let mut builder = CatalogBuilder::new();
        for (origin, text) in SOURCES {
            builder.add_source(*origin, *text);
        }
        builder.build().expect("catalog builds")
    }

    #[test]
    fn narrowing_separates_overloads_by_outer_frames() {
        let catalog = catalog();
        let http = catalog.resolve("listen", &["http", "server"]);
        let mail = catalog.resolve("listen", &["mail", "server"]);
        assert_eq!(http.len(), 1);
        assert_eq!(mail.len(), 1);
        assert_eq!(catalog.module_of(http[0]).name(), "http");
        assert_eq!(catalog.module_of(mail[0]).name(), "mail");
    }

    #[test]
    fn inconsistent_path_falls_back_to_innermost_matches() {
        let catalog = catalog();
        let both = catalog.resolve("listen", &["server"]);
        assert_eq!(both.len(), 2);
    }

    #[test]
    fn best_match_falls_back_to_first_overload() {
        let catalog = catalog();
        let directive = catalog
            .best_match("listen", &[] as &[&str])
            .expect("fallback");
        assert_eq!(catalog.module_of(directive).name(), "http");
    }
}
