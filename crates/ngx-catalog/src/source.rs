//! On-disk catalog format.
//!
//! One TOML document describes one module:
//!
//! ```toml
//! [module]
//! name = "ngx_http_gzip_module"
//! imports = ["ngx_http_core_module"]
//!
//! [[directive]]
//! name = "gzip_comp_level"
//! context = ["http", "server", "location"]
//!
//! [[directive.parameter]]
//! name = "level"
//! type = "integer"
//! min = 1
//! max = 9
//! ```

use serde::Deserialize;

use crate::model::{BodyKind, ValueType};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ModuleFile {
    pub(crate) module: ModuleHeader,
    #[serde(default, rename = "directive")]
    pub(crate) directives: Vec<RawDirective>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ModuleHeader {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: String,
    /// Modules searched for unqualified context names after this one.
    #[serde(default)]
    pub(crate) imports: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDirective {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) syntax: Vec<String>,
    #[serde(default)]
    pub(crate) context: Vec<String>,
    #[serde(default, rename = "parameter")]
    pub(crate) parameters: Vec<RawParameter>,
    /// Shorthand for a single `on | off` parameter; the value is the default.
    #[serde(default)]
    pub(crate) toggle: Option<bool>,
    #[serde(default)]
    pub(crate) block: Option<BodyKind>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawParameter {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default, rename = "type")]
    pub(crate) value_type: ValueType,
    #[serde(default = "default_required")]
    pub(crate) required: bool,
    #[serde(default)]
    pub(crate) multiple: bool,
    #[serde(default)]
    pub(crate) default: Option<String>,
    #[serde(default)]
    pub(crate) values: Vec<String>,
    #[serde(default)]
    pub(crate) min: Option<i64>,
    #[serde(default)]
    pub(crate) max: Option<i64>,
}

fn default_required() -> bool {
    true
}

pub(crate) fn parse_module_file(text: &str) -> Result<ModuleFile, toml::de::Error> {
    toml::from_str(text)
}
