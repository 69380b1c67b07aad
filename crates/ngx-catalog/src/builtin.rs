//! The compiled-in catalog.
//!
//! Module sources are embedded at build time and parsed on first use. A
//! malformed built-in source is a bug in this crate, so it aborts loudly
//! instead of surfacing as a recoverable error.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::catalog::Catalog;
use crate::builder::CatalogBuilder;

macro_rules! catalog_sources {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!("../catalog/", $path))),)*]
    };
}

/// Embedded module sources as `(origin, toml)` pairs, in load order.
pub const BUILTIN_SOURCES: &[(&str, &str)] = catalog_sources![
    "core/ngx_core_module.toml",
    "core/ngx_events_module.toml",
    "http/ngx_http_core_module.toml",
    "http/ngx_http_index_module.toml",
    "http/ngx_http_rewrite_module.toml",
    "http/ngx_http_log_module.toml",
    "http/ngx_http_gzip_module.toml",
    "http/ngx_http_gzip_static_module.toml",
    "http/ngx_http_headers_module.toml",
    "http/ngx_http_proxy_module.toml",
    "http/ngx_http_fastcgi_module.toml",
    "http/ngx_http_upstream_module.toml",
    "http/ngx_http_ssl_module.toml",
    "http/ngx_http_v2_module.toml",
    "http/ngx_http_map_module.toml",
    "http/ngx_http_geo_module.toml",
    "http/ngx_http_split_clients_module.toml",
    "http/ngx_http_limit_conn_module.toml",
    "http/ngx_http_limit_req_module.toml",
    "http/ngx_http_access_module.toml",
    "http/ngx_http_auth_basic_module.toml",
    "http/ngx_http_realip_module.toml",
    "http/ngx_http_stub_status_module.toml",
    "mail/ngx_mail_core_module.toml",
    "mail/ngx_mail_ssl_module.toml",
    "mail/ngx_mail_proxy_module.toml",
    "mail/ngx_mail_auth_http_module.toml",
    "mail/ngx_mail_imap_module.toml",
    "stream/ngx_stream_core_module.toml",
    "stream/ngx_stream_proxy_module.toml",
    "stream/ngx_stream_upstream_module.toml",
    "stream/ngx_stream_ssl_module.toml",
    "stream/ngx_stream_access_module.toml",
    "stream/ngx_stream_limit_conn_module.toml",
    "stream/ngx_stream_return_module.toml",
    "stream/ngx_stream_map_module.toml",
    "stream/ngx_stream_log_module.toml",
    "openresty/ngx_http_lua_module.toml",
    "openresty/ngx_stream_lua_module.toml",
];

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| {
    let catalog = CatalogBuilder::new()
        .with_builtin_sources()
        .build()
        .unwrap_or_else(|err| panic!("built-in directive catalog is malformed: {err}"));
    Arc::new(catalog)
});

/// The shared built-in catalog, built on first access.
#[must_use]
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}

/// A shared handle to the built-in catalog.
#[must_use]
pub fn builtin_arc() -> Arc<Catalog> {
    Arc::clone(&BUILTIN)
}
