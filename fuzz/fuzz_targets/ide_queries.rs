#![no_main]

use libfuzzer_sys::fuzz_target;
use ngx_catalog::builtin;
use ngx_ide::{
    collect_diagnostics, complete, folding_ranges, format_document, hover, smart_enter,
    FormatOptions,
};
use ngx_syntax::parser::parse;
use text_size::TextSize;

const MAX_SOURCE_BYTES: usize = 4096;

fn source_offset(seed: u8, source: &str) -> TextSize {
    let mut offset = if source.is_empty() {
        0
    } else {
        usize::from(seed) % (source.len() + 1)
    };
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    TextSize::try_from(offset).unwrap_or_default()
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let seed = data[0];
    let capped = &data[1..data.len().min(MAX_SOURCE_BYTES)];
    let source = String::from_utf8_lossy(capped).into_owned();
    let catalog = builtin();
    let offset = source_offset(seed, &source);

    let _ = collect_diagnostics(catalog, &source);
    let _ = complete(catalog, &source, offset);
    let _ = hover(catalog, &source, offset);
    let _ = folding_ranges(&source);

    if let Some(edit) = smart_enter(catalog, &source, offset) {
        assert!(edit.caret >= edit.offset);
    }

    let options = FormatOptions::default();
    let formatted = format_document(&source, &options);
    if parse(&source).ok() {
        assert_eq!(format_document(&formatted, &options), formatted);
    }
});
