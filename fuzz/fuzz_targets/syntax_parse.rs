#![no_main]

use libfuzzer_sys::fuzz_target;
use ngx_syntax::parser::parse;

const MAX_SOURCE_BYTES: usize = 16 * 1024;

fuzz_target!(|data: &[u8]| {
    let capped = &data[..data.len().min(MAX_SOURCE_BYTES)];
    let source = String::from_utf8_lossy(capped);

    let parsed = parse(&source);
    // The tree is lossless whatever the input.
    assert_eq!(parsed.syntax().text().to_string(), source);

    let file = parsed.source_file();
    for directive in file.all_directives() {
        let _ = directive.context_path();
        let _ = directive.args().count();
    }
});
