#![no_main]

use libfuzzer_sys::fuzz_target;
use lithos_i18n_core::{Catalog, Extractor};

fuzz_target!(|data: &[u8]| {
    let source = match std::str::from_utf8(data) {
        Ok(src) => src,
        Err(_) => return,
    };

    let extractor = Extractor::new();
    let mut catalog = Catalog::new("fuzz");
    let added = catalog.add_template(&extractor, "fuzz.tmpl", source);
    assert!(catalog.len() <= added);
    if let Ok(json) = catalog.to_json() {
        let _ = Catalog::from_json(&json);
    }
});
