#![no_main]

use libfuzzer_sys::fuzz_target;
use lithos_i18n_engine::{prune_all_comments, scan_statements};

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        let once = prune_all_comments(source);
        assert_eq!(prune_all_comments(&once), once);
        for statement in scan_statements(source) {
            assert!(statement.span.end <= source.len());
        }
    }
});
