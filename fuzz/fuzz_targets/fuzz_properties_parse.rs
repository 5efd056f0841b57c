#![no_main]

use libfuzzer_sys::fuzz_target;

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    // Never panic or hang; every parsed line consumes input.
    let parsed = xsltgen_properties::parse(text);
    assert!(parsed.entries.len() <= text.len());
    for entry in &parsed.entries {
        assert!(parsed.get(&entry.key).is_some());
    }
});
