#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    // First line: `start end`, the rest is the text to translate.
    let (header, body) = text.split_once('\n').unwrap_or(("# #", text));
    let (start, end) = header.split_once(' ').unwrap_or(("#", "#"));

    let mut resources = HashMap::new();
    resources.insert("k".to_string(), "v".to_string());
    resources.insert(String::new(), "empty".to_string());

    let translated = xsltgen_resolve::translate_text(body, start, end, &resources);
    assert_eq!(
        translated.matches(['\n', '\r']).count(),
        body.matches(['\n', '\r']).count()
    );

    // Without any mapping the text is unchanged.
    assert_eq!(
        xsltgen_resolve::translate_text(body, start, end, &HashMap::new()),
        body
    );
});
