#![no_main]

use std::io::Write;

use libfuzzer_sys::fuzz_target;
use xsltgen_archive::{ArchiveExtractor, ZipExtractor};

fuzz_target!(|data: &[u8]| {
    let Ok(dir) = tempfile::tempdir() else {
        return;
    };
    let archive = dir.path().join("fuzz.jar");
    let Ok(mut file) = std::fs::File::create(&archive) else {
        return;
    };
    let cap = data.len().min(256 * 1024);
    if file.write_all(&data[..cap]).is_err() {
        return;
    }
    drop(file);

    // Malformed archives must surface as errors, never as panics or files
    // outside the destination.
    let dest = dir.path().join("out");
    for entry in ["META-INF/MANIFEST.MF", "xsl/main.xsl", "../escape.xsl"] {
        let _ = ZipExtractor.extract_entry(&archive, entry, &dest);
    }
    assert!(!dir.path().join("escape.xsl").exists());
});
