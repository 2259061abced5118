#![no_main]

use docmerge::model::Document;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic the package reader or writer.
    if let Ok(doc) = Document::from_bytes(data) {
        let _ = doc.to_bytes();
    }
});
