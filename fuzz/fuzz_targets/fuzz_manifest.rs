//! Fuzz target for auxiliary file manifest decoding.
//!
//! Any manifest that decodes must map every key inside the extraction dir.

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use model_archival::archive::AuxiliaryManifest;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(manifest) = AuxiliaryManifest::from_json(json) {
        let root = Path::new("/extract");
        for replacement in manifest.replacements(root).values() {
            assert!(Path::new(replacement).starts_with(root.join("fta")));
        }
    }
});
