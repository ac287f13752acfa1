//! Fuzz target for gzip tar extraction.
//!
//! Arbitrary bytes must not panic the unpacker or write outside the
//! destination directory.

#![no_main]

use libfuzzer_sys::fuzz_target;
use model_archival::archive::unpack;

fuzz_target!(|data: &[u8]| {
    let Ok(outer) = tempfile::tempdir() else {
        return;
    };
    let dest = outer.path().join("dest");
    if std::fs::create_dir(&dest).is_err() {
        return;
    }
    let _ = unpack(data, &dest);

    // Only `dest` may exist next to where extraction started.
    let siblings: Vec<_> = std::fs::read_dir(outer.path())
        .map(|entries| entries.filter_map(Result::ok).map(|e| e.file_name()).collect())
        .unwrap_or_default();
    assert_eq!(siblings, vec![std::ffi::OsString::from("dest")]);
});
